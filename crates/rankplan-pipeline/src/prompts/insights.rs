use std::fmt::Write as _;

use rankplan_core::{
    PerformanceAnalysis, PerformanceMetrics, SalesInsight, Schema, Stage, MISSING_METRIC,
};
use serde::Deserialize;

use super::{
    audit_block, bullet_list, foundation_block, keywords_block, preamble, push_requirements,
    push_section, StagePrompt, StrategySnapshot,
};

/// Stage 8 response wrapper; the schema root must be an object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesInsightsResponse {
    pub sales_insights: Vec<SalesInsight>,
}

fn projection() -> Schema {
    Schema::object([
        ("month", Schema::integer()),
        ("traffic", Schema::integer().describe("Organic visits that month")),
        ("leads", Schema::integer()),
        ("revenue", Schema::number().describe("Revenue in INR")),
    ])
}

fn kpi() -> Schema {
    Schema::object([
        ("name", Schema::string()),
        ("current", Schema::string()),
        ("target", Schema::string()),
        ("timeframe", Schema::string()),
    ])
}

#[must_use]
pub fn performance_schema() -> Schema {
    Schema::object([
        ("summary", Schema::string()),
        (
            "projections",
            Schema::array(projection()).describe("Months 1, 3, 6 and 12"),
        ),
        ("kpis", Schema::array(kpi())),
        ("strengths", Schema::string_list()),
        ("gaps", Schema::string_list()),
        ("recommendations", Schema::string_list()),
    ])
}

#[must_use]
pub fn sales_insights_schema() -> Schema {
    Schema::object([(
        "salesInsights",
        Schema::array(Schema::object([
            ("title", Schema::string()),
            ("insight", Schema::string()),
            ("action", Schema::string()),
            ("expectedImpact", Schema::string()),
            ("priority", Schema::enumeration(&["High", "Medium", "Low"])),
            ("channel", Schema::string()),
        ])),
    )])
}

#[must_use]
pub fn analytics_schema() -> Schema {
    Schema::object([
        ("summary", Schema::string()),
        ("trafficForecast", Schema::array(projection())),
        (
            "channelMix",
            Schema::array(Schema::object([
                ("channel", Schema::string()),
                (
                    "sharePercent",
                    Schema::integer().describe("Share of traffic; all channels sum to 100"),
                ),
            ])),
        ),
        (
            "roi",
            Schema::object([
                ("investment", Schema::number()),
                ("projectedRevenue", Schema::number()),
                ("roiPercent", Schema::number()),
                ("paybackPeriod", Schema::string()),
            ]),
        ),
        ("kpiDashboard", Schema::array(kpi())),
        ("riskFactors", Schema::string_list()),
    ])
}

/// Condensed view of stages 1-6 shared by the three analysis prompts.
fn push_strategy(text: &mut String, strategy: &StrategySnapshot<'_>) {
    push_section(text, "Brand foundation", &foundation_block(strategy.foundation));
    push_section(text, "SEO audit", &audit_block(strategy.audit));
    push_section(text, "Keyword strategy", &keywords_block(strategy.keywords));

    let content = strategy.content_plan;
    let mut summary = String::new();
    let _ = writeln!(
        summary,
        "{} blog posts (estimated {} monthly visits), {} landing pages, {} email campaigns",
        content.blog_posts.len(),
        content.total_estimated_traffic(),
        content.landing_pages.len(),
        content.email_campaigns.len()
    );
    let _ = writeln!(summary, "{} social posts", strategy.social_posts.total());
    let _ = writeln!(
        summary,
        "{} scheduled events, cadence: {}",
        strategy.publishing_plan.events.len(),
        strategy.publishing_plan.expert_advice.cadence
    );
    push_section(text, "Content and publishing", &summary);

    push_section(
        text,
        "Technical priorities",
        &bullet_list(&strategy.technical_seo.priority_actions),
    );

    let conversion = strategy.conversion_plan;
    let funnel: Vec<String> = conversion
        .funnel_stages
        .iter()
        .map(|s| format!("{}: {} (measured by {})", s.stage, s.goal, s.metric))
        .collect();
    push_section(text, "Conversion funnel", &bullet_list(&funnel));
}

fn metrics_block(metrics: &PerformanceMetrics) -> String {
    fn show<T: ToString>(value: Option<T>) -> String {
        value.map_or_else(|| MISSING_METRIC.to_string(), |v| v.to_string())
    }

    let mut out = String::new();
    let _ = writeln!(out, "Monthly organic traffic: {}", show(metrics.monthly_traffic));
    let _ = writeln!(out, "Conversion rate (%): {}", show(metrics.conversion_rate));
    let _ = writeln!(out, "Average order value (INR): {}", show(metrics.average_order_value));
    let _ = writeln!(out, "Monthly leads: {}", show(metrics.monthly_leads));
    let _ = writeln!(out, "Monthly ad spend (INR): {}", show(metrics.monthly_ad_spend));
    if !metrics.ranking_keywords.is_empty() {
        let _ = writeln!(out, "Currently ranking for: {}", metrics.ranking_keywords.join(", "));
    }
    if !metrics.top_pages.is_empty() {
        let _ = writeln!(out, "Top pages: {}", metrics.top_pages.join(", "));
    }
    if let Some(notes) = &metrics.notes {
        let _ = writeln!(out, "Notes: {notes}");
    }
    out
}

/// Stage 7: projections and KPIs from the full strategy plus user metrics.
#[must_use]
pub fn build_performance_prompt(
    strategy: &StrategySnapshot<'_>,
    metrics: &PerformanceMetrics,
) -> StagePrompt {
    let mut text = preamble(
        "Analyse the expected performance of the SEO strategy below and project results.",
    );

    push_strategy(&mut text, strategy);

    let baseline = if metrics.is_empty() {
        "No current metrics were supplied. Treat this as a new site and state the assumptions you make."
            .to_string()
    } else {
        metrics_block(metrics)
    };
    push_section(&mut text, "Current performance", &baseline);

    push_requirements(
        &mut text,
        &[
            "projections: months 1, 3, 6 and 12, growing from the current baseline",
            "kpis: five measurable KPIs with current value, target and timeframe",
            "strengths and gaps: specific to this strategy, not generic SEO advice",
            "recommendations: the next steps that most improve the projections",
        ],
    );

    StagePrompt {
        stage: Stage::PerformanceAnalysis,
        text,
        schema: performance_schema(),
    }
}

fn analysis_block(analysis: &PerformanceAnalysis) -> String {
    let mut out = format!("{}\n", analysis.summary);
    for p in analysis.timeline() {
        let _ = writeln!(
            out,
            "Month {}: {} visits, {} leads, INR {:.0}",
            p.month, p.traffic, p.leads, p.revenue
        );
    }
    if !analysis.gaps.is_empty() {
        let _ = writeln!(out, "Gaps: {}", analysis.gaps.join("; "));
    }
    out
}

/// Stage 8: sales insights tying the strategy to revenue.
#[must_use]
pub fn build_sales_insights_prompt(
    strategy: &StrategySnapshot<'_>,
    analysis: &PerformanceAnalysis,
) -> StagePrompt {
    let mut text = preamble(
        "Turn the strategy and performance analysis below into sales insights the owner can act on this quarter.",
    );

    push_strategy(&mut text, strategy);
    push_section(&mut text, "Performance analysis", &analysis_block(analysis));

    push_requirements(
        &mut text,
        &[
            "salesInsights: five to seven insights, highest priority first",
            "Each insight names the channel it applies to and one concrete action",
            "expectedImpact: quantify where the analysis supports it",
        ],
    );

    StagePrompt {
        stage: Stage::SalesInsights,
        text,
        schema: sales_insights_schema(),
    }
}

/// Stage 9: derived analytics over everything produced so far.
#[must_use]
pub fn build_analytics_prompt(
    strategy: &StrategySnapshot<'_>,
    analysis: &PerformanceAnalysis,
    insights: &[SalesInsight],
) -> StagePrompt {
    let mut text = preamble(
        "Produce an analytics report that forecasts traffic, channel mix and return on investment for the plan below.",
    );

    push_strategy(&mut text, strategy);
    push_section(&mut text, "Performance analysis", &analysis_block(analysis));

    let lines: Vec<String> = insights
        .iter()
        .map(|i| format!("[{}] {} ({}): {}", i.priority, i.title, i.channel, i.action))
        .collect();
    push_section(&mut text, "Sales insights", &bullet_list(&lines));

    push_requirements(
        &mut text,
        &[
            "trafficForecast: months 1 to 12, consistent with the performance projections",
            "channelMix: organic search, social, email, referral and direct; shares sum to 100",
            "roi: investment and projected revenue over 12 months in INR",
            "kpiDashboard: the KPIs to review every month",
            "riskFactors: what could make the forecast wrong",
        ],
    );

    StagePrompt {
        stage: Stage::Analytics,
        text,
        schema: analytics_schema(),
    }
}
