use std::fmt::Write as _;

use rankplan_core::{
    event_date, AllData, AnalyticsReport, BrandFoundation, ContentPlan, ConversionPlan, Kpi,
    KeywordStrategy, PerformanceAnalysis, Project, Projection, PublishingPlan, SalesInsight,
    SeoAudit, SocialPosts, TechnicalSeoPlan,
};

/// Table cells cannot hold pipes or line breaks.
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn table(out: &mut String, header: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }
    let _ = writeln!(out, "| {} |", header.join(" | "));
    let _ = writeln!(out, "|{}", " --- |".repeat(header.len()));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| cell(c)).collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
    out.push('\n');
}

fn bullets(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "**{title}**\n");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
    out.push('\n');
}

fn foundation_section(out: &mut String, foundation: &BrandFoundation) {
    let profile = &foundation.profile;
    out.push_str("## Brand foundation\n\n");
    let _ = writeln!(out, "- **Industry:** {}", profile.business_type);
    if !profile.service_model.is_empty() {
        let _ = writeln!(out, "- **Service model:** {}", profile.service_model);
    }
    let _ = writeln!(out, "- **Target locations:** {}", profile.location_summary());
    if let Some(website) = &profile.website {
        let _ = writeln!(out, "- **Website:** {website}");
    }
    let _ = writeln!(out, "- **Target customer:** {}", foundation.target_customer);
    let _ = writeln!(out, "- **Key services:** {}", foundation.key_services);
    let _ = writeln!(out, "\n{}\n", foundation.description);
}

fn audit_section(out: &mut String, audit: &SeoAudit) {
    out.push_str("## SEO audit\n\n");
    let scores: Vec<Vec<String>> = audit
        .scores()
        .into_iter()
        .map(|(name, score)| vec![name.to_string(), format!("{score}/100")])
        .collect();
    table(out, &["Area", "Score"], &scores);

    let issues: Vec<Vec<String>> = audit
        .issues
        .iter()
        .map(|i| {
            vec![
                i.severity.to_string(),
                i.category.clone(),
                i.description.clone(),
                i.solution.clone(),
            ]
        })
        .collect();
    table(out, &["Severity", "Category", "Issue", "Fix"], &issues);

    let recommendations: Vec<String> = audit
        .ranked_recommendations()
        .into_iter()
        .map(|r| format!("{}. **{}**: {}", r.priority, r.title, r.description))
        .collect();
    bullets(out, "Recommendations", &recommendations);
    bullets(out, "Opportunities", &audit.opportunities);
}

fn keywords_section(out: &mut String, keywords: &KeywordStrategy) {
    out.push_str("## Keyword strategy\n\n");
    for (category, list) in keywords.categories() {
        let _ = writeln!(out, "### {}\n", category.label());
        let rows: Vec<Vec<String>> = list
            .iter()
            .map(|k| {
                vec![
                    k.clone(),
                    keywords.volume_label(k),
                    keywords.difficulty_label(k),
                ]
            })
            .collect();
        table(out, &["Keyword", "Monthly searches", "Difficulty"], &rows);
    }
}

fn content_section(out: &mut String, plan: &ContentPlan, social: Option<&SocialPosts>) {
    out.push_str("## Content plan\n\n");
    let posts: Vec<Vec<String>> = plan
        .blog_posts
        .iter()
        .map(|p| {
            vec![
                p.title.clone(),
                p.target_keywords.join(", "),
                p.priority.to_string(),
                p.difficulty.to_string(),
                p.estimated_traffic.to_string(),
            ]
        })
        .collect();
    if !posts.is_empty() {
        out.push_str("### Blog posts\n\n");
        table(
            out,
            &["Title", "Keywords", "Priority", "Difficulty", "Est. traffic"],
            &posts,
        );
    }

    let pages: Vec<Vec<String>> = plan
        .landing_pages
        .iter()
        .map(|p| vec![p.title.clone(), format!("/{}", p.url_slug), p.target_keyword.clone()])
        .collect();
    if !pages.is_empty() {
        out.push_str("### Landing pages\n\n");
        table(out, &["Title", "URL", "Keyword"], &pages);
    }

    let emails: Vec<Vec<String>> = plan
        .email_campaigns
        .iter()
        .map(|e| vec![e.name.clone(), e.subject_line.clone(), e.send_timing.clone()])
        .collect();
    if !emails.is_empty() {
        out.push_str("### Email campaigns\n\n");
        table(out, &["Campaign", "Subject", "Timing"], &emails);
    }

    if let Some(social) = social.filter(|s| !s.is_empty()) {
        out.push_str("### Social posts\n\n");
        for (platform, post) in social.iter() {
            let _ = writeln!(out, "**{}**\n", platform.display_name());
            let _ = writeln!(out, "{}\n", post.content);
            if !post.hashtags.is_empty() {
                let _ = writeln!(out, "{}\n", post.hashtags.join(" "));
            }
        }
    }
}

fn calendar_section(out: &mut String, plan: &PublishingPlan, project: &Project) {
    out.push_str("## Publishing calendar\n\n");
    let advice = &plan.expert_advice;
    if !advice.cadence.is_empty() {
        let _ = writeln!(out, "**Cadence:** {}\n", advice.cadence);
    }
    let today = project.updated_at.date_naive();
    let rows: Vec<Vec<String>> = plan
        .events
        .iter()
        .map(|e| {
            vec![
                event_date(e, today).to_string(),
                e.day.to_string(),
                e.event_type.to_string(),
                e.platform.clone(),
                e.title.clone(),
            ]
        })
        .collect();
    table(out, &["Date", "Day", "Type", "Platform", "Title"], &rows);
    bullets(out, "Tips", &advice.tips);
}

fn technical_section(out: &mut String, plan: &TechnicalSeoPlan) {
    out.push_str("## Technical SEO\n\n");
    bullets(out, "Priority actions", &plan.priority_actions);
    let rows: Vec<Vec<String>> = plan
        .tasks()
        .map(|(area, t)| {
            vec![
                area.to_string(),
                t.task.clone(),
                t.priority.to_string(),
                t.impact.clone(),
            ]
        })
        .collect();
    table(out, &["Area", "Task", "Priority", "Impact"], &rows);
}

fn conversion_section(out: &mut String, plan: &ConversionPlan) {
    out.push_str("## Conversion plan\n\n");
    let funnel: Vec<Vec<String>> = plan
        .funnel_stages
        .iter()
        .map(|s| vec![s.stage.clone(), s.goal.clone(), s.tactics.join("; "), s.metric.clone()])
        .collect();
    table(out, &["Stage", "Goal", "Tactics", "Metric"], &funnel);
    let ctas: Vec<String> = plan
        .cta_recommendations
        .iter()
        .map(|c| format!("{}: \"{}\"", c.placement, c.text))
        .collect();
    bullets(out, "Calls to action", &ctas);
    bullets(out, "Trust signals", &plan.trust_signals);
}

fn projection_rows(projections: &[&Projection]) -> Vec<Vec<String>> {
    projections
        .iter()
        .map(|p| {
            vec![
                p.month.to_string(),
                p.traffic.to_string(),
                p.leads.to_string(),
                format!("{:.0}", p.revenue),
            ]
        })
        .collect()
}

fn kpi_rows(kpis: &[Kpi]) -> Vec<Vec<String>> {
    kpis.iter()
        .map(|k| vec![k.name.clone(), k.current.clone(), k.target.clone(), k.timeframe.clone()])
        .collect()
}

fn performance_section(out: &mut String, analysis: &PerformanceAnalysis) {
    out.push_str("## Performance analysis\n\n");
    if !analysis.summary.is_empty() {
        let _ = writeln!(out, "{}\n", analysis.summary);
    }
    table(
        out,
        &["Month", "Traffic", "Leads", "Revenue (INR)"],
        &projection_rows(&analysis.timeline()),
    );
    table(
        out,
        &["KPI", "Current", "Target", "Timeframe"],
        &kpi_rows(&analysis.kpis),
    );
    bullets(out, "Strengths", &analysis.strengths);
    bullets(out, "Gaps", &analysis.gaps);
    bullets(out, "Recommendations", &analysis.recommendations);
}

fn sales_section(out: &mut String, insights: &[SalesInsight]) {
    out.push_str("## Sales insights\n\n");
    for insight in insights {
        let _ = writeln!(
            out,
            "### {} ({} priority, {})\n",
            insight.title, insight.priority, insight.channel
        );
        if !insight.insight.is_empty() {
            let _ = writeln!(out, "{}\n", insight.insight);
        }
        let _ = writeln!(out, "- **Action:** {}", insight.action);
        if !insight.expected_impact.is_empty() {
            let _ = writeln!(out, "- **Expected impact:** {}", insight.expected_impact);
        }
        out.push('\n');
    }
}

fn analytics_section(out: &mut String, report: &AnalyticsReport) {
    out.push_str("## Analytics\n\n");
    if !report.summary.is_empty() {
        let _ = writeln!(out, "{}\n", report.summary);
    }
    let forecast: Vec<&Projection> = report.traffic_forecast.iter().collect();
    table(
        out,
        &["Month", "Traffic", "Leads", "Revenue (INR)"],
        &projection_rows(&forecast),
    );
    let mix: Vec<Vec<String>> = report
        .channel_mix
        .iter()
        .map(|c| vec![c.channel.clone(), format!("{}%", c.share_percent)])
        .collect();
    table(out, &["Channel", "Share"], &mix);

    let roi = &report.roi;
    if roi.investment > 0.0 || roi.projected_revenue > 0.0 {
        let percent = roi.computed_roi_percent().unwrap_or(roi.roi_percent);
        let _ = writeln!(
            out,
            "**ROI:** INR {:.0} invested, INR {:.0} projected revenue ({percent:.0}%)",
            roi.investment, roi.projected_revenue
        );
        if !roi.payback_period.is_empty() {
            let _ = writeln!(out, "**Payback:** {}", roi.payback_period);
        }
        out.push('\n');
    }
    table(
        out,
        &["KPI", "Current", "Target", "Timeframe"],
        &kpi_rows(&report.kpi_dashboard),
    );
    bullets(out, "Risk factors", &report.risk_factors);
}

/// Full strategy report. Sections for stages that have not run are omitted.
#[must_use]
pub fn to_markdown(project: &Project) -> String {
    let data: &AllData = &project.data;
    let title = data
        .foundation
        .as_ref()
        .map(|f| f.profile.business_name.as_str())
        .or_else(|| data.profile.as_ref().map(|p| p.business_name.as_str()))
        .unwrap_or(project.name.as_str());

    let mut out = format!("# {title}: SEO strategy\n\n");
    let _ = writeln!(
        out,
        "_Project {} · {} · updated {}_\n",
        project.name,
        project.run_state,
        project.updated_at.format("%Y-%m-%d")
    );

    if let Some(foundation) = &data.foundation {
        foundation_section(&mut out, foundation);
    }
    if let Some(audit) = &data.audit {
        audit_section(&mut out, audit);
    }
    if let Some(keywords) = &data.keywords {
        keywords_section(&mut out, keywords);
    }
    if let Some(plan) = &data.content_plan {
        content_section(&mut out, plan, data.social_posts.as_ref());
    }
    if let Some(plan) = &data.publishing_plan {
        calendar_section(&mut out, plan, project);
    }
    if let Some(plan) = &data.technical_seo {
        technical_section(&mut out, plan);
    }
    if let Some(plan) = &data.conversion_plan {
        conversion_section(&mut out, plan);
    }
    if let Some(analysis) = &data.performance_analysis {
        performance_section(&mut out, analysis);
    }
    if let Some(insights) = &data.sales_insights {
        sales_section(&mut out, insights);
    }
    if let Some(report) = &data.analytics {
        analytics_section(&mut out, report);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rankplan_core::{BusinessProfile, CalendarEvent};
    use serde_json::json;

    fn project() -> Project {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let mut project = Project::new(
            "owner",
            "HealthPlus SEO",
            BusinessProfile::new("HealthPlus Clinic", "Healthcare"),
            now,
        );
        project.data.keywords = Some(
            serde_json::from_value(json!({
                "primaryKeywords": ["clinic in mumbai", "doctor | clinic"],
                "searchVolume": {"clinic in mumbai": 1900},
                "keywordDifficulty": {"clinic in mumbai": 54}
            }))
            .unwrap(),
        );
        project.data.publishing_plan = Some(PublishingPlan {
            events: vec![CalendarEvent {
                day: 2,
                title: "Fever guide".to_string(),
                platform: "Blog".to_string(),
                ..CalendarEvent::default()
            }],
            ..PublishingPlan::default()
        });
        project
    }

    #[test]
    fn report_renders_keyword_table_with_missing_metrics() {
        let report = to_markdown(&project());
        assert!(report.starts_with("# HealthPlus Clinic: SEO strategy"));
        assert!(report.contains("### Primary"));
        assert!(report.contains("| clinic in mumbai | 1900 | 54 |"));
        assert!(report.contains("| doctor \\| clinic | N/A | N/A |"));
    }

    #[test]
    fn report_skips_stages_that_have_not_run() {
        let report = to_markdown(&project());
        assert!(!report.contains("## SEO audit"));
        assert!(!report.contains("## Analytics"));
        assert!(report.contains("| 2026-03-11 | 2 | Blog Post | Blog | Fever guide |"));
    }

    #[test]
    fn empty_tables_are_omitted() {
        let mut out = String::new();
        table(&mut out, &["A"], &[]);
        assert!(out.is_empty());
    }
}
