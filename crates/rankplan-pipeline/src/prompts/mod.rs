//! Stage prompt builders.
//!
//! One pure function per stage. Each takes exactly the upstream records its
//! stage depends on, embeds them into the instruction text, and declares the
//! output schema the generator must honour. Inputs are typed and
//! non-optional, so a builder cannot be called before its prerequisites
//! exist.
//!
//! Prompt text is deterministic for a given input: the prompt cache keys on
//! it, so nothing time- or order-dependent may leak in.

mod content;
mod foundation;
mod insights;
mod keywords;
mod plans;

use std::fmt::Write as _;

use rankplan_core::{
    BrandFoundation, ContentPlan, ConversionPlan, KeywordStrategy, PublishingPlan, Schema,
    SeoAudit, SocialPosts, Stage, TechnicalSeoPlan,
};

pub use content::{
    build_content_social_prompt, build_publishing_calendar_prompt, content_social_schema,
    publishing_calendar_schema, ContentSocialResponse,
};
pub use foundation::{
    audit_schema, build_foundation_prompt, foundation_schema, FoundationResponse,
};
pub use insights::{
    analytics_schema, build_analytics_prompt, build_performance_prompt,
    build_sales_insights_prompt, performance_schema, sales_insights_schema,
    SalesInsightsResponse,
};
pub use keywords::{build_keywords_prompt, keywords_schema};
pub use plans::{
    build_conversion_prompt, build_technical_seo_prompt, conversion_schema, technical_seo_schema,
};

/// Prompt text plus the schema its response must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct StagePrompt {
    pub stage: Stage,
    pub text: String,
    pub schema: Schema,
}

/// Every output from stages 1-6, required by the late analysis stages.
#[derive(Debug, Clone, Copy)]
pub struct StrategySnapshot<'a> {
    pub foundation: &'a BrandFoundation,
    pub audit: &'a SeoAudit,
    pub keywords: &'a KeywordStrategy,
    pub content_plan: &'a ContentPlan,
    pub social_posts: &'a SocialPosts,
    pub publishing_plan: &'a PublishingPlan,
    pub technical_seo: &'a TechnicalSeoPlan,
    pub conversion_plan: &'a ConversionPlan,
}

const ROLE: &str = "You are a senior SEO strategist for small and mid-sized businesses in India.";

const JSON_ONLY: &str =
    "Respond with JSON only, matching the response schema exactly. Do not wrap it in Markdown.";

/// Starts a prompt with the shared role line and a task statement.
fn preamble(task: &str) -> String {
    format!("{ROLE}\n\n{task}\n")
}

/// Appends a titled block. Empty bodies are skipped so optional profile
/// fields do not leave dangling headings.
fn push_section(out: &mut String, title: &str, body: &str) {
    let body = body.trim();
    if body.is_empty() {
        return;
    }
    let _ = write!(out, "\n## {title}\n{body}\n");
}

fn push_requirements(out: &mut String, items: &[&str]) {
    out.push_str("\n## Requirements\n");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
    let _ = write!(out, "\n{JSON_ONLY}\n");
}

fn bullet_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|i| format!("- {}", i.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lines a reader needs to recognise the business. Used by every stage.
fn foundation_block(foundation: &BrandFoundation) -> String {
    let profile = &foundation.profile;
    let mut out = String::new();
    let _ = writeln!(out, "Business name: {}", profile.business_name);
    let _ = writeln!(out, "Industry: {}", profile.business_type);
    if !profile.service_model.trim().is_empty() {
        let _ = writeln!(out, "Service model: {}", profile.service_model);
    }
    let _ = writeln!(out, "Target locations: {}", profile.location_summary());
    if let Some(website) = &profile.website {
        let _ = writeln!(out, "Website: {website}");
    }
    let _ = writeln!(out, "Description: {}", foundation.description);
    let _ = writeln!(out, "Target customer: {}", foundation.target_customer);
    let _ = write!(out, "Key services: {}", foundation.key_services);
    out
}

fn audit_block(audit: &SeoAudit) -> String {
    let mut out = String::new();
    for (name, score) in audit.scores() {
        let _ = writeln!(out, "{name}: {score}/100");
    }
    for issue in audit.issues.iter().take(8) {
        let _ = writeln!(
            out,
            "Issue [{}] {}: {}",
            issue.severity, issue.category, issue.description
        );
    }
    if !audit.opportunities.is_empty() {
        let _ = writeln!(out, "Opportunities: {}", audit.opportunities.join("; "));
    }
    out
}

fn keywords_block(keywords: &KeywordStrategy) -> String {
    let mut out = String::new();
    for (category, list) in keywords.categories() {
        if list.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}: {}", category.label(), list.join(", "));
    }
    out
}
