use rankplan_core::{BusinessProfile, Schema, SeoAudit, Stage};
use serde::Deserialize;

use super::{bullet_list, preamble, push_requirements, push_section, StagePrompt};

/// Stage 1 response: the foundation narrative plus the initial audit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FoundationResponse {
    pub description: String,
    pub target_customer: String,
    pub key_services: String,
    pub audit: SeoAudit,
}

#[must_use]
pub fn audit_schema() -> Schema {
    let score = |what: &str| Schema::integer().describe(&format!("{what} score from 0 to 100"));
    let severity = Schema::enumeration(&["High", "Medium", "Low"]);

    Schema::object([
        ("overallScore", score("Overall SEO")),
        ("technicalScore", score("Technical SEO")),
        ("contentScore", score("Content quality")),
        ("backlinkScore", score("Backlink profile")),
        ("uxScore", score("User experience")),
        ("localScore", score("Local search")),
        (
            "issues",
            Schema::array(Schema::object([
                ("category", Schema::string()),
                ("severity", severity),
                ("description", Schema::string()),
                ("impact", Schema::string()),
                ("solution", Schema::string()),
            ])),
        ),
        ("opportunities", Schema::string_list()),
        (
            "recommendations",
            Schema::array(Schema::object([
                (
                    "priority",
                    Schema::integer().describe("Rank, 1 is the most important"),
                ),
                ("title", Schema::string()),
                ("description", Schema::string()),
                ("expectedImpact", Schema::string()),
            ])),
        ),
        (
            "competitorAnalysis",
            Schema::array(Schema::object([
                ("competitor", Schema::string()),
                ("domain", Schema::string()),
                ("strengths", Schema::string_list()),
                ("weaknesses", Schema::string_list()),
                ("opportunities", Schema::string_list()),
            ])),
        ),
    ])
}

#[must_use]
pub fn foundation_schema() -> Schema {
    Schema::object([
        (
            "description",
            Schema::string().describe("Two to three sentence brand description"),
        ),
        (
            "targetCustomer",
            Schema::string().describe("Who buys, where they are, what they need"),
        ),
        (
            "keyServices",
            Schema::string().describe("Comma-separated list of core services"),
        ),
        ("audit", audit_schema()),
    ])
}

/// Stage 1: brand foundation and SEO audit from the raw profile.
#[must_use]
pub fn build_foundation_prompt(profile: &BusinessProfile) -> StagePrompt {
    let mut text = preamble(
        "Write the brand foundation for the business below and audit its current SEO position.",
    );

    let mut business = format!(
        "Business name: {}\nIndustry: {}\nTarget locations: {}",
        profile.business_name,
        profile.business_type,
        profile.location_summary()
    );
    if !profile.service_model.trim().is_empty() {
        business.push_str(&format!("\nService model: {}", profile.service_model));
    }
    match &profile.website {
        Some(website) => business.push_str(&format!("\nWebsite: {website}")),
        None => business.push_str("\nWebsite: none yet"),
    }
    push_section(&mut text, "Business", &business);

    let handles = &profile.social_handles;
    let social: Vec<String> = [
        ("LinkedIn", &handles.linkedin),
        ("Twitter", &handles.twitter),
        ("Facebook", &handles.facebook),
    ]
    .into_iter()
    .filter_map(|(name, handle)| handle.as_ref().map(|h| format!("{name}: {h}")))
    .collect();
    push_section(&mut text, "Social profiles", &bullet_list(&social));

    push_requirements(
        &mut text,
        &[
            "description: what the business does and why customers choose it",
            "targetCustomer: the primary customer segment in the target locations",
            "keyServices: the services to build the SEO strategy around",
            "audit: realistic 0-100 scores; without a website, score technical and UX conservatively",
            "audit.issues: at least three, each with a concrete solution",
            "audit.recommendations: ranked by priority starting at 1",
            "audit.competitorAnalysis: two or three local competitors",
        ],
    );

    StagePrompt {
        stage: Stage::Foundation,
        text,
        schema: foundation_schema(),
    }
}
