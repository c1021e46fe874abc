use rankplan_core::{BrandFoundation, Schema, SeoAudit, Stage};

use super::{audit_block, foundation_block, preamble, push_requirements, push_section, StagePrompt};

fn task_list() -> Schema {
    Schema::array(Schema::object([
        ("task", Schema::string()),
        ("priority", Schema::enumeration(&["High", "Medium", "Low"])),
        ("impact", Schema::string()),
        ("implementation", Schema::string().describe("Concrete steps")),
    ]))
}

#[must_use]
pub fn technical_seo_schema() -> Schema {
    Schema::object([
        ("siteSpeed", task_list()),
        ("mobileOptimization", task_list()),
        ("crawlability", task_list()),
        ("localSeo", task_list()),
        (
            "schemaMarkup",
            Schema::array(Schema::object([
                ("schemaType", Schema::string().describe("schema.org type")),
                ("page", Schema::string()),
                ("purpose", Schema::string()),
            ])),
        ),
        (
            "priorityActions",
            Schema::string_list().describe("Top actions in the order to do them"),
        ),
    ])
}

/// Stage 5: technical SEO plan. Depends on the foundation and audit only.
#[must_use]
pub fn build_technical_seo_prompt(foundation: &BrandFoundation, audit: &SeoAudit) -> StagePrompt {
    let mut text = preamble("Write a technical SEO plan for the business below.");

    push_section(&mut text, "Brand foundation", &foundation_block(foundation));
    push_section(&mut text, "Current SEO audit", &audit_block(audit));

    push_requirements(
        &mut text,
        &[
            "Address the technical and local issues from the audit first",
            "Two to four tasks per area, each with implementation steps a small team can follow",
            "localSeo: Google Business Profile, citations and location pages for the target locations",
            "schemaMarkup: types that fit the industry, e.g. LocalBusiness, FAQPage, Service",
            "priorityActions: the five highest-impact tasks overall",
        ],
    );

    StagePrompt {
        stage: Stage::TechnicalSeo,
        text,
        schema: technical_seo_schema(),
    }
}

#[must_use]
pub fn conversion_schema() -> Schema {
    Schema::object([
        (
            "funnelStages",
            Schema::array(Schema::object([
                ("stage", Schema::string()),
                ("goal", Schema::string()),
                ("tactics", Schema::string_list()),
                ("metric", Schema::string()),
            ])),
        ),
        (
            "ctaRecommendations",
            Schema::array(Schema::object([
                ("placement", Schema::string()),
                ("text", Schema::string()),
                ("rationale", Schema::string()),
            ])),
        ),
        (
            "leadMagnets",
            Schema::array(Schema::object([
                ("title", Schema::string()),
                ("format", Schema::string()),
                ("audience", Schema::string()),
            ])),
        ),
        (
            "abTests",
            Schema::array(Schema::object([
                ("element", Schema::string()),
                ("variantA", Schema::string()),
                ("variantB", Schema::string()),
                ("hypothesis", Schema::string()),
            ])),
        ),
        ("trustSignals", Schema::string_list()),
    ])
}

/// Stage 6: conversion plan. Depends on the foundation and audit only.
#[must_use]
pub fn build_conversion_prompt(foundation: &BrandFoundation, audit: &SeoAudit) -> StagePrompt {
    let mut text = preamble(
        "Design a conversion plan that turns search visitors into enquiries and customers.",
    );

    push_section(&mut text, "Brand foundation", &foundation_block(foundation));
    push_section(&mut text, "Current SEO audit", &audit_block(audit));

    push_requirements(
        &mut text,
        &[
            "funnelStages: awareness, consideration, decision and retention",
            "ctaRecommendations: where on the site each call to action goes and its exact text",
            "leadMagnets: two or three offers that suit the target customer",
            "abTests: three tests with a clear hypothesis each",
            "trustSignals: proof points the target customer looks for before buying",
        ],
    );

    StagePrompt {
        stage: Stage::ConversionPlan,
        text,
        schema: conversion_schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::fixtures;

    #[test]
    fn technical_prompt_carries_audit_scores() {
        let prompt = build_technical_seo_prompt(&fixtures::foundation(), &fixtures::audit());
        assert_eq!(prompt.stage, Stage::TechnicalSeo);
        assert!(prompt.text.contains("Overall: 48/100"));
        assert!(prompt.text.contains("Local: 35/100"));
    }

    #[test]
    fn technical_schema_fields_match_plan_record() {
        let schema = technical_seo_schema();
        let names = schema.property_names();
        assert_eq!(
            names,
            vec![
                "siteSpeed",
                "mobileOptimization",
                "crawlability",
                "localSeo",
                "schemaMarkup",
                "priorityActions"
            ]
        );
    }

    #[test]
    fn conversion_prompt_names_the_business() {
        let prompt = build_conversion_prompt(&fixtures::foundation(), &fixtures::audit());
        assert_eq!(prompt.stage, Stage::ConversionPlan);
        assert!(prompt.text.contains("HealthPlus Clinic"));
        assert!(conversion_schema().is_required("trustSignals"));
    }

    #[test]
    fn sample_response_fits_conversion_record() {
        let plan: rankplan_core::ConversionPlan = serde_json::from_value(serde_json::json!({
            "funnelStages": [{"stage": "Awareness", "goal": "Reach", "tactics": ["Blog"], "metric": "Visits"}],
            "abTests": [{"element": "Hero", "variantA": "Book now", "variantB": "Call us", "hypothesis": "Urgency"}],
            "trustSignals": ["NABH accredited"]
        }))
        .unwrap();
        assert_eq!(plan.ab_tests[0].variant_b, "Call us");
        assert!(plan.lead_magnets.is_empty());
    }
}
