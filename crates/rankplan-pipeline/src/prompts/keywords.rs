use rankplan_core::{BrandFoundation, KeywordCategory, Schema, SeoAudit, Stage};

use super::{audit_block, foundation_block, preamble, push_requirements, push_section, StagePrompt};

/// Keyword lists in display order, followed by the two metric maps.
///
/// The schema language cannot express a map, so `searchVolume` and
/// `keywordDifficulty` are requested as JSON-encoded strings and decoded by
/// the generator.
#[must_use]
pub fn keywords_schema() -> Schema {
    let lists = KeywordCategory::ALL.into_iter().map(|category| {
        (
            category.field_name(),
            Schema::string_list().describe(category.label()),
        )
    });

    let mut schema = Schema::object(lists);
    if let Schema::Object {
        properties,
        required,
        ..
    } = &mut schema
    {
        for (name, description) in [
            (
                "searchVolume",
                "JSON object encoded as a string, mapping every keyword above to its estimated monthly searches",
            ),
            (
                "keywordDifficulty",
                "JSON object encoded as a string, mapping every keyword above to a difficulty from 0 to 100",
            ),
        ] {
            properties.push((name.to_string(), Schema::string().describe(description)));
            required.push(name.to_string());
        }
    }
    schema
}

/// Stage 2: categorized keyword strategy from the confirmed foundation.
#[must_use]
pub fn build_keywords_prompt(foundation: &BrandFoundation, audit: &SeoAudit) -> StagePrompt {
    let mut text = preamble(
        "Build a keyword strategy for the confirmed brand foundation below, \
         aimed at the listed target locations.",
    );

    push_section(&mut text, "Brand foundation", &foundation_block(foundation));
    push_section(&mut text, "Current SEO audit", &audit_block(audit));

    let locations = foundation.profile.location_summary();
    let location_rule = format!(
        "locationKeywords: every entry names one of these locations: {locations}"
    );
    push_requirements(
        &mut text,
        &[
            "Five to ten keywords per category, lower case, as real users type them",
            location_rule.as_str(),
            "buyerIntentKeywords: searches made right before booking or buying",
            "voiceSearchKeywords: natural spoken questions",
            "searchVolume and keywordDifficulty must contain an entry for every keyword listed",
            "Do not repeat a keyword across categories",
        ],
    );

    StagePrompt {
        stage: Stage::Keywords,
        text,
        schema: keywords_schema(),
    }
}
