use std::fmt::Write as _;

use rankplan_core::{
    BrandFoundation, ContentPlan, KeywordStrategy, Platform, Schema, SocialPosts, Stage,
    CALENDAR_WINDOW_DAYS,
};
use serde::Deserialize;

use super::{foundation_block, keywords_block, preamble, push_requirements, push_section, StagePrompt};

/// Stage 3 response: long-form content plus per-platform social posts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSocialResponse {
    pub content_plan: ContentPlan,
    pub social_posts: SocialPosts,
}

fn level() -> Schema {
    Schema::enumeration(&["High", "Medium", "Low"])
}

fn social_post_schema() -> Schema {
    Schema::object([
        ("content", Schema::string()),
        ("hashtags", Schema::string_list()),
        ("bestTime", Schema::string().describe("Day and time to publish")),
        ("engagement", level()),
        ("cta", Schema::string()),
        ("visualSuggestion", Schema::string()),
    ])
}

#[must_use]
pub fn content_social_schema() -> Schema {
    let blog_post = Schema::object([
        ("title", Schema::string()),
        ("slug", Schema::string()),
        ("metaDescription", Schema::string()),
        ("targetKeywords", Schema::string_list()),
        ("outline", Schema::string_list()),
        ("wordCount", Schema::integer()),
        ("difficulty", Schema::enumeration(&["Easy", "Medium", "Hard"])),
        ("priority", level()),
        ("estimatedTraffic", Schema::integer().describe("Monthly visits once ranking")),
        ("cta", Schema::string()),
    ]);
    let landing_page = Schema::object([
        ("title", Schema::string()),
        ("urlSlug", Schema::string()),
        ("targetKeyword", Schema::string()),
        ("headline", Schema::string()),
        ("sections", Schema::string_list()),
        ("cta", Schema::string()),
    ]);
    let email_campaign = Schema::object([
        ("name", Schema::string()),
        ("subjectLine", Schema::string()),
        ("audience", Schema::string()),
        ("goal", Schema::string()),
        ("sendTiming", Schema::string()),
        ("cta", Schema::string()),
    ]);
    let calendar_entry = Schema::object([
        ("week", Schema::integer()),
        ("focus", Schema::string()),
        ("items", Schema::string_list()),
    ]);

    let content_plan = Schema::object([
        ("blogPosts", Schema::array(blog_post)),
        ("landingPages", Schema::array(landing_page)),
        ("emailCampaigns", Schema::array(email_campaign)),
        ("contentCalendar", Schema::array(calendar_entry)),
    ]);
    let social_posts = Schema::object(
        Platform::ALL
            .into_iter()
            .map(|p| (p.id(), Schema::array(social_post_schema()))),
    );

    Schema::object([
        ("contentPlan", content_plan),
        ("socialPosts", social_posts),
    ])
}

/// Stage 3: content plan and social posts driven by the keyword strategy.
#[must_use]
pub fn build_content_social_prompt(
    foundation: &BrandFoundation,
    keywords: &KeywordStrategy,
) -> StagePrompt {
    let mut text = preamble(
        "Create a content plan and ready-to-publish social media posts that target the keywords below.",
    );

    push_section(&mut text, "Brand foundation", &foundation_block(foundation));
    push_section(&mut text, "Keyword strategy", &keywords_block(keywords));

    let top = keywords.top_by_volume(5);
    if !top.is_empty() {
        push_section(&mut text, "Highest-volume keywords", &top.join(", "));
    }

    push_requirements(
        &mut text,
        &[
            "contentPlan.blogPosts: six posts, each targeting keywords from the strategy above",
            "contentPlan.landingPages: one per key service, each with a single target keyword",
            "contentPlan.emailCampaigns: three campaigns covering awareness, consideration and booking",
            "contentPlan.contentCalendar: four weekly entries",
            "socialPosts: three posts each for linkedin, twitter, facebook and instagram",
            "Twitter posts stay under 280 characters including hashtags",
            "Write for the target customer and mention the target locations where natural",
        ],
    );

    StagePrompt {
        stage: Stage::ContentSocial,
        text,
        schema: content_social_schema(),
    }
}

#[must_use]
pub fn publishing_calendar_schema() -> Schema {
    let day = Schema::integer().describe(&format!(
        "Day of the schedule, 1 to {CALENDAR_WINDOW_DAYS}"
    ));
    Schema::object([
        (
            "expertAdvice",
            Schema::object([
                ("cadence", Schema::string()),
                ("strategyDuration", Schema::string()),
                ("metricsToTrack", Schema::string_list()),
                ("tips", Schema::string_list()),
            ]),
        ),
        (
            "events",
            Schema::array(Schema::object([
                ("day", day),
                ("type", Schema::enumeration(&["Blog Post", "Social Post"])),
                (
                    "platform",
                    Schema::string().describe("Blog, LinkedIn, Twitter, Facebook or Instagram"),
                ),
                ("title", Schema::string()),
                ("details", Schema::string()),
            ])),
        ),
    ])
}

/// Stage 4: a 28-day publishing schedule for the generated content.
#[must_use]
pub fn build_publishing_calendar_prompt(
    foundation: &BrandFoundation,
    content_plan: &ContentPlan,
    social_posts: &SocialPosts,
) -> StagePrompt {
    let mut text = preamble(&format!(
        "Schedule the content below across a {CALENDAR_WINDOW_DAYS}-day publishing calendar."
    ));

    push_section(&mut text, "Brand foundation", &foundation_block(foundation));

    let mut blogs = String::new();
    for post in &content_plan.blog_posts {
        let _ = writeln!(
            blogs,
            "- {} (priority {}, keywords: {})",
            post.title,
            post.priority,
            post.target_keywords.join(", ")
        );
    }
    push_section(&mut text, "Blog posts", &blogs);

    let mut social = String::new();
    for (platform, post) in social_posts.iter() {
        let _ = writeln!(social, "- {}: {}", platform.display_name(), post.content);
    }
    push_section(&mut text, "Social posts", &social);

    let window = format!("day is between 1 and {CALENDAR_WINDOW_DAYS}");
    push_requirements(
        &mut text,
        &[
            "Every blog post and social post above appears exactly once in events",
            window.as_str(),
            "type is \"Blog Post\" for blog posts and \"Social Post\" for social posts",
            "Publish high-priority blog posts in the first two weeks",
            "No more than two events on the same day",
            "expertAdvice: cadence, overall strategy duration, metrics to track and practical tips",
        ],
    );

    StagePrompt {
        stage: Stage::PublishingCalendar,
        text,
        schema: publishing_calendar_schema(),
    }
}
