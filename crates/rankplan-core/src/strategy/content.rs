use serde::{Deserialize, Serialize};

use super::{Difficulty, Level};
use crate::lenient;
use crate::profile::slugify;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentPlan {
    pub blog_posts: Vec<BlogPost>,
    pub landing_pages: Vec<LandingPage>,
    pub email_campaigns: Vec<EmailCampaign>,
    pub content_calendar: Vec<ContentCalendarEntry>,
}

impl ContentPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blog_posts.is_empty()
            && self.landing_pages.is_empty()
            && self.email_campaigns.is_empty()
            && self.content_calendar.is_empty()
    }

    /// Fill blank or malformed slugs from titles.
    pub fn normalize(&mut self) {
        for post in &mut self.blog_posts {
            let cleaned = slugify(&post.slug);
            post.slug = if cleaned.is_empty() {
                slugify(&post.title)
            } else {
                cleaned
            };
        }
        for page in &mut self.landing_pages {
            let cleaned = slugify(&page.url_slug);
            page.url_slug = if cleaned.is_empty() {
                slugify(&page.title)
            } else {
                cleaned
            };
        }
    }

    #[must_use]
    pub fn total_estimated_traffic(&self) -> u64 {
        self.blog_posts.iter().map(|p| p.estimated_traffic).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPost {
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub slug: String,
    #[serde(deserialize_with = "lenient::text")]
    pub meta_description: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub target_keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub outline: Vec<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub word_count: u64,
    pub difficulty: Difficulty,
    pub priority: Level,
    /// Monthly visits once ranking.
    #[serde(deserialize_with = "lenient::count")]
    pub estimated_traffic: u64,
    #[serde(deserialize_with = "lenient::text")]
    pub cta: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LandingPage {
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub url_slug: String,
    #[serde(deserialize_with = "lenient::text")]
    pub target_keyword: String,
    #[serde(deserialize_with = "lenient::text")]
    pub headline: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub sections: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub cta: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailCampaign {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub subject_line: String,
    #[serde(deserialize_with = "lenient::text")]
    pub audience: String,
    #[serde(deserialize_with = "lenient::text")]
    pub goal: String,
    #[serde(deserialize_with = "lenient::text")]
    pub send_timing: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cta: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentCalendarEntry {
    #[serde(deserialize_with = "lenient::small_int")]
    pub week: u32,
    #[serde(deserialize_with = "lenient::text")]
    pub focus: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Twitter,
    Facebook,
    Instagram,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Linkedin,
        Platform::Twitter,
        Platform::Facebook,
        Platform::Instagram,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Linkedin => "LinkedIn",
            Platform::Twitter => "Twitter",
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Ready-to-publish posts keyed by platform id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialPosts {
    pub linkedin: Vec<SocialPost>,
    pub twitter: Vec<SocialPost>,
    pub facebook: Vec<SocialPost>,
    pub instagram: Vec<SocialPost>,
}

impl SocialPosts {
    #[must_use]
    pub fn for_platform(&self, platform: Platform) -> &[SocialPost] {
        match platform {
            Platform::Linkedin => &self.linkedin,
            Platform::Twitter => &self.twitter,
            Platform::Facebook => &self.facebook,
            Platform::Instagram => &self.instagram,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Platform, &SocialPost)> {
        Platform::ALL
            .into_iter()
            .flat_map(move |p| self.for_platform(p).iter().map(move |post| (p, post)))
    }

    #[must_use]
    pub fn total(&self) -> usize {
        Platform::ALL
            .into_iter()
            .map(|p| self.for_platform(p).len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialPost {
    #[serde(deserialize_with = "lenient::text")]
    pub content: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub hashtags: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub best_time: String,
    pub engagement: Level,
    #[serde(deserialize_with = "lenient::text")]
    pub cta: String,
    #[serde(deserialize_with = "lenient::text")]
    pub visual_suggestion: String,
}
