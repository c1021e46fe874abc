use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{map_day_to_date, CALENDAR_WINDOW_DAYS};
use crate::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum EventType {
    #[default]
    #[serde(rename = "Blog Post")]
    BlogPost,
    #[serde(rename = "Social Post")]
    SocialPost,
}

impl From<String> for EventType {
    fn from(raw: String) -> Self {
        if raw.to_lowercase().contains("social") {
            EventType::SocialPost
        } else {
            EventType::BlogPost
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::BlogPost => write!(f, "Blog Post"),
            EventType::SocialPost => write!(f, "Social Post"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarEvent {
    /// 1-based offset inside the 28-day window.
    #[serde(deserialize_with = "lenient::small_int")]
    pub day: u32,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(deserialize_with = "lenient::text")]
    pub platform: String,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub details: String,
    /// Absolute date fixed when the plan was generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpertAdvice {
    #[serde(deserialize_with = "lenient::text")]
    pub cadence: String,
    #[serde(deserialize_with = "lenient::text")]
    pub strategy_duration: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub metrics_to_track: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublishingPlan {
    pub expert_advice: ExpertAdvice,
    pub events: Vec<CalendarEvent>,
}

impl PublishingPlan {
    /// Clamp every day offset into the calendar window and order events by
    /// day, blog posts before social posts on the same day.
    pub fn normalize(&mut self) {
        for event in &mut self.events {
            event.day = event.day.clamp(1, CALENDAR_WINDOW_DAYS);
        }
        self.events.sort_by_key(|e| {
            (
                e.day,
                match e.event_type {
                    EventType::BlogPost => 0,
                    EventType::SocialPost => 1,
                },
            )
        });
    }

    /// Fix each event's absolute date relative to `anchor` (day 1).
    pub fn anchor(&mut self, anchor: NaiveDate) {
        for event in &mut self.events {
            event.scheduled_date = Some(map_day_to_date(i64::from(event.day), anchor));
        }
    }

    pub fn events_of(&self, event_type: EventType) -> impl Iterator<Item = &CalendarEvent> {
        self.events
            .iter()
            .filter(move |e| e.event_type == event_type)
    }
}
