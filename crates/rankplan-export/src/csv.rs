use std::borrow::Cow;

use chrono::NaiveDate;
use rankplan_core::{event_date, KeywordStrategy, PublishingPlan};

/// Quote a field when it holds a delimiter, quote or line break.
fn field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn push_row(out: &mut String, fields: &[&str]) {
    let row: Vec<Cow<'_, str>> = fields.iter().map(|f| field(f)).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// One row per keyword per category. Missing metrics render as `N/A`.
#[must_use]
pub fn keywords_csv(keywords: &KeywordStrategy) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        &["category", "keyword", "search_volume", "difficulty"],
    );
    for (category, list) in keywords.categories() {
        for keyword in list {
            push_row(
                &mut out,
                &[
                    category.label(),
                    keyword,
                    &keywords.volume_label(keyword),
                    &keywords.difficulty_label(keyword),
                ],
            );
        }
    }
    out
}

/// One row per calendar event, in plan order.
#[must_use]
pub fn calendar_csv(plan: &PublishingPlan, today: NaiveDate) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        &["date", "day", "type", "platform", "title", "details"],
    );
    for event in &plan.events {
        push_row(
            &mut out,
            &[
                &event_date(event, today).to_string(),
                &event.day.to_string(),
                &event.event_type.to_string(),
                &event.platform,
                &event.title,
                &event.details,
            ],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankplan_core::{CalendarEvent, EventType};
    use std::collections::BTreeMap;

    #[test]
    fn fields_with_delimiters_are_quoted() {
        assert_eq!(field("plain"), "plain");
        assert_eq!(field("a, b"), "\"a, b\"");
        assert_eq!(field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn keyword_rows_mark_missing_metrics() {
        let keywords = KeywordStrategy {
            primary_keywords: vec!["clinic in mumbai".to_string()],
            location_keywords: vec!["doctor, andheri".to_string()],
            search_volume: BTreeMap::from([("clinic in mumbai".to_string(), 1900)]),
            keyword_difficulty: BTreeMap::from([("clinic in mumbai".to_string(), 54)]),
            ..KeywordStrategy::default()
        };

        let csv = keywords_csv(&keywords);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "category,keyword,search_volume,difficulty");
        assert_eq!(lines[1], "Primary,clinic in mumbai,1900,54");
        assert!(lines[2].ends_with(",\"doctor, andheri\",N/A,N/A"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn calendar_rows_prefer_scheduled_date() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let plan = PublishingPlan {
            events: vec![
                CalendarEvent {
                    day: 2,
                    title: "Fever guide".to_string(),
                    platform: "Blog".to_string(),
                    scheduled_date: NaiveDate::from_ymd_opt(2026, 1, 6),
                    ..CalendarEvent::default()
                },
                CalendarEvent {
                    day: 3,
                    event_type: EventType::SocialPost,
                    platform: "LinkedIn".to_string(),
                    title: "Teaser".to_string(),
                    details: "Short clip".to_string(),
                    scheduled_date: None,
                },
            ],
            ..PublishingPlan::default()
        };

        let csv = calendar_csv(&plan, today);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,day,type,platform,title,details");
        assert_eq!(lines[1], "2026-01-06,2,Blog Post,Blog,Fever guide,");
        assert_eq!(lines[2], "2026-03-12,3,Social Post,LinkedIn,Teaser,Short clip");
    }
}
