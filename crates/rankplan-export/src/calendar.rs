//! iCalendar feed and Google Calendar links for the publishing plan.

use chrono::{DateTime, NaiveDate, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use rankplan_core::{event_date, slugify, CalendarEvent, PublishingPlan};

const PRODID: &str = "-//RankPlan//Publishing Calendar//EN";

/// RFC 5545 line limit, in octets, excluding the CRLF.
const MAX_LINE_OCTETS: usize = 75;

const GOOGLE_TEMPLATE_URL: &str = "https://calendar.google.com/calendar/render?action=TEMPLATE";

/// Escape a TEXT value: backslash, semicolon, comma and newlines.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// Fold a content line so no physical line exceeds 75 octets. Splits only on
/// char boundaries; continuation lines start with a single space.
fn fold(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out
}

fn summary(event: &CalendarEvent) -> String {
    if event.platform.trim().is_empty() {
        event.title.clone()
    } else {
        format!("[{}] {}", event.platform, event.title)
    }
}

/// All-day `VEVENT`s for every event in the plan, as an RFC 5545 calendar
/// with CRLF line endings. `now` becomes each event's `DTSTAMP`.
#[must_use]
pub fn to_ics(plan: &PublishingPlan, today: NaiveDate, now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y%m%dT%H%M%SZ").to_string();
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
    ];

    for (index, event) in plan.events.iter().enumerate() {
        let date = event_date(event, today);
        let end = date.succ_opt().unwrap_or(date);
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!(
            "UID:{}-{}-{}@rankplan",
            date.format("%Y%m%d"),
            index + 1,
            slugify(&event.title)
        ));
        lines.push(format!("DTSTAMP:{stamp}"));
        lines.push(format!("DTSTART;VALUE=DATE:{}", date.format("%Y%m%d")));
        lines.push(format!("DTEND;VALUE=DATE:{}", end.format("%Y%m%d")));
        lines.push(format!("SUMMARY:{}", escape_text(&summary(event))));
        if !event.details.trim().is_empty() {
            lines.push(format!("DESCRIPTION:{}", escape_text(&event.details)));
        }
        lines.push(format!(
            "CATEGORIES:{}",
            escape_text(&event.event_type.to_string())
        ));
        lines.push("END:VEVENT".to_string());
    }
    lines.push("END:VCALENDAR".to_string());

    let mut out = String::new();
    for line in &lines {
        out.push_str(&fold(line));
        out.push_str("\r\n");
    }
    out
}

/// "Add to Google Calendar" link for one event as an all-day entry on `date`.
#[must_use]
pub fn google_calendar_url(event: &CalendarEvent, date: NaiveDate) -> String {
    let end = date.succ_opt().unwrap_or(date);
    let mut details = event.details.clone();
    if !event.platform.trim().is_empty() {
        if !details.is_empty() {
            details.push_str("\n\n");
        }
        details.push_str(&format!("Platform: {}", event.platform));
    }

    format!(
        "{GOOGLE_TEMPLATE_URL}&text={}&dates={}/{}&details={}",
        utf8_percent_encode(&event.title, NON_ALPHANUMERIC),
        date.format("%Y%m%d"),
        end.format("%Y%m%d"),
        utf8_percent_encode(&details, NON_ALPHANUMERIC),
    )
}
