//! Serializers that turn a generated strategy into files people use:
//! a Markdown report, CSV sheets, and calendar feeds.
//!
//! Everything here is a pure function over the project snapshot. Calendar
//! dates come from each event's anchored `scheduled_date`; events without
//! one are mapped relative to the supplied anchor day.

mod calendar;
mod csv;
mod markdown;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rankplan_core::Project;
use thiserror::Error;

pub use calendar::{google_calendar_url, to_ics};
pub use csv::{calendar_csv, keywords_csv};
pub use markdown::to_markdown;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("project has no {0} yet; run the strategy before exporting it")]
    MissingStage(&'static str),

    #[error("unknown export format '{0}' (expected markdown, keywords-csv, calendar-csv or ics)")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    KeywordsCsv,
    CalendarCsv,
    Ics,
}

impl ExportFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::KeywordsCsv => "keywords-csv",
            ExportFormat::CalendarCsv => "calendar-csv",
            ExportFormat::Ics => "ics",
        }
    }

    /// File extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::KeywordsCsv | ExportFormat::CalendarCsv => "csv",
            ExportFormat::Ics => "ics",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "keywords-csv" | "keywords" => Ok(ExportFormat::KeywordsCsv),
            "calendar-csv" | "calendar" => Ok(ExportFormat::CalendarCsv),
            "ics" | "ical" => Ok(ExportFormat::Ics),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Render `project` in `format`. `now` stamps calendar feeds and anchors
/// events that carry no scheduled date.
///
/// # Errors
///
/// [`ExportError::MissingStage`] when the format needs a stage output the
/// project does not have yet.
pub fn export(
    project: &Project,
    format: ExportFormat,
    now: DateTime<Utc>,
) -> Result<String, ExportError> {
    let today = now.date_naive();
    match format {
        ExportFormat::Markdown => Ok(to_markdown(project)),
        ExportFormat::KeywordsCsv => project
            .data
            .keywords
            .as_ref()
            .map(keywords_csv)
            .ok_or(ExportError::MissingStage("keyword strategy")),
        ExportFormat::CalendarCsv => project
            .data
            .publishing_plan
            .as_ref()
            .map(|plan| calendar_csv(plan, today))
            .ok_or(ExportError::MissingStage("publishing calendar")),
        ExportFormat::Ics => project
            .data
            .publishing_plan
            .as_ref()
            .map(|plan| to_ics(plan, today, now))
            .ok_or(ExportError::MissingStage("publishing calendar")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rankplan_core::BusinessProfile;

    #[test]
    fn format_parses_names_and_aliases() {
        assert_eq!("markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("ICS".parse::<ExportFormat>().unwrap(), ExportFormat::Ics);
        assert_eq!(
            "keywords-csv".parse::<ExportFormat>().unwrap(),
            ExportFormat::KeywordsCsv
        );
        let err = "pdf".parse::<ExportFormat>().unwrap_err();
        assert!(err.to_string().contains("'pdf'"));
        assert_eq!(ExportFormat::CalendarCsv.extension(), "csv");
    }

    #[test]
    fn exporting_missing_stage_is_an_error() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        let project = Project::new(
            "owner",
            "Empty",
            BusinessProfile::new("HealthPlus Clinic", "Healthcare"),
            now,
        );

        let err = export(&project, ExportFormat::Ics, now).unwrap_err();
        assert!(matches!(err, ExportError::MissingStage("publishing calendar")));

        let report = export(&project, ExportFormat::Markdown, now).unwrap();
        assert!(report.starts_with("# HealthPlus Clinic"));
    }
}
