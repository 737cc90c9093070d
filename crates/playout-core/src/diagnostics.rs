//! Playout diagnostics report.
//!
//! Answers "why is nothing (or the wrong thing) on air" for a date: which
//! schedule entry governs, which program it points at, which of the
//! program's files are missing and what looked suspicious along the way.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, Result};
use crate::planner::DayPlanner;
use crate::schedule::RejectedEntry;
use crate::store::{ProgramStore, ScheduleStore};
use crate::validator::DurationStatus;

/// Diagnostics for one planned day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoutDiagnostics {
    pub date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub has_active_schedule: bool,
    pub schedule_entry_id: Option<String>,
    /// Program referenced by the governing entry, even when it is missing
    pub program_id: Option<String>,
    pub has_program: bool,
    pub segment_count: usize,
    /// Segment sources that do not exist
    pub missing_media: Vec<String>,
    /// Schedule records dropped because they could not be read
    pub rejected_records: Vec<RejectedEntry>,
    pub warnings: Vec<String>,
}

impl PlayoutDiagnostics {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            generated_at: Utc::now(),
            has_active_schedule: false,
            schedule_entry_id: None,
            program_id: None,
            has_program: false,
            segment_count: 0,
            missing_media: Vec::new(),
            rejected_records: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Nothing missing and nothing suspicious.
    pub fn is_healthy(&self) -> bool {
        self.has_program && self.missing_media.is_empty() && self.warnings.is_empty()
    }
}

/// Check whether a segment source exists on the local filesystem.
pub fn path_exists(source: &str) -> bool {
    std::path::Path::new(source).exists()
}

/// Build the diagnostics report for `date`.
///
/// `exists` decides whether a segment source is present; pass
/// [`path_exists`] to check the local filesystem.
///
/// A governing entry that points at a missing program is reported as a
/// warning rather than an error. Store failures still propagate.
pub fn diagnose<S, F>(
    planner: &DayPlanner<'_, S>,
    date: NaiveDate,
    exists: F,
) -> Result<PlayoutDiagnostics>
where
    S: ProgramStore + ScheduleStore + ?Sized,
    F: Fn(&str) -> bool,
{
    let mut report = PlayoutDiagnostics::empty(date);

    for record in planner.rejected_records()? {
        report.warnings.push(format!(
            "Schedule record {} ignored: {}",
            record.id.as_deref().unwrap_or("(no id)"),
            record.reason
        ));
        report.rejected_records.push(record);
    }

    let plan = match planner.plan(date) {
        Ok(plan) => plan,
        Err(CoreError::ProgramNotFound { id }) => {
            let governing = planner.governing_entry(date)?;
            report.has_active_schedule = true;
            report.schedule_entry_id = governing.map(|entry| entry.id);
            report
                .warnings
                .push(format!("Program {id} referenced by the schedule does not exist"));
            report.program_id = Some(id);
            return Ok(report);
        }
        Err(err) => return Err(err),
    };

    if plan.active_entries.is_empty() {
        report.warnings.push(format!("No active schedule for {date}"));
        return Ok(report);
    }
    report.has_active_schedule = true;

    if plan.is_ambiguous() {
        let ids: Vec<&str> = plan.active_entries.iter().map(|e| e.id.as_str()).collect();
        report
            .warnings
            .push(format!("{} schedule entries apply: {}", ids.len(), ids.join(", ")));
    }

    let Some(scheduled) = plan.scheduled else {
        return Ok(report);
    };

    report.schedule_entry_id = Some(scheduled.entry.id.clone());
    report.program_id = Some(scheduled.program_id.clone());
    report.has_program = true;
    report.segment_count = scheduled.program.len();

    if scheduled.program.is_empty() {
        report.warnings.push("Program has no segments".to_string());
    }

    for segment in &scheduled.program.segments {
        if segment.source.is_empty() {
            report
                .warnings
                .push(format!("Segment {} has no source path", segment.id));
        } else if !exists(&segment.source) {
            report.missing_media.push(segment.source.clone());
        }
    }

    for warning in &scheduled.timeline.warnings {
        report.warnings.push(format!(
            "Segment {} ({}) skipped: {}",
            warning.index, warning.segment_id, warning.reason
        ));
    }

    match scheduled.validation.status {
        DurationStatus::Valid => {}
        DurationStatus::Under => report.warnings.push(format!(
            "Program is short of the broadcast day by {}",
            scheduled.validation.deviation_formatted()
        )),
        DurationStatus::Over => report.warnings.push(format!(
            "Program exceeds the broadcast day by {}",
            scheduled.validation.deviation_formatted()
        )),
    }

    if !report.missing_media.is_empty() {
        warn!(%date, missing = report.missing_media.len(), "program references missing media");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LibrarySnapshot;

    fn library() -> LibrarySnapshot {
        LibrarySnapshot::from_json_str(
            r#"{
            "programs": [
                {"id": "full", "name": "Full", "content": {"program": [
                    {"id": "a", "source": "/media/a.mp4", "duration": 43200},
                    {"id": "b", "source": "/media/b.mp4", "duration": 43200}
                ]}},
                {"id": "broken", "name": "Broken", "content": {"program": [
                    {"id": "c", "source": "/media/c.mp4", "duration": "abc"},
                    {"id": "d", "source": "", "duration": 600}
                ]}}
            ],
            "schedule": [
                {"id": "daily", "playlist_id": "full", "date": "2025-03-01", "repeat_pattern": "daily"},
                {"id": "once", "playlist_id": "broken", "date": "2025-03-05"},
                {"id": "ghost", "playlist_id": "nope", "date": "2025-02-01"}
            ]
        }"#,
        )
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn healthy_day_reports_program() {
        let library = library();
        let planner = DayPlanner::new(&library);

        let report = diagnose(&planner, date(2025, 3, 2), |_| true).unwrap();
        assert!(report.has_active_schedule);
        assert_eq!(report.schedule_entry_id.as_deref(), Some("daily"));
        assert_eq!(report.program_id.as_deref(), Some("full"));
        assert_eq!(report.segment_count, 2);
        assert!(report.is_healthy());
    }

    #[test]
    fn missing_files_are_listed() {
        let library = library();
        let planner = DayPlanner::new(&library);

        let report = diagnose(&planner, date(2025, 3, 2), |p| p != "/media/b.mp4").unwrap();
        assert_eq!(report.missing_media, vec!["/media/b.mp4".to_string()]);
        assert!(!report.is_healthy());
    }

    #[test]
    fn unscheduled_day_warns() {
        let library = library();
        let planner = DayPlanner::new(&library);

        let report = diagnose(&planner, date(2025, 1, 1), |_| true).unwrap();
        assert!(!report.has_active_schedule);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("No active schedule"));
    }

    #[test]
    fn ambiguity_malformed_segments_and_short_day_are_warned() {
        let library = library();
        let planner = DayPlanner::new(&library);

        let report = diagnose(&planner, date(2025, 3, 5), |_| true).unwrap();
        assert_eq!(report.program_id.as_deref(), Some("broken"));
        assert!(report.warnings.iter().any(|w| w.contains("2 schedule entries apply")));
        assert!(report.warnings.iter().any(|w| w.contains("has no source path")));
        assert!(report.warnings.iter().any(|w| w.contains("skipped")));
        assert!(report.warnings.iter().any(|w| w.contains("short of the broadcast day")));
    }

    #[test]
    fn unreadable_schedule_record_is_reported() {
        let library = LibrarySnapshot::from_json_str(
            r#"{
            "programs": [
                {"id": "full", "name": "Full", "content": {"program": [
                    {"id": "a", "source": "/media/a.mp4", "duration": 86400}
                ]}}
            ],
            "schedule": [
                {"id": "daily", "playlist_id": "full", "date": "2025-03-01", "repeat_pattern": "daily"},
                {"id": "typo", "playlist_id": "full", "date": "2025-03-02", "repeat_pattern": "hourly"}
            ]
        }"#,
        )
        .unwrap();
        let planner = DayPlanner::new(&library);

        let report = diagnose(&planner, date(2025, 3, 2), |_| true).unwrap();
        assert!(report.has_program);
        assert_eq!(report.schedule_entry_id.as_deref(), Some("daily"));
        assert_eq!(report.rejected_records.len(), 1);
        assert_eq!(report.rejected_records[0].id.as_deref(), Some("typo"));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("typo"));
        assert!(!report.is_healthy());
    }

    #[test]
    fn dangling_program_becomes_warning() {
        let mut library = library();
        library.schedule.retain(|e| e.id == "ghost");
        let planner = DayPlanner::new(&library);

        let report = diagnose(&planner, date(2025, 2, 1), |_| true).unwrap();
        assert!(report.has_active_schedule);
        assert!(!report.has_program);
        assert_eq!(report.schedule_entry_id.as_deref(), Some("ghost"));
        assert_eq!(report.program_id.as_deref(), Some("nope"));
        assert!(report.warnings[0].contains("does not exist"));
    }
}
