//! Integration tests for planning a broadcast day end to end.

use chrono::NaiveDate;
use indoc::indoc;
use playout_core::fill::fill;
use playout_core::schedule::resolve_active;
use playout_core::timeline::{active_segment_at, resolve};
use playout_core::validator::validate;
use playout_core::{
    Config, DayPlanner, DurationStatus, FillOutcome, LibrarySnapshot, MediaCatalog, Precedence,
    Program, RepeatPattern, ScheduleEntry, Segment,
};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn program_of(durations: &[f64]) -> Program {
    let segments = durations
        .iter()
        .enumerate()
        .map(|(i, &duration)| Segment {
            id: format!("s{i}"),
            media_id: None,
            source: format!("/media/{i}.mp4"),
            filename: None,
            duration,
            media_type: None,
            is_filler: false,
        })
        .collect();
    Program::new("test", None).with_segments(segments)
}

fn library_with_fillers() -> LibrarySnapshot {
    let mut media = Vec::new();
    for i in 0..30u32 {
        media.push(serde_json::json!({
            "id": format!("f{i}"),
            "filename": format!("filler-{i}.mp4"),
            "path": format!("/fillers/{i}.mp4"),
            "duration": 60 + i * 18,
            "media_type": "video",
            "is_filler": true
        }));
    }
    let json = serde_json::json!({
        "media": media,
        "programs": [
            {"id": "short", "name": "Short day", "content": {"program": [
                {"id": "main", "source": "/media/main.mp4", "duration": 80000}
            ]}}
        ],
        "schedule": [
            {"id": "d", "playlist_id": "short", "date": "2025-01-01", "repeat_pattern": "daily"}
        ]
    });
    serde_json::from_value(json).unwrap()
}

#[test]
fn test_short_day_is_filled_from_catalog() {
    let library = library_with_fillers();
    let plan = DayPlanner::new(&library).plan(date(2025, 5, 1)).unwrap();
    let scheduled = plan.scheduled.unwrap();
    assert_eq!(scheduled.validation.status, DurationStatus::Under);
    assert!(scheduled.validation.needs_filler());

    let pool = library.fillers().unwrap();
    for seed in 0..20 {
        let mut rng = Mcg128Xsl64::seed_from_u64(seed);
        let result = fill(&scheduled.program, &pool, &mut rng);

        match result.outcome {
            FillOutcome::Filled => {
                assert!((86_390.0..=86_700.0).contains(&result.new_total));
                let filled = result.applied_to(&scheduled.program);
                assert_eq!(validate(&filled).status, DurationStatus::Valid);
            }
            FillOutcome::Partial | FillOutcome::NoFit => {}
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(result.appended.iter().all(|s| s.is_filler));
    }
}

#[test]
fn test_long_day_is_left_alone() {
    let library = library_with_fillers();
    let program = program_of(&[90_000.0]);
    let mut rng = Mcg128Xsl64::seed_from_u64(1);

    let result = fill(&program, &library.fillers().unwrap(), &mut rng);
    assert_eq!(result.outcome, FillOutcome::AlreadyAtOrOverTarget);
    assert!(result.appended.is_empty());
    assert_eq!(result.new_total, 90_000.0);
}

#[test]
fn test_sequential_layout_and_midnight_lookup() {
    let timeline = resolve(&program_of(&[3_600.0, 1_800.0, 600.0]), 0.0);
    let starts: Vec<f64> = timeline.entries.iter().map(|e| e.absolute_start).collect();
    let ends: Vec<f64> = timeline.entries.iter().map(|e| e.absolute_end).collect();
    assert_eq!(starts, vec![0.0, 3_600.0, 5_400.0]);
    assert_eq!(ends, vec![3_600.0, 5_400.0, 6_000.0]);
    assert!(timeline.entries.iter().all(|e| !e.spans_midnight));

    let late = resolve(&program_of(&[1_000.0]), 86_000.0);
    let entry = &late.entries[0];
    assert_eq!(entry.absolute_end, 87_000.0);
    assert!(entry.spans_midnight);
    assert_eq!(active_segment_at(&late, 500.0).unwrap().segment_id, "s0");
    assert!(active_segment_at(&late, 700.0).is_none());
}

#[test]
fn test_weekly_recurrence() {
    let entries = vec![ScheduleEntry::new(
        "w",
        "p",
        date(2025, 1, 6),
        chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        RepeatPattern::Weekly,
    )];

    assert_eq!(resolve_active(&entries, date(2025, 1, 13)).len(), 1);
    assert_eq!(resolve_active(&entries, date(2025, 1, 20)).len(), 1);
    assert!(resolve_active(&entries, date(2025, 1, 7)).is_empty());
    assert!(resolve_active(&entries, date(2025, 1, 5)).is_empty());
}

#[test]
fn test_config_file_drives_planning() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        indoc! {r#"
            channel = "Test Channel"

            [day]
            target_secs = 3600.0

            [schedule]
            monthly_overflow = "clamp_to_month_end"
            precedence = "all"
        "#},
    )
    .unwrap();
    let mut config = Config::load_from(&path).unwrap();
    assert_eq!(config.schedule.precedence, Precedence::All);
    assert_eq!(config.fill.max_attempts, 200);

    let library: LibrarySnapshot = serde_json::from_str(indoc! {r#"
        {
            "programs": [
                {"id": "hour", "name": "Hour", "content": {"program": [
                    {"source": "/media/hour.mp4", "duration": "3600"}
                ]}},
                {"id": "morning", "name": "Morning", "content": {"program": [
                    {"source": "/media/morning.mp4", "duration": 1800}
                ]}}
            ],
            "schedule": [
                {"id": "m", "playlist_id": "hour", "date": "2025-01-31", "start_time": "10:00:00", "repeat_pattern": "monthly"},
                {"id": "d", "playlist_id": "morning", "date": "2025-01-01", "start_time": "06:00", "repeat_pattern": "daily"}
            ]
        }
    "#})
    .unwrap();

    // End of February only matches the day-31 anchor when clamping.
    let plan = DayPlanner::from_config(&library, &config)
        .plan(date(2025, 2, 28))
        .unwrap();
    assert_eq!(plan.active_entries.len(), 2);
    assert_eq!(plan.scheduled.as_ref().unwrap().entry.id, "d");

    config.set("schedule.precedence", "exact_date_first").unwrap();
    let plan = DayPlanner::from_config(&library, &config)
        .plan(date(2025, 2, 28))
        .unwrap();
    let scheduled = plan.scheduled.unwrap();
    assert_eq!(scheduled.entry.id, "m");
    assert_eq!(scheduled.validation.status, DurationStatus::Valid);
    assert_eq!(scheduled.timeline.entries[0].start_clock(), "10:00:00");

    config.set("schedule.monthly_overflow", "skip").unwrap();
    let plan = DayPlanner::from_config(&library, &config)
        .plan(date(2025, 2, 28))
        .unwrap();
    assert_eq!(plan.active_entries.len(), 1);
    assert_eq!(plan.scheduled.unwrap().entry.id, "d");
}

#[test]
fn test_malformed_segment_is_dropped_not_fatal() {
    let library: LibrarySnapshot = serde_json::from_str(indoc! {r#"
        {
            "programs": [
                {"id": "p", "name": "Mixed", "content": {"program": [
                    {"id": "ok1", "source": "/media/1.mp4", "duration": 600},
                    {"id": "bad", "source": "/media/2.mp4", "duration": "n/a"},
                    {"id": "ok2", "source": "/media/3.mp4", "duration": 300}
                ]}}
            ],
            "schedule": [{"id": "e", "playlist_id": "p", "date": "2025-03-01"}]
        }
    "#})
    .unwrap();

    let plan = DayPlanner::new(&library).plan(date(2025, 3, 1)).unwrap();
    let timeline = plan.scheduled.unwrap().timeline;

    assert_eq!(timeline.entries.len(), 2);
    assert_eq!(timeline.entries[1].segment_id, "ok2");
    assert_eq!(timeline.entries[1].absolute_start, 600.0);
    assert_eq!(timeline.warnings.len(), 1);
    assert_eq!(timeline.warnings[0].segment_id, "bad");
}
