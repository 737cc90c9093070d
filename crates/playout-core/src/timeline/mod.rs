//! Wall-clock timeline of a program.
//!
//! This module provides:
//! - Resolution of a program into absolute start/end times within the
//!   broadcast day
//! - Point queries ("what is playing at t") shared by the EPG block layout
//!   and the live position
//! - Detection of uncovered spans of the day

mod clock;
mod gap;

pub use clock::{format_clock, parse_clock, time_to_secs};
pub use gap::{CoverageGap, CoverageGapDetector};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::program::Program;
use crate::validator::BROADCAST_DAY_SECS;

/// A segment placed on the broadcast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Position of the segment in the program
    pub index: usize,
    pub segment_id: String,
    pub name: String,
    pub source: String,
    pub is_filler: bool,
    pub duration: f64,
    /// Seconds from broadcast-day start, in `[0, 86400)`
    pub absolute_start: f64,
    /// `absolute_start + duration`; exceeds 86400 when the segment crosses midnight
    pub absolute_end: f64,
    pub spans_midnight: bool,
}

impl TimelineEntry {
    /// Whether this entry is on air at second `t` of the broadcast day.
    pub fn contains(&self, t: f64) -> bool {
        let t = normalize(t);
        if self.absolute_start <= t && t < self.absolute_end {
            return true;
        }
        self.spans_midnight && t < self.absolute_end - BROADCAST_DAY_SECS
    }

    pub fn start_clock(&self) -> String {
        format_clock(self.absolute_start)
    }

    pub fn end_clock(&self) -> String {
        format_clock(self.absolute_end)
    }
}

/// A segment left out of the timeline and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineWarning {
    pub index: usize,
    pub segment_id: String,
    pub reason: String,
}

/// The entry on air at a given instant plus its progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub entry: TimelineEntry,
    pub elapsed: f64,
    pub remaining: f64,
}

/// Derived, read-only view of a program laid out on the broadcast day.
///
/// Always recomputed from the program; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub day_start_offset: f64,
    pub entries: Vec<TimelineEntry>,
    #[serde(default)]
    pub warnings: Vec<TimelineWarning>,
}

impl Timeline {
    /// First entry on air at second `t`; `None` for an uncovered instant.
    pub fn active_segment_at(&self, t: f64) -> Option<&TimelineEntry> {
        self.entries.iter().find(|entry| entry.contains(t))
    }

    /// Like [`Timeline::active_segment_at`] with elapsed/remaining seconds.
    pub fn now_playing(&self, t: f64) -> Option<NowPlaying> {
        let entry = self.active_segment_at(t)?;
        let t = normalize(t);
        let elapsed = if t >= entry.absolute_start {
            t - entry.absolute_start
        } else {
            t + BROADCAST_DAY_SECS - entry.absolute_start
        };

        Some(NowPlaying {
            entry: entry.clone(),
            elapsed,
            remaining: entry.duration - elapsed,
        })
    }

    /// The entry playing `elapsed` seconds after the program started.
    ///
    /// Counts along the laid-out entries instead of the wall clock, so a
    /// program that started yesterday can be queried after midnight.
    /// `None` once the program has run out.
    pub fn at_elapsed(&self, elapsed: f64) -> Option<NowPlaying> {
        if !elapsed.is_finite() || elapsed < 0.0 {
            return None;
        }
        let mut start = 0.0;
        for entry in &self.entries {
            let end = start + entry.duration;
            if elapsed < end {
                return Some(NowPlaying {
                    entry: entry.clone(),
                    elapsed: elapsed - start,
                    remaining: end - elapsed,
                });
            }
            start = end;
        }
        None
    }

    /// Entry laid out for the program segment at `index`, if it was kept.
    pub fn block(&self, index: usize) -> Option<&TimelineEntry> {
        self.entries.iter().find(|entry| entry.index == index)
    }

    pub fn total_duration(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, e| acc + e.duration)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Uncovered spans of the day of at least one second.
    pub fn coverage_gaps(&self) -> Vec<CoverageGap> {
        CoverageGapDetector::new().find_gaps(&self.entries)
    }
}

/// Lay out `program` starting `day_start_offset` seconds into the broadcast day.
///
/// Segments with a malformed duration are skipped with a warning and do not
/// advance the running offset; the rest of the program is still laid out.
pub fn resolve(program: &Program, day_start_offset: f64) -> Timeline {
    let offset = if day_start_offset.is_finite() {
        day_start_offset
    } else {
        0.0
    };

    let mut entries = Vec::with_capacity(program.segments.len());
    let mut warnings = Vec::new();
    let mut cumulative = 0.0;

    for (index, segment) in program.segments.iter().enumerate() {
        if !segment.has_usable_duration() {
            let reason = format!("duration {} is not a positive number of seconds", segment.duration);
            warn!(
                program = %program.name,
                index,
                segment = %segment.id,
                %reason,
                "segment dropped from timeline"
            );
            warnings.push(TimelineWarning {
                index,
                segment_id: segment.id.clone(),
                reason,
            });
            continue;
        }

        let absolute_start = normalize(offset + cumulative);
        let absolute_end = absolute_start + segment.duration;

        entries.push(TimelineEntry {
            index,
            segment_id: segment.id.clone(),
            name: segment.display_name().to_string(),
            source: segment.source.clone(),
            is_filler: segment.is_filler,
            duration: segment.duration,
            absolute_start,
            absolute_end,
            spans_midnight: absolute_end > BROADCAST_DAY_SECS,
        });
        cumulative += segment.duration;
    }

    Timeline {
        day_start_offset: normalize(offset),
        entries,
        warnings,
    }
}

/// Free-function form of [`Timeline::active_segment_at`].
pub fn active_segment_at(timeline: &Timeline, t: f64) -> Option<&TimelineEntry> {
    timeline.active_segment_at(t)
}

fn normalize(t: f64) -> f64 {
    t.rem_euclid(BROADCAST_DAY_SECS)
}
