//! Coverage gap detection on the broadcast day.
//!
//! Finds spans of the day where nothing from the program is on air. A gap is
//! a valid, reportable state (an incomplete program), not an error.

use serde::{Deserialize, Serialize};

use super::{format_clock, TimelineEntry};
use crate::validator::BROADCAST_DAY_SECS;

/// An uncovered span, in seconds of the broadcast day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageGap {
    pub start: f64,
    pub end: f64,
}

impl CoverageGap {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// `HH:MM:SS-HH:MM:SS`
    pub fn label(&self) -> String {
        let end = if self.end >= BROADCAST_DAY_SECS {
            "24:00:00".to_string()
        } else {
            format_clock(self.end)
        };
        format!("{}-{}", format_clock(self.start), end)
    }
}

/// Detector for uncovered spans of a timeline.
pub struct CoverageGapDetector {
    /// Minimum gap duration to report (seconds)
    min_gap_secs: f64,
}

impl CoverageGapDetector {
    /// Create a new detector reporting gaps of one second or more
    pub fn new() -> Self {
        Self { min_gap_secs: 1.0 }
    }

    /// Set the minimum gap duration
    pub fn with_min_gap(mut self, seconds: f64) -> Self {
        self.min_gap_secs = seconds;
        self
    }

    /// Find uncovered spans in `[0, 86400)`, sorted by start.
    ///
    /// Entries crossing midnight cover both the tail of the day and its head.
    pub fn find_gaps(&self, entries: &[TimelineEntry]) -> Vec<CoverageGap> {
        let mut spans: Vec<(f64, f64)> = Vec::with_capacity(entries.len() * 2);
        for entry in entries {
            spans.push((entry.absolute_start, entry.absolute_end.min(BROADCAST_DAY_SECS)));
            if entry.spans_midnight {
                let head_end = (entry.absolute_end - BROADCAST_DAY_SECS).min(BROADCAST_DAY_SECS);
                spans.push((0.0, head_end));
            }
        }
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut gaps = Vec::new();
        let mut last_end = 0.0;

        for (start, end) in spans {
            // Skip spans already covered
            if end <= last_end {
                continue;
            }

            if start > last_end {
                self.push_gap(&mut gaps, last_end, start);
            }

            last_end = end;
        }

        // Check for gap after last span
        if last_end < BROADCAST_DAY_SECS {
            self.push_gap(&mut gaps, last_end, BROADCAST_DAY_SECS);
        }

        gaps
    }

    fn push_gap(&self, gaps: &mut Vec<CoverageGap>, start: f64, end: f64) {
        let gap = CoverageGap { start, end };
        if gap.duration() >= self.min_gap_secs {
            gaps.push(gap);
        }
    }
}

impl Default for CoverageGapDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(start: f64, duration: f64) -> TimelineEntry {
        let end = start + duration;
        TimelineEntry {
            index: 0,
            segment_id: format!("at-{start}"),
            name: "clip".into(),
            source: "/media/clip.mp4".into(),
            is_filler: false,
            duration,
            absolute_start: start,
            absolute_end: end,
            spans_midnight: end > BROADCAST_DAY_SECS,
        }
    }

    #[test]
    fn empty_day_is_one_gap() {
        let gaps = CoverageGapDetector::new().find_gaps(&[]);
        assert_eq!(gaps, vec![CoverageGap { start: 0.0, end: 86_400.0 }]);
        assert_eq!(gaps[0].label(), "00:00:00-24:00:00");
    }

    #[test]
    fn finds_head_middle_and_tail_gaps() {
        let entries = vec![entry(3_600.0, 3_600.0), entry(10_800.0, 3_600.0)];
        let gaps = CoverageGapDetector::new().find_gaps(&entries);

        assert_eq!(
            gaps,
            vec![
                CoverageGap { start: 0.0, end: 3_600.0 },
                CoverageGap { start: 7_200.0, end: 10_800.0 },
                CoverageGap { start: 14_400.0, end: 86_400.0 },
            ]
        );
    }

    #[test]
    fn midnight_span_covers_head_of_day() {
        let entries = vec![entry(1_000.0, 85_000.0), entry(86_000.0, 1_000.0)];
        assert!(CoverageGapDetector::new().find_gaps(&entries).is_empty());
    }

    #[test]
    fn min_gap_filters_slivers() {
        let entries = vec![entry(0.0, 43_200.0), entry(43_200.5, 43_199.5)];
        assert_eq!(CoverageGapDetector::new().find_gaps(&entries).len(), 0);
        assert_eq!(
            CoverageGapDetector::new()
                .with_min_gap(0.1)
                .find_gaps(&entries)
                .len(),
            1
        );
    }
}
