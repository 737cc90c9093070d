//! Broadcast-day duration validation.
//!
//! A program is meant to fill one broadcast day. The verdict is advisory: an
//! under- or over-filled program is still a usable program.

use serde::{Deserialize, Serialize};

use crate::program::{format_duration, Program};

/// One broadcast day in seconds.
pub const BROADCAST_DAY_SECS: f64 = 86_400.0;

/// Target duration and the tolerance band around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayTarget {
    pub target_secs: f64,
    /// Fraction of `target_secs` allowed either way (0.05 = ±5%)
    pub tolerance_ratio: f64,
}

impl Default for DayTarget {
    fn default() -> Self {
        Self {
            target_secs: BROADCAST_DAY_SECS,
            tolerance_ratio: 0.05,
        }
    }
}

impl DayTarget {
    pub fn tolerance_secs(&self) -> f64 {
        self.target_secs * self.tolerance_ratio
    }
}

/// Where a program's total lies relative to the tolerance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationStatus {
    Valid,
    Under,
    Over,
}

/// Result of validating a program against the day target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total: f64,
    pub target: f64,
    /// `total - target`; negative when the day is under-filled
    pub deviation: f64,
    pub status: DurationStatus,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.status == DurationStatus::Valid
    }

    /// True whenever the program is short of the target, even inside the band.
    pub fn needs_filler(&self) -> bool {
        self.deviation < 0.0
    }

    pub fn deviation_formatted(&self) -> String {
        format_duration(self.deviation)
    }
}

/// Validates program totals against a [`DayTarget`].
#[derive(Debug, Clone, Default)]
pub struct DurationValidator {
    target: DayTarget,
}

impl DurationValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(target: DayTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> DayTarget {
        self.target
    }

    pub fn validate(&self, program: &Program) -> ValidationReport {
        self.validate_total(program.total_duration())
    }

    /// Classify a raw total, for callers that already summed it.
    pub fn validate_total(&self, total: f64) -> ValidationReport {
        let tolerance = self.target.tolerance_secs();
        let deviation = total - self.target.target_secs;

        let status = if deviation < -tolerance {
            DurationStatus::Under
        } else if deviation > tolerance {
            DurationStatus::Over
        } else {
            DurationStatus::Valid
        };

        ValidationReport {
            total,
            target: self.target.target_secs,
            deviation,
            status,
        }
    }
}

/// Validate against the default 24h ±5% target.
pub fn validate(program: &Program) -> ValidationReport {
    DurationValidator::new().validate(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Segment;
    use proptest::prelude::*;

    fn program_of(durations: &[f64]) -> Program {
        let segments = durations
            .iter()
            .enumerate()
            .map(|(i, d)| Segment {
                id: format!("s{i}"),
                media_id: None,
                source: format!("/media/{i}.mp4"),
                filename: None,
                duration: *d,
                media_type: None,
                is_filler: false,
            })
            .collect();
        Program::new("test", None).with_segments(segments)
    }

    #[test]
    fn empty_program_is_under_with_zero_total() {
        let report = validate(&Program::new("empty", None));
        assert_eq!(report.total, 0.0);
        assert!(report.total.is_sign_positive());
        assert_eq!(serde_json::to_string(&report.total).unwrap(), "0.0");
        assert_eq!(report.status, DurationStatus::Under);
        assert_eq!(report.deviation, -86_400.0);
        assert!(report.needs_filler());
    }

    #[test]
    fn band_edges_are_inclusive() {
        let validator = DurationValidator::new();
        assert_eq!(validator.validate_total(82_080.0).status, DurationStatus::Valid);
        assert_eq!(validator.validate_total(90_720.0).status, DurationStatus::Valid);
        assert_eq!(validator.validate_total(82_079.9).status, DurationStatus::Under);
        assert_eq!(validator.validate_total(90_720.1).status, DurationStatus::Over);
    }

    #[test]
    fn deviation_is_total_minus_target() {
        let report = validate(&program_of(&[43_200.0, 43_200.0, 600.0]));
        assert_eq!(report.total, 87_000.0);
        assert_eq!(report.deviation, 600.0);
        assert!(report.is_valid());
        assert!(!report.needs_filler());
        assert_eq!(report.deviation_formatted(), "0h 10m 0s");
    }

    #[test]
    fn custom_target_scales_tolerance() {
        let validator = DurationValidator::with_target(DayTarget {
            target_secs: 3_600.0,
            tolerance_ratio: 0.1,
        });
        assert_eq!(validator.validate_total(3_200.0).status, DurationStatus::Under);
        assert_eq!(validator.validate_total(3_250.0).status, DurationStatus::Valid);
        assert_eq!(validator.validate_total(3_961.0).status, DurationStatus::Over);
    }

    proptest! {
        #[test]
        fn valid_iff_within_five_percent(total in 0u32..200_000u32) {
            let total = total as f64;
            let report = DurationValidator::new().validate_total(total);
            let inside = (82_080.0..=90_720.0).contains(&total);
            prop_assert_eq!(report.status == DurationStatus::Valid, inside);
            if !inside {
                let expected = if total < 82_080.0 { DurationStatus::Under } else { DurationStatus::Over };
                prop_assert_eq!(report.status, expected);
            }
        }
    }
}
