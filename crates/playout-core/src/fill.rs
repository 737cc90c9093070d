//! Gap filling for under-filled broadcast days.
//!
//! Filler clips are offered in a random order (so repeated fills of similar
//! gaps do not always start with the same clip) and packed greedily with a
//! small overshoot allowance. The randomness source is always supplied by the
//! caller; pass a seeded generator such as `rand_pcg::Mcg128Xsl64` for
//! reproducible output.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::media::MediaItem;
use crate::program::{Program, Segment};
use crate::validator::DayTarget;

/// Packing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillPolicy {
    /// How far past the target a single accepted filler may push the total
    pub overshoot_allowance_secs: f64,
    /// Remaining gap considered close enough to the target
    pub residual_threshold_secs: f64,
    /// Attempts granted per filler in the pool
    pub attempts_per_filler: usize,
    /// Hard cap on attempts regardless of pool size
    pub max_attempts: usize,
}

impl Default for FillPolicy {
    fn default() -> Self {
        Self {
            overshoot_allowance_secs: 300.0,
            residual_threshold_secs: 10.0,
            attempts_per_filler: 2,
            max_attempts: 200,
        }
    }
}

impl FillPolicy {
    /// `min(pool_size * attempts_per_filler, max_attempts)`
    pub fn attempt_budget(&self, pool_size: usize) -> usize {
        pool_size
            .saturating_mul(self.attempts_per_filler)
            .min(self.max_attempts)
    }
}

/// How a fill ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOutcome {
    /// Remaining gap is within the residual threshold
    Filled,
    /// Attempts ran out with some fillers appended but the gap still open
    Partial,
    /// No filler in the pool fit the gap
    NoFit,
    /// Nothing to fill
    AlreadyAtOrOverTarget,
    /// The pool held no usable filler
    NoFillersAvailable,
}

/// Segments to append plus the resulting totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillResult {
    pub appended: Vec<Segment>,
    pub new_total: f64,
    pub remaining_gap: f64,
    pub attempts: usize,
    pub outcome: FillOutcome,
}

impl FillResult {
    fn untouched(total: f64, remaining_gap: f64, outcome: FillOutcome) -> Self {
        Self {
            appended: Vec::new(),
            new_total: total,
            remaining_gap,
            attempts: 0,
            outcome,
        }
    }

    /// Copy of `program` with the appended segments at the end.
    pub fn applied_to(&self, program: &Program) -> Program {
        let mut filled = program.clone();
        filled.extend_segments(self.appended.iter().cloned());
        filled
    }
}

/// Appends filler segments until a program reaches its day target.
#[derive(Debug, Clone, Default)]
pub struct GapFillEngine {
    target: DayTarget,
    policy: FillPolicy,
}

impl GapFillEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(target: DayTarget, policy: FillPolicy) -> Self {
        Self { target, policy }
    }

    pub fn policy(&self) -> FillPolicy {
        self.policy
    }

    /// Compute the filler segments that close the gap in `program`.
    ///
    /// `filler_pool` should hold the catalog's filler items; entries not
    /// flagged as filler or without a usable duration are ignored. The
    /// program itself is not modified.
    pub fn fill<R>(&self, program: &Program, filler_pool: &[MediaItem], rng: &mut R) -> FillResult
    where
        R: Rng + ?Sized,
    {
        let total = program.total_duration();
        let gap = self.target.target_secs - total;

        if gap <= self.policy.residual_threshold_secs {
            return FillResult::untouched(total, gap, FillOutcome::AlreadyAtOrOverTarget);
        }

        let mut candidates: Vec<&MediaItem> = filler_pool
            .iter()
            .filter(|item| item.is_filler && item.has_usable_duration())
            .collect();
        if candidates.is_empty() {
            return FillResult::untouched(total, gap, FillOutcome::NoFillersAvailable);
        }

        candidates.shuffle(rng);

        let budget = self.policy.attempt_budget(candidates.len());
        let mut remaining = gap;
        let mut attempts = 0;
        let mut appended = Vec::new();

        while remaining > self.policy.residual_threshold_secs && attempts < budget {
            let candidate = candidates[attempts % candidates.len()];
            attempts += 1;

            if candidate.duration > remaining + self.policy.overshoot_allowance_secs {
                continue;
            }
            let Ok(segment) = Segment::from_media(candidate) else {
                continue;
            };

            remaining -= candidate.duration;
            debug!(
                filler = %candidate.filename,
                duration = candidate.duration,
                remaining,
                "accepted filler"
            );
            appended.push(segment);
        }

        let outcome = if appended.is_empty() {
            FillOutcome::NoFit
        } else if remaining <= self.policy.residual_threshold_secs {
            FillOutcome::Filled
        } else {
            FillOutcome::Partial
        };

        let added = appended.iter().fold(0.0, |acc, s: &Segment| acc + s.duration);
        info!(
            program = %program.name,
            appended = appended.len(),
            attempts,
            remaining,
            ?outcome,
            "gap fill finished"
        );

        FillResult {
            appended,
            new_total: total + added,
            remaining_gap: remaining,
            attempts,
            outcome,
        }
    }
}

/// Fill with the default 24h target and packing policy.
pub fn fill<R>(program: &Program, filler_pool: &[MediaItem], rng: &mut R) -> FillResult
where
    R: Rng + ?Sized,
{
    GapFillEngine::new().fill(program, filler_pool, rng)
}
