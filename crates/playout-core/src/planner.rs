//! Day planning over the collaborator stores.
//!
//! Ties the components together for one calendar date: resolve which
//! schedule entries apply, pick the governing one, load its program, validate
//! it and lay it out from the entry's start time.
//!
//! "What is on air" follows the clock instead: the entry that most recently
//! started plays until the next one starts.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::program::Program;
use crate::schedule::{RecurrenceResolver, RejectedEntry, ScheduleEntry};
use crate::storage::Config;
use crate::store::{ProgramStore, ScheduleStore};
use crate::timeline::{self, time_to_secs, NowPlaying, Timeline};
use crate::validator::{DurationValidator, ValidationReport, BROADCAST_DAY_SECS};

/// The program governing a date, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledProgram {
    pub entry: ScheduleEntry,
    pub program_id: String,
    pub program: Program,
    pub validation: ValidationReport,
    pub timeline: Timeline,
}

/// Everything known about one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    /// Every matching entry, ordered by start time
    pub active_entries: Vec<ScheduleEntry>,
    pub scheduled: Option<ScheduledProgram>,
}

impl DayPlan {
    pub fn is_ambiguous(&self) -> bool {
        self.active_entries.len() > 1
    }
}

/// Plans calendar dates against a program and schedule store.
pub struct DayPlanner<'a, S: ?Sized> {
    store: &'a S,
    validator: DurationValidator,
    resolver: RecurrenceResolver,
}

impl<'a, S> DayPlanner<'a, S>
where
    S: ProgramStore + ScheduleStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            validator: DurationValidator::new(),
            resolver: RecurrenceResolver::new(),
        }
    }

    pub fn from_config(store: &'a S, config: &Config) -> Self {
        Self {
            store,
            validator: DurationValidator::with_target(config.day_target()),
            resolver: config.recurrence_resolver(),
        }
    }

    /// Resolve `date` into its governing program and timeline.
    ///
    /// A date without schedule entries is a valid plan with nothing
    /// scheduled.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ProgramNotFound`] when the governing entry points
    /// at a program the store does not have, and propagates store errors.
    pub fn plan(&self, date: NaiveDate) -> Result<DayPlan> {
        let entries = self.store.schedule()?;
        let day = self.resolver.resolve_day(&entries, date);

        let scheduled = match day.governing {
            Some(entry) => Some(self.load_scheduled(entry)?),
            None => {
                debug!(%date, "no schedule entry applies");
                None
            }
        };

        Ok(DayPlan {
            date,
            active_entries: day.active.into_iter().cloned().collect(),
            scheduled,
        })
    }

    /// The schedule entry governing `date`, without loading its program.
    pub fn governing_entry(&self, date: NaiveDate) -> Result<Option<ScheduleEntry>> {
        let entries = self.store.schedule()?;
        Ok(self.resolver.resolve_day(&entries, date).governing.cloned())
    }

    /// Schedule records the store could not read.
    pub fn rejected_records(&self) -> Result<Vec<RejectedEntry>> {
        self.store.rejected()
    }

    /// What is on air on `date`, `t` seconds after midnight.
    ///
    /// The entry with the latest start time at or before `t` plays; ties on
    /// start time go by precedence. Before the first start of the day the
    /// previous day's last entry is still running, which covers programs
    /// that carry on past midnight. `None` when the chosen program has
    /// already run out or nothing has ever started.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ProgramNotFound`] when the playing entry points at
    /// a missing program.
    pub fn on_air(&self, date: NaiveDate, t: f64) -> Result<Option<NowPlaying>> {
        let t = if t.is_finite() {
            t.rem_euclid(BROADCAST_DAY_SECS)
        } else {
            0.0
        };
        let now = NaiveTime::from_num_seconds_from_midnight_opt(t.floor() as u32, 0)
            .unwrap_or(NaiveTime::MIN);
        let entries = self.store.schedule()?;

        let (entry, elapsed) = match self.resolver.entry_at(&entries, date, now) {
            Some(entry) => (entry, t - time_to_secs(entry.start_time)),
            None => {
                let previous = date
                    .pred_opt()
                    .and_then(|day| self.resolver.entry_at(&entries, day, last_second()));
                match previous {
                    Some(entry) => (
                        entry,
                        t + BROADCAST_DAY_SECS - time_to_secs(entry.start_time),
                    ),
                    None => {
                        debug!(%date, t, "nothing has started yet");
                        return Ok(None);
                    }
                }
            }
        };

        debug!(%date, t, entry = %entry.id, elapsed, "entry on air");
        Ok(self.load_scheduled(entry)?.timeline.at_elapsed(elapsed))
    }

    fn load_scheduled(&self, entry: &ScheduleEntry) -> Result<ScheduledProgram> {
        let stored = self
            .store
            .program(&entry.playlist_id)?
            .ok_or_else(|| CoreError::ProgramNotFound {
                id: entry.playlist_id.clone(),
            })?;

        let program = stored.to_program();
        let validation = self.validator.validate(&program);
        let timeline = timeline::resolve(&program, time_to_secs(entry.start_time));

        Ok(ScheduledProgram {
            entry: entry.clone(),
            program_id: stored.id,
            program,
            validation,
            timeline,
        })
    }
}

fn last_second() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}
