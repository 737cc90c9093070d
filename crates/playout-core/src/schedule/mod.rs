//! Schedule entries and calendar recurrence.
//!
//! A [`ScheduleEntry`] binds a program to a date, optionally repeating daily,
//! weekly or monthly from that date onwards. [`RecurrenceResolver`] answers
//! which entries apply to a given calendar date.

use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::ValidationError;

/// How a schedule entry repeats after its anchor date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatPattern {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl RepeatPattern {
    /// Parse the stored optional form; `None` and `""` mean no repetition.
    pub fn from_stored(value: Option<&str>) -> Result<Self, ValidationError> {
        match value {
            None => Ok(Self::None),
            Some(s) => s.parse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn is_recurring(&self) -> bool {
        *self != Self::None
    }

    /// Rank used for precedence: the narrower the pattern, the higher.
    fn specificity(&self) -> u8 {
        match self {
            Self::None => 3,
            Self::Monthly => 2,
            Self::Weekly => 1,
            Self::Daily => 0,
        }
    }
}

impl FromStr for RepeatPattern {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ValidationError::UnknownRepeatPattern(s.to_string())),
        }
    }
}

/// A program bound to a calendar date.
///
/// Entries are never edited in place; rescheduling is delete + create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default)]
    pub id: String,
    pub playlist_id: String,
    pub date: NaiveDate,
    /// Missing start times mean midnight
    #[serde(default = "midnight", deserialize_with = "stored_start_time")]
    pub start_time: NaiveTime,
    #[serde(default, deserialize_with = "stored_repeat_pattern")]
    pub repeat_pattern: RepeatPattern,
}

impl ScheduleEntry {
    pub fn new(
        id: impl Into<String>,
        playlist_id: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        repeat_pattern: RepeatPattern,
    ) -> Self {
        Self {
            id: id.into(),
            playlist_id: playlist_id.into(),
            date,
            start_time,
            repeat_pattern,
        }
    }
}

/// What a monthly entry anchored on the 29th-31st does in shorter months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyOverflow {
    /// No occurrence in months without that day
    #[default]
    Skip,
    /// Occur on the last day of the shorter month
    ClampToMonthEnd,
}

/// How the governing entry is picked when several match one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    /// Exact-date entries beat recurring ones; narrower patterns beat wider
    /// ones, then the latest anchor date, then the earliest start time
    #[default]
    ExactDateFirst,
    /// No preference: the first match in start-time order governs
    All,
}

/// Every entry matching a date plus the one chosen to govern it.
#[derive(Debug, Clone, PartialEq)]
pub struct DayResolution<'a> {
    pub date: NaiveDate,
    /// Ordered by start time
    pub active: Vec<&'a ScheduleEntry>,
    pub governing: Option<&'a ScheduleEntry>,
}

impl DayResolution<'_> {
    /// More than one entry applies; the caller should surface this.
    pub fn is_ambiguous(&self) -> bool {
        self.active.len() > 1
    }
}

/// Matches schedule entries against calendar dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecurrenceResolver {
    monthly_overflow: MonthlyOverflow,
    precedence: Precedence,
}

impl RecurrenceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_monthly_overflow(mut self, overflow: MonthlyOverflow) -> Self {
        self.monthly_overflow = overflow;
        self
    }

    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Whether `entry` applies on `date`.
    pub fn matches(&self, entry: &ScheduleEntry, date: NaiveDate) -> bool {
        match entry.repeat_pattern {
            RepeatPattern::None => entry.date == date,
            RepeatPattern::Daily => entry.date <= date,
            RepeatPattern::Weekly => entry.date <= date && entry.date.weekday() == date.weekday(),
            RepeatPattern::Monthly => entry.date <= date && self.monthly_day_matches(entry.date, date),
        }
    }

    /// All entries applying on `date`, ordered by start time ascending.
    ///
    /// No deduplication and no precedence: overlapping entries all appear.
    pub fn resolve_active<'a>(
        &self,
        entries: &'a [ScheduleEntry],
        date: NaiveDate,
    ) -> Vec<&'a ScheduleEntry> {
        let mut active: Vec<&ScheduleEntry> = entries
            .iter()
            .filter(|entry| self.matches(entry, date))
            .collect();
        active.sort_by_key(|entry| entry.start_time);
        active
    }

    /// Active entries plus the governing one under the configured precedence.
    pub fn resolve_day<'a>(&self, entries: &'a [ScheduleEntry], date: NaiveDate) -> DayResolution<'a> {
        let active = self.resolve_active(entries, date);

        let governing = self.pick(active.iter().copied());

        if active.len() > 1 {
            warn!(
                %date,
                matches = active.len(),
                governing = governing.map(|e| e.id.as_str()).unwrap_or(""),
                "several schedule entries apply to one date"
            );
        }

        DayResolution {
            date,
            active,
            governing,
        }
    }

    /// The entry that has most recently started on `date` as of `time`.
    ///
    /// Among entries active on `date` with `start_time <= time`, the latest
    /// start wins; entries sharing that start are decided by the configured
    /// precedence. `None` when nothing has started yet.
    pub fn entry_at<'a>(
        &self,
        entries: &'a [ScheduleEntry],
        date: NaiveDate,
        time: NaiveTime,
    ) -> Option<&'a ScheduleEntry> {
        let started: Vec<&ScheduleEntry> = self
            .resolve_active(entries, date)
            .into_iter()
            .filter(|entry| entry.start_time <= time)
            .collect();
        let latest = started.last()?.start_time;
        self.pick(started.into_iter().filter(|entry| entry.start_time == latest))
    }

    fn pick<'a, I>(&self, mut candidates: I) -> Option<&'a ScheduleEntry>
    where
        I: Iterator<Item = &'a ScheduleEntry>,
    {
        match self.precedence {
            Precedence::All => candidates.next(),
            Precedence::ExactDateFirst => candidates.max_by(|a, b| {
                a.repeat_pattern
                    .specificity()
                    .cmp(&b.repeat_pattern.specificity())
                    .then(a.date.cmp(&b.date))
                    .then(b.start_time.cmp(&a.start_time))
            }),
        }
    }

    fn monthly_day_matches(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        if anchor.day() == date.day() {
            return true;
        }
        match self.monthly_overflow {
            MonthlyOverflow::Skip => false,
            MonthlyOverflow::ClampToMonthEnd => {
                let last = last_day_of_month(date);
                date.day() == last && anchor.day() > last
            }
        }
    }
}

/// Entries applying on `date` with the default resolver.
pub fn resolve_active(entries: &[ScheduleEntry], date: NaiveDate) -> Vec<&ScheduleEntry> {
    RecurrenceResolver::new().resolve_active(entries, date)
}

/// A stored schedule record that could not be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedEntry {
    /// The record's `id`, when it had a readable one
    #[serde(default)]
    pub id: Option<String>,
    pub reason: String,
}

/// Read stored schedule records one at a time.
///
/// A record with an unparsable date, start time or repeat pattern is dropped
/// and returned in the rejected list; the remaining records still load.
pub fn parse_entries(
    records: Vec<serde_json::Value>,
) -> (Vec<ScheduleEntry>, Vec<RejectedEntry>) {
    let mut entries = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for record in records {
        let id = record
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        match serde_json::from_value::<ScheduleEntry>(record) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                warn!(
                    id = id.as_deref().unwrap_or(""),
                    error = %err,
                    "dropping unreadable schedule record"
                );
                rejected.push(RejectedEntry {
                    id,
                    reason: err.to_string(),
                });
            }
        }
    }

    (entries, rejected)
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

fn midnight() -> NaiveTime {
    NaiveTime::MIN
}

fn stored_start_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(midnight()),
        Some(s) => NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map_err(|_| serde::de::Error::custom(ValidationError::InvalidTime(s.to_string()))),
    }
}

fn stored_repeat_pattern<'de, D>(deserializer: D) -> Result<RepeatPattern, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    RepeatPattern::from_stored(raw.as_deref()).map_err(serde::de::Error::custom)
}
