//! # Playout Core Library
//!
//! This library provides the day-planning logic for a 24-hour broadcast
//! playout channel. It implements a CLI-first philosophy: every operation is
//! available through the standalone `playout-cli` binary, which is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Validation**: Checks a program's total against the broadcast day and
//!   its tolerance band
//! - **Gap fill**: Randomized packing of filler media into the remaining time
//! - **Timeline**: Absolute layout of a program across the broadcast day,
//!   including segments that wrap past midnight
//! - **Recurrence**: Which schedule entries apply to a calendar date
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`DurationValidator`]: Total-versus-target classification
//! - [`GapFillEngine`]: Filler packing with an attempt budget
//! - [`Timeline`]: Resolved layout and "what is on air" lookup
//! - [`RecurrenceResolver`]: Schedule entry matching and precedence
//! - [`DayPlanner`]: All of the above over the collaborator stores
//! - [`Config`]: Application configuration management

pub mod diagnostics;
pub mod error;
pub mod fill;
pub mod media;
pub mod planner;
pub mod program;
pub mod schedule;
pub mod storage;
pub mod store;
pub mod timeline;
pub mod validator;

pub use diagnostics::{diagnose, PlayoutDiagnostics};
pub use error::{ConfigError, CoreError, ValidationError};
pub use fill::{FillOutcome, FillPolicy, FillResult, GapFillEngine};
pub use media::{MediaItem, MediaType};
pub use planner::{DayPlan, DayPlanner, ScheduledProgram};
pub use program::{format_duration, ClipEntry, Program, ProgramContent, Segment, StoredProgram};
pub use schedule::{
    DayResolution, MonthlyOverflow, Precedence, RecurrenceResolver, RejectedEntry, RepeatPattern,
    ScheduleEntry,
};
pub use storage::Config;
pub use store::{LibrarySnapshot, MediaCatalog, ProgramStore, ScheduleStore};
pub use timeline::{CoverageGap, NowPlaying, Timeline, TimelineEntry, TimelineWarning};
pub use validator::{DayTarget, DurationStatus, DurationValidator, ValidationReport};
