//! Collaborator seams.
//!
//! The catalog, program store and schedule store live outside this crate.
//! They are consumed through the read-only traits in this module.
//! [`LibrarySnapshot`] is an in-memory implementation over a JSON export
//! (`{ "media": [...], "programs": [...], "schedule": [...] }`), used by the
//! CLI and by tests.
//!
//! Schedule records are read one by one, so a single unreadable record is
//! set aside in [`LibrarySnapshot::rejected`] instead of failing the load.

mod traits;

pub use traits::{MediaCatalog, ProgramStore, ScheduleStore};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::media::MediaItem;
use crate::program::StoredProgram;
use crate::schedule::{parse_entries, RejectedEntry, ScheduleEntry};

/// Point-in-time copy of catalog, programs and schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLibrary")]
pub struct LibrarySnapshot {
    pub media: Vec<MediaItem>,
    pub programs: Vec<StoredProgram>,
    pub schedule: Vec<ScheduleEntry>,
    /// Schedule records that could not be read
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedEntry>,
}

/// Snapshot as stored, before schedule records are checked.
#[derive(Deserialize)]
struct RawLibrary {
    #[serde(default)]
    media: Vec<MediaItem>,
    #[serde(default)]
    programs: Vec<StoredProgram>,
    #[serde(default)]
    schedule: Vec<serde_json::Value>,
    #[serde(default)]
    rejected: Vec<RejectedEntry>,
}

impl From<RawLibrary> for LibrarySnapshot {
    fn from(raw: RawLibrary) -> Self {
        let (schedule, mut rejected) = parse_entries(raw.schedule);
        rejected.extend(raw.rejected);
        Self {
            media: raw.media,
            programs: raw.programs,
            schedule,
            rejected,
        }
    }
}

impl LibrarySnapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a snapshot exported to a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl MediaCatalog for LibrarySnapshot {
    fn media(&self, id: &str) -> Result<Option<MediaItem>> {
        Ok(self.media.iter().find(|m| m.id == id).cloned())
    }

    fn fillers(&self) -> Result<Vec<MediaItem>> {
        Ok(self.media.iter().filter(|m| m.is_filler).cloned().collect())
    }
}

impl ProgramStore for LibrarySnapshot {
    fn program(&self, id: &str) -> Result<Option<StoredProgram>> {
        Ok(self.programs.iter().find(|p| p.id == id).cloned())
    }

    fn programs(&self) -> Result<Vec<StoredProgram>> {
        Ok(self.programs.clone())
    }
}

impl ScheduleStore for LibrarySnapshot {
    fn schedule(&self) -> Result<Vec<ScheduleEntry>> {
        Ok(self.schedule.clone())
    }

    fn rejected(&self) -> Result<Vec<RejectedEntry>> {
        Ok(self.rejected.clone())
    }
}
