use crate::error::{CoreError, Result};
use crate::media::MediaItem;
use crate::program::StoredProgram;
use crate::schedule::{RejectedEntry, ScheduleEntry};

/// Read access to the media catalog.
///
/// The catalog owns media metadata; the planner only reads snapshots of it.
pub trait MediaCatalog {
    /// Look up one item. `Ok(None)` when the id is unknown.
    fn media(&self, id: &str) -> Result<Option<MediaItem>>;

    /// Like [`MediaCatalog::media`], failing with
    /// [`CoreError::MediaNotFound`] for an unknown id.
    fn require_media(&self, id: &str) -> Result<MediaItem> {
        self.media(id)?
            .ok_or_else(|| CoreError::MediaNotFound { id: id.to_string() })
    }

    /// Every item flagged as filler.
    fn fillers(&self) -> Result<Vec<MediaItem>>;
}

/// Read access to stored programs.
pub trait ProgramStore {
    /// Look up one program. `Ok(None)` when the id is unknown.
    fn program(&self, id: &str) -> Result<Option<StoredProgram>>;

    fn programs(&self) -> Result<Vec<StoredProgram>>;
}

/// Read access to schedule entries.
pub trait ScheduleStore {
    /// Every readable entry.
    fn schedule(&self) -> Result<Vec<ScheduleEntry>>;

    /// Stored records left out of [`ScheduleStore::schedule`] because they
    /// could not be read.
    fn rejected(&self) -> Result<Vec<RejectedEntry>> {
        Ok(Vec::new())
    }
}
