//! Programs: the ordered clip sequence meant to fill one broadcast day.
//!
//! A [`Program`] is an owned working copy. Editing operations never touch the
//! catalog or the store; the caller decides when to persist.

mod content;

pub use content::{ClipEntry, ProgramContent, StoredProgram};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::media::{is_usable_duration, MediaItem, MediaType};

/// A clip placed into a program.
///
/// `duration` is captured when the segment is created and stays authoritative
/// for timeline math even if the catalog entry changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Seconds
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub is_filler: bool,
}

impl Segment {
    /// Create a segment referencing a catalog item.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveDuration`] when the item's
    /// duration is zero, negative or not finite.
    pub fn from_media(item: &MediaItem) -> Result<Self, ValidationError> {
        if !item.has_usable_duration() {
            return Err(ValidationError::NonPositiveDuration {
                source_path: item.path.clone(),
                duration: item.duration,
            });
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            media_id: Some(item.id.clone()),
            source: item.path.clone(),
            filename: Some(item.filename.clone()),
            duration: item.duration,
            media_type: Some(item.media_type),
            is_filler: item.is_filler,
        })
    }

    /// Display name: the filename if known, else the last path component.
    pub fn display_name(&self) -> &str {
        match self.filename.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.source.rsplit('/').next().unwrap_or(&self.source),
        }
    }

    pub fn has_usable_duration(&self) -> bool {
        is_usable_duration(self.duration)
    }
}

/// An ordered sequence of segments; insertion order is playback order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Program {
    pub fn new(name: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            name: name.into(),
            date,
            segments: Vec::new(),
        }
    }

    /// Builder-style variant of [`Program::push_segment`] used by fixtures.
    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments.extend(segments);
        self
    }

    /// Append a catalog item as a new segment and return the segment id.
    pub fn push_media(&mut self, item: &MediaItem) -> Result<String, ValidationError> {
        let segment = Segment::from_media(item)?;
        let id = segment.id.clone();
        self.segments.push(segment);
        Ok(id)
    }

    pub fn push_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Append segments in order, e.g. the output of a gap fill.
    pub fn extend_segments<I: IntoIterator<Item = Segment>>(&mut self, segments: I) {
        self.segments.extend(segments);
    }

    /// Remove a segment by id. Returns the removed segment, if any.
    pub fn remove_segment(&mut self, id: &str) -> Option<Segment> {
        let index = self.segments.iter().position(|s| s.id == id)?;
        Some(self.segments.remove(index))
    }

    /// Move the segment at `from` so it ends up at index `to`.
    pub fn move_segment(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        let len = self.segments.len();
        for index in [from, to] {
            if index >= len {
                return Err(ValidationError::OutOfBounds {
                    collection: "program segments".to_string(),
                    index,
                    len,
                });
            }
        }

        let segment = self.segments.remove(from);
        self.segments.insert(to, segment);
        Ok(())
    }

    /// Sum of the segment durations that can be laid out.
    ///
    /// Malformed durations (NaN, zero, negative) are left out.
    pub fn total_duration(&self) -> f64 {
        self.segments
            .iter()
            .filter(|s| s.has_usable_duration())
            .fold(0.0, |acc, s| acc + s.duration)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn filler_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_filler).count()
    }
}

/// Format seconds as `Hh Mm Ss`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.abs().floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours}h {minutes}m {secs}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(id: &str, duration: f64, is_filler: bool) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            filename: format!("{id}.mp4"),
            path: format!("/media/{id}.mp4"),
            duration,
            media_type: MediaType::Video,
            is_filler,
        }
    }

    #[test]
    fn push_media_captures_duration_and_filler_flag() {
        let mut program = Program::new("Monday", None);
        let id = program.push_media(&media("bumper", 30.0, true)).unwrap();

        let segment = &program.segments[0];
        assert_eq!(segment.id, id);
        assert_eq!(segment.duration, 30.0);
        assert!(segment.is_filler);
        assert_eq!(segment.media_id.as_deref(), Some("bumper"));
    }

    #[test]
    fn push_media_rejects_non_positive_duration() {
        let mut program = Program::new("Monday", None);
        let err = program.push_media(&media("broken", 0.0, false)).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveDuration { .. }));
        assert!(program.is_empty());
    }

    #[test]
    fn same_media_twice_gets_distinct_segment_ids() {
        let mut program = Program::new("Loop", None);
        let a = program.push_media(&media("clip", 60.0, false)).unwrap();
        let b = program.push_media(&media("clip", 60.0, false)).unwrap();
        assert_ne!(a, b);

        let removed = program.remove_segment(&a).unwrap();
        assert_eq!(removed.id, a);
        assert_eq!(program.len(), 1);
        assert_eq!(program.segments[0].id, b);
    }

    #[test]
    fn remove_unknown_segment_is_none() {
        let mut program = Program::new("Empty", None);
        assert!(program.remove_segment("nope").is_none());
    }

    #[test]
    fn move_segment_reorders_playback() {
        let mut program = Program::new("Order", None);
        for id in ["a", "b", "c"] {
            program.push_media(&media(id, 10.0, false)).unwrap();
        }

        program.move_segment(2, 0).unwrap();
        let order: Vec<_> = program
            .segments
            .iter()
            .map(|s| s.media_id.as_deref().unwrap())
            .collect();
        assert_eq!(order, vec!["c", "a", "b"]);

        let err = program.move_segment(0, 3).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfBounds {
                collection: "program segments".into(),
                index: 3,
                len: 3
            }
        );
    }

    #[test]
    fn total_duration_skips_malformed_segments() {
        let mut program = Program::new("Mixed", None);
        program.push_media(&media("a", 100.0, false)).unwrap();
        let mut bad = Segment::from_media(&media("b", 5.0, false)).unwrap();
        bad.duration = f64::NAN;
        program.push_segment(bad);
        program.push_media(&media("c", 50.5, true)).unwrap();

        assert_eq!(program.total_duration(), 150.5);
        assert_eq!(program.filler_count(), 1);
    }

    #[test]
    fn display_name_falls_back_to_path() {
        let mut segment = Segment::from_media(&media("x", 1.0, false)).unwrap();
        segment.filename = None;
        assert_eq!(segment.display_name(), "x.mp4");
    }

    #[test]
    fn format_duration_uses_absolute_value() {
        assert_eq!(format_duration(3661.9), "1h 1m 1s");
        assert_eq!(format_duration(-4320.0), "1h 12m 0s");
        assert_eq!(format_duration(0.0), "0h 0m 0s");
    }
}
