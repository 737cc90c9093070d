//! Stored program content (ffplayout-style JSON).
//!
//! ```json
//! { "channel": "Channel 1", "date": "2025-01-06",
//!   "program": [ { "source": "/media/a.mp4", "in": 0, "out": 600, "duration": 600 } ] }
//! ```
//!
//! A bare clip array (`[ { "source": ... }, ... ]`) is accepted as content
//! with no channel or date.
//!
//! Durations are read leniently: numbers and numeric strings are accepted,
//! anything else becomes NaN so the timeline can drop that one clip with a
//! warning instead of rejecting the whole document.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{Program, Segment};
use crate::media::MediaType;

/// One clip in the stored content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
    #[serde(alias = "path")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(rename = "in", default)]
    pub in_point: f64,
    #[serde(default)]
    pub out: f64,
    #[serde(default = "missing_seconds", deserialize_with = "lenient_seconds")]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub is_filler: bool,
}

/// The `content` document of a stored program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ContentRepr")]
pub struct ProgramContent {
    pub channel: String,
    pub date: Option<NaiveDate>,
    pub program: Vec<ClipEntry>,
}

/// The stored shapes of program content.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentRepr {
    Clips(Vec<ClipEntry>),
    Document {
        #[serde(default)]
        channel: String,
        #[serde(default)]
        date: Option<NaiveDate>,
        #[serde(default)]
        program: Vec<ClipEntry>,
    },
}

impl From<ContentRepr> for ProgramContent {
    fn from(repr: ContentRepr) -> Self {
        match repr {
            ContentRepr::Clips(program) => Self {
                program,
                ..Self::default()
            },
            ContentRepr::Document {
                channel,
                date,
                program,
            } => Self {
                channel,
                date,
                program,
            },
        }
    }
}

/// A program as the persistence collaborator hands it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProgram {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub content: ProgramContent,
}

impl StoredProgram {
    pub fn to_program(&self) -> Program {
        let mut program = Program::from_content(self.name.clone(), &self.content);
        if self.date.is_some() {
            program.date = self.date;
        }
        program
    }
}

impl ClipEntry {
    fn to_segment(&self) -> Segment {
        Segment {
            id: self
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            media_id: self.media_id.clone(),
            source: self.source.clone(),
            filename: self.filename.clone(),
            duration: self.duration,
            media_type: self.media_type,
            is_filler: self.is_filler,
        }
    }

    fn from_segment(segment: &Segment) -> Self {
        Self {
            id: Some(segment.id.clone()),
            media_id: segment.media_id.clone(),
            source: segment.source.clone(),
            filename: segment.filename.clone(),
            in_point: 0.0,
            out: segment.duration,
            duration: segment.duration,
            media_type: segment.media_type,
            is_filler: segment.is_filler,
        }
    }
}

impl Program {
    /// Build a working copy from stored content. Clip durations are kept as
    /// stored, including malformed ones.
    pub fn from_content(name: impl Into<String>, content: &ProgramContent) -> Self {
        Self {
            name: name.into(),
            date: content.date,
            segments: content.program.iter().map(ClipEntry::to_segment).collect(),
        }
    }

    /// Export for the persistence collaborator. Every clip plays in full
    /// (`in = 0`, `out = duration`).
    pub fn to_content(&self, channel: impl Into<String>) -> ProgramContent {
        ProgramContent {
            channel: channel.into(),
            date: self.date,
            program: self.segments.iter().map(ClipEntry::from_segment).collect(),
        }
    }
}

fn missing_seconds() -> f64 {
    f64::NAN
}

fn lenient_seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}
