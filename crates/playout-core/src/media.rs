//! Media catalog records as seen by the planner.
//!
//! The catalog itself lives elsewhere; these types only mirror the fields the
//! timeline math needs.

use serde::{Deserialize, Serialize};

/// Kind of media a catalog item holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Audio,
    Image,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Image => "image",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clip known to the media catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub filename: String,
    pub path: String,
    /// Seconds
    pub duration: f64,
    pub media_type: MediaType,
    #[serde(default)]
    pub is_filler: bool,
}

impl MediaItem {
    /// Whether the item can be placed on a timeline at all.
    pub fn has_usable_duration(&self) -> bool {
        is_usable_duration(self.duration)
    }
}

/// A duration the timeline can lay out: finite and strictly positive.
pub fn is_usable_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_serializes_lowercase() {
        let json = serde_json::to_string(&MediaType::Video).unwrap();
        assert_eq!(json, "\"video\"");
        let parsed: MediaType = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(parsed, MediaType::Image);
    }

    #[test]
    fn is_filler_defaults_to_false() {
        let item: MediaItem = serde_json::from_str(
            r#"{"id":"m1","filename":"a.mp4","path":"/m/a.mp4","duration":12.5,"media_type":"video"}"#,
        )
        .unwrap();
        assert!(!item.is_filler);
        assert!(item.has_usable_duration());
    }

    #[test]
    fn usable_duration_rejects_zero_negative_and_nan() {
        assert!(!is_usable_duration(0.0));
        assert!(!is_usable_duration(-3.0));
        assert!(!is_usable_duration(f64::NAN));
        assert!(!is_usable_duration(f64::INFINITY));
        assert!(is_usable_duration(0.04));
    }
}
