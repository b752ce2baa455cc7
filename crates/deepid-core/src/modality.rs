//! Extension-based media type detection.
//!
//! Every file in a batch is routed to the analysis pipeline for its modality.
//! Matching is an exact comparison of the lowercased extension against three
//! fixed sets; anything else is unknown and never submitted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "aac", "flac", "ogg", "m4a"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff"];

/// Media type of a submitted file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Image,
    Audio,
    Video,
}

impl Modality {
    /// Wire name, also used in the ledger
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Image => "image",
            Modality::Audio => "audio",
            Modality::Video => "video",
        }
    }

    /// File extensions (lowercase, without dot) routed to this modality
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Modality::Image => IMAGE_EXTENSIONS,
            Modality::Audio => AUDIO_EXTENSIONS,
            Modality::Video => VIDEO_EXTENSIONS,
        }
    }

    pub fn all() -> &'static [Modality] {
        &[Modality::Image, Modality::Audio, Modality::Video]
    }

    /// Classify a path by its extension.
    ///
    /// Returns `None` for files without an extension or with one outside the
    /// known sets.
    pub fn from_path(path: &Path) -> Option<Modality> {
        let extension = path.extension()?.to_str()?.to_lowercase();

        if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
            Some(Modality::Audio)
        } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Some(Modality::Video)
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Some(Modality::Image)
        } else {
            None
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(Modality::Image),
            "audio" => Ok(Modality::Audio),
            "video" => Ok(Modality::Video),
            _ => Err(format!(
                "Unknown modality: '{}'. Available: image, audio, video",
                s
            )),
        }
    }
}
