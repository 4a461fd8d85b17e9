use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use super::LANGUAGE_ID;

/// A selectable synthesis voice, as listed by GET /api/speakers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub language: Vec<String>,
}

/// Response for GET /api/speakers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakersResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speakers: Option<Vec<Voice>>,
}

/// Outcome of the startup voice listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceList {
    Available(Vec<Voice>),
    NoneAvailable,
    LoadError,
}

impl VoiceList {
    /// Classify a parsed listing response.
    ///
    /// `success:true` without a `speakers` array is malformed and counts as a
    /// load error; `success:false` or an empty array means no voices.
    pub fn from_response(response: SpeakersResponse) -> Self {
        match (response.success, response.speakers) {
            (true, Some(speakers)) if !speakers.is_empty() => VoiceList::Available(speakers),
            (true, None) => VoiceList::LoadError,
            _ => VoiceList::NoneAvailable,
        }
    }
}

/// Form body for POST /api/tts, fields in wire order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub speaker_id: String,
    pub language_id: String,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, speaker_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            speaker_id: speaker_id.into(),
            language_id: LANGUAGE_ID.to_string(),
        }
    }
}

/// Raw audio returned by a successful synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    /// File extension for the clip's media type
    pub fn extension(&self) -> &'static str {
        let media_type = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match media_type.as_str() {
            "audio/mpeg" | "audio/mp3" => "mp3",
            "audio/wav" | "audio/wave" | "audio/x-wav" => "wav",
            "audio/ogg" | "audio/opus" => "ogg",
            "audio/flac" | "audio/x-flac" => "flac",
            "audio/aac" => "aac",
            _ => "bin",
        }
    }
}

/// Transient local handle routing a clip into the audio player
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaybackRef {
    pub id: Uuid,
    pub path: PathBuf,
}

impl PlaybackRef {
    pub fn new(path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
        }
    }

    pub fn uri(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

impl fmt::Display for PlaybackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}
