pub mod error;
pub mod input;
pub mod model;
pub mod service;
pub mod state;

pub use error::SpeechServiceError;
pub use input::{InputAction, Key};
pub use model::{AudioClip, PlaybackRef, SpeakersResponse, SynthesisRequest, Voice, VoiceList};
pub use service::{Notifier, SpeechService, SpeechServiceApi};
pub use state::{AudioPlayerState, StatusLine, UiState, VoiceOption};

/// Language sent with every synthesis request
pub const LANGUAGE_ID: &str = "en";
