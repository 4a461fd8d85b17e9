use crate::error::AppError;
use crate::infrastructure::audio::PlaybackError;
use crate::infrastructure::repositories::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum SpeechServiceError {
    #[error("text is empty")]
    EmptyText,
    #[error("a synthesis request is already in flight")]
    InFlight,
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("playback error: {0}")]
    Playback(String),
}

impl From<RepositoryError> for SpeechServiceError {
    fn from(err: RepositoryError) -> Self {
        SpeechServiceError::Dependency(err.to_string())
    }
}

impl From<PlaybackError> for SpeechServiceError {
    fn from(err: PlaybackError) -> Self {
        SpeechServiceError::Playback(err.to_string())
    }
}

impl From<SpeechServiceError> for AppError {
    fn from(err: SpeechServiceError) -> Self {
        match err {
            SpeechServiceError::EmptyText => AppError::BadRequest("Text cannot be empty".to_string()),
            SpeechServiceError::InFlight => {
                AppError::Busy("A synthesis request is already in flight".to_string())
            }
            SpeechServiceError::Dependency(msg) => AppError::ExternalService(msg),
            SpeechServiceError::Playback(msg) => AppError::Playback(msg),
        }
    }
}
