use crate::domain::speech::{AudioClip, SpeakersResponse, SynthesisRequest};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Repository for the two speech endpoints.
/// Abstracts the HTTP backend so the controller can be driven without a network.
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Fetch the voice listing.
    ///
    /// A non-2xx status is not an error here: the body is still parsed and
    /// classified by the caller. Transport failures and unparseable bodies are.
    async fn list_speakers(&self) -> Result<SpeakersResponse, RepositoryError>;

    /// Synthesize the request into audio.
    ///
    /// # Errors
    /// Returns `RepositoryError::Status` for any non-2xx response regardless of body
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioClip, RepositoryError>;
}
