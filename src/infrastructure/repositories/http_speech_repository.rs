use super::speech_repository::{RepositoryError, SpeechRepository};
use crate::domain::speech::{AudioClip, SpeakersResponse, SynthesisRequest};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

const SPEAKERS_PATH: &str = "/api/speakers";
const TTS_PATH: &str = "/api/tts";
const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// HTTP implementation of the speech repository.
/// No timeout is configured; the transport defaults apply.
pub struct HttpSpeechRepository {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpSpeechRepository {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl SpeechRepository for HttpSpeechRepository {
    async fn list_speakers(&self) -> Result<SpeakersResponse, RepositoryError> {
        let url = self.url(SPEAKERS_PATH);
        tracing::debug!(url = %url, "Fetching voice listing");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            tracing::error!(error = %e, url = %url, "Voice listing request failed");
            RepositoryError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                "Voice listing returned non-success status, parsing body anyway"
            );
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RepositoryError::Transport(e.to_string()))?;

        serde_json::from_slice::<SpeakersResponse>(&body)
            .map_err(|e| RepositoryError::Decode(e.to_string()))
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioClip, RepositoryError> {
        let start_time = std::time::Instant::now();
        let url = self.url(TTS_PATH);

        tracing::info!(
            speaker_id = %request.speaker_id,
            language_id = %request.language_id,
            text_length = request.text.len(),
            "Sending synthesis request"
        );

        let response = self
            .http_client
            .post(&url)
            .form(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, url = %url, "Synthesis request failed");
                RepositoryError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Synthesis returned error status");
            return Err(RepositoryError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_AUDIO_CONTENT_TYPE)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RepositoryError::Transport(e.to_string()))?;

        let clip = AudioClip::new(bytes.to_vec(), content_type);

        tracing::info!(
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = clip.bytes.len(),
            content_type = %clip.content_type,
            "Synthesis completed"
        );

        Ok(clip)
    }
}
