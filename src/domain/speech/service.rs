use super::error::SpeechServiceError;
use super::model::{PlaybackRef, SynthesisRequest, VoiceList};
use super::state::{StatusLine, UiState, VoiceOption};
use crate::infrastructure::audio::AudioPlayer;
use crate::infrastructure::repositories::SpeechRepository;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub const EMPTY_TEXT_ALERT: &str = "Please enter some text";
pub const FAILURE_ALERT: &str = "Error generating speech. Please try again.";

/// User-facing notification surface
pub trait Notifier: Send + Sync {
    /// Blocking notice the user has to see
    fn alert(&self, message: &str);

    /// Called whenever the status line changes
    fn status_changed(&self, _status: &StatusLine) {}
}

pub struct SpeechService {
    speech_repo: Arc<dyn SpeechRepository>,
    player: Arc<dyn AudioPlayer>,
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<UiState>>,
    in_flight: AtomicBool,
    status_clear_delay: Duration,
}

impl SpeechService {
    pub fn new(
        speech_repo: Arc<dyn SpeechRepository>,
        player: Arc<dyn AudioPlayer>,
        notifier: Arc<dyn Notifier>,
        status_clear_delay: Duration,
    ) -> Self {
        Self {
            speech_repo,
            player,
            notifier,
            state: Arc::new(Mutex::new(UiState::default())),
            in_flight: AtomicBool::new(false),
            status_clear_delay,
        }
    }
}

#[async_trait]
pub trait SpeechServiceApi: Send + Sync {
    /// Populate the voice selection list from the listing endpoint.
    ///
    /// Never fails: listing problems degrade to a single placeholder option.
    async fn load_voices(&self) -> VoiceList;

    /// Synthesize the current text with the selected voice and start playback.
    ///
    /// This operation:
    /// - Rejects re-entrant calls while a request is in flight
    /// - Rejects blank text with a blocking notice, without sending anything
    /// - Disables the trigger for the whole request and restores it on every path
    /// - On success replaces (and releases) the previous playback reference
    async fn submit(&self) -> Result<PlaybackRef, SpeechServiceError>;
}

#[async_trait]
impl SpeechServiceApi for SpeechService {
    async fn load_voices(&self) -> VoiceList {
        let list = match self.speech_repo.list_speakers().await {
            Ok(response) => VoiceList::from_response(response),
            Err(e) => {
                tracing::error!(error = %e, "Error loading voices");
                VoiceList::LoadError
            }
        };

        match &list {
            VoiceList::Available(voices) => {
                tracing::info!(voice_count = voices.len(), "Voices loaded")
            }
            VoiceList::NoneAvailable => tracing::warn!("No voices available"),
            VoiceList::LoadError => tracing::error!("Voice listing unusable, showing placeholder"),
        }

        {
            let mut state = lock_state(&self.state);
            state.apply_voice_list(&list);
        }

        list
    }

    async fn submit(&self) -> Result<PlaybackRef, SpeechServiceError> {
        let Some(_in_flight) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::warn!("Submission rejected, a request is already in flight");
            return Err(SpeechServiceError::InFlight);
        };

        let (request, token, status) = {
            let mut state = lock_state(&self.state);
            if !state.has_text() {
                drop(state);
                self.notifier.alert(EMPTY_TEXT_ALERT);
                return Err(SpeechServiceError::EmptyText);
            }
            let request = SynthesisRequest::new(state.text.clone(), state.selected_voice_id());
            let token = state.begin_generation();
            (request, token, state.status.clone())
        };
        let generation = GenerationScope::new(&self.state, self.notifier.as_ref(), token);
        self.notifier.status_changed(&status);

        let result = self.generate(&request).await;

        let status = generation.finish(result.is_ok());
        self.notifier.status_changed(&status);

        match &result {
            Ok(reference) => {
                tracing::info!(reference = %reference, token, "Generation complete");
                self.schedule_status_clear(token);
            }
            Err(e) => {
                tracing::error!(error = %e, "Error generating speech");
                self.notifier.alert(FAILURE_ALERT);
            }
        }

        result
    }
}

impl SpeechService {
    /// Copy of the current UI state
    pub fn snapshot(&self) -> UiState {
        lock_state(&self.state).clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        lock_state(&self.state).text = text.into();
    }

    pub fn select_voice(&self, selector: &str) -> Option<VoiceOption> {
        lock_state(&self.state).select_voice(selector).cloned()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Detach and release the current playback reference, if any
    pub async fn close(&self) {
        let current = {
            let mut state = lock_state(&self.state);
            state.audio.playing = false;
            state.audio.source.take()
        };
        if let Some(reference) = current {
            self.player.release_reference(&reference).await;
        }
    }

    async fn generate(&self, request: &SynthesisRequest) -> Result<PlaybackRef, SpeechServiceError> {
        let clip = self.speech_repo.synthesize(request).await?;
        let reference = self.player.create_reference(&clip).await?;

        let previous = {
            let mut state = lock_state(&self.state);
            state.assign_audio(reference.clone())
        };
        if let Some(previous) = previous {
            self.player.release_reference(&previous).await;
        }

        let played = self.player.play(&reference).await;
        match played {
            Ok(()) => {
                let mut state = lock_state(&self.state);
                state.mark_playing();
            }
            Err(e) => tracing::warn!(error = %e, reference = %reference, "Failed to start playback"),
        }

        Ok(reference)
    }

    fn schedule_status_clear(&self, token: u64) {
        let state = Arc::clone(&self.state);
        let notifier = Arc::clone(&self.notifier);
        let delay = self.status_clear_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let cleared = {
                let mut state = lock_state(&state);
                state
                    .clear_status_if(token)
                    .then(|| state.status.clone())
            };

            match cleared {
                Some(status) => notifier.status_changed(&status),
                None => tracing::debug!(token, "Status changed since, skipping clear"),
            }
        });
    }
}

fn lock_state(state: &Mutex<UiState>) -> MutexGuard<'_, UiState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the in-flight flag for the duration of one submission
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Re-enables the trigger when a started generation ends, including when the
/// submission is dropped before the request returns
struct GenerationScope<'a> {
    state: &'a Mutex<UiState>,
    notifier: &'a dyn Notifier,
    token: u64,
    finished: bool,
}

impl<'a> GenerationScope<'a> {
    fn new(state: &'a Mutex<UiState>, notifier: &'a dyn Notifier, token: u64) -> Self {
        Self {
            state,
            notifier,
            token,
            finished: false,
        }
    }

    /// Record the outcome and restore the trigger. Returns the resulting status.
    fn finish(mut self, succeeded: bool) -> StatusLine {
        self.finished = true;
        let mut state = lock_state(self.state);
        if succeeded {
            state.complete_generation();
        } else {
            state.fail_generation();
        }
        state.end_generation();
        state.status.clone()
    }
}

impl Drop for GenerationScope<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        let cleared = {
            let mut state = lock_state(self.state);
            state.end_generation();
            state
                .clear_status_if(self.token)
                .then(|| state.status.clone())
        };
        tracing::warn!(token = self.token, "Generation abandoned before completion");

        if let Some(status) = cleared {
            self.notifier.status_changed(&status);
        }
    }
}
