//! Audio output for synthesized clips.
//!
//! A clip becomes playable by writing it under the audio directory; the file
//! path is the playback reference. Playing decodes that file onto the default
//! output device, or hands the path to a configured player command instead.
//! Only one reference plays at a time: starting or releasing one stops the
//! clip that was playing.

mod device;

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::domain::speech::{AudioClip, PlaybackRef};

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("failed to store audio: {0}")]
    Store(#[from] std::io::Error),
    #[error("invalid player command: {0}")]
    InvalidCommand(String),
    #[error("failed to start player: {0}")]
    Spawn(String),
    #[error("failed to decode audio: {0}")]
    Decode(String),
    #[error("audio output unavailable: {0}")]
    Output(String),
}

#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Make a clip addressable for playback
    async fn create_reference(&self, clip: &AudioClip) -> Result<PlaybackRef, PlaybackError>;

    /// Release a reference that is no longer assigned to the player
    async fn release_reference(&self, reference: &PlaybackRef);

    /// Begin playback without waiting for it to finish.
    ///
    /// Returns `Ok` only once playback has actually started.
    async fn play(&self, reference: &PlaybackRef) -> Result<(), PlaybackError>;
}

/// Where a started reference is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutput {
    /// Default output device, decoded in-process
    Device,
    /// External program receiving the file path as its last argument
    Command(Vec<String>),
}

/// Stop request shared with one running playback
#[derive(Clone, Default)]
pub(crate) struct StopSignal {
    requested: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl StopSignal {
    fn stop(&self) {
        self.requested.store(true, Ordering::Release);
        self.notify.notify_one();
    }

    pub(crate) fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    async fn requested(&self) {
        self.notify.notified().await;
    }
}

/// File-backed player
pub struct FileAudioPlayer {
    audio_dir: PathBuf,
    output: PlaybackOutput,
    current: Mutex<Option<(Uuid, StopSignal)>>,
}

impl FileAudioPlayer {
    /// Play on the output device, or through `player_command` (e.g. `mpv --no-video`) when set
    pub fn new(audio_dir: PathBuf, player_command: Option<&str>) -> Result<Self, PlaybackError> {
        let output = match player_command {
            Some(command) => PlaybackOutput::Command(parse_command(command)?),
            None => PlaybackOutput::Device,
        };

        Ok(Self {
            audio_dir,
            output,
            current: Mutex::new(None),
        })
    }

    pub fn output(&self) -> &PlaybackOutput {
        &self.output
    }

    fn replace_current(&self, next: Option<(Uuid, StopSignal)>) -> Option<(Uuid, StopSignal)> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, next)
    }

    fn stop_if_current(&self, id: Uuid) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().is_some_and(|(current_id, _)| *current_id == id) {
            if let Some((_, stop)) = current.take() {
                stop.stop();
            }
        }
    }
}

fn parse_command(command: &str) -> Result<Vec<String>, PlaybackError> {
    match shlex::split(command) {
        Some(parts) if !parts.is_empty() => Ok(parts),
        _ => Err(PlaybackError::InvalidCommand(command.to_string())),
    }
}

fn spawn_command(
    command: &[String],
    reference: &PlaybackRef,
    stop: StopSignal,
) -> Result<(), PlaybackError> {
    let Some((program, args)) = command.split_first() else {
        return Err(PlaybackError::InvalidCommand(String::new()));
    };

    let mut child = tokio::process::Command::new(program)
        .args(args)
        .arg(&reference.path)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| PlaybackError::Spawn(format!("{}: {}", program, e)))?;

    let program = program.clone();
    tokio::spawn(async move {
        let exited = tokio::select! {
            status = child.wait() => Some(status),
            _ = stop.requested() => None,
        };

        match exited {
            Some(Ok(status)) if status.success() => {
                tracing::debug!(player = %program, "Playback finished")
            }
            Some(Ok(status)) => {
                tracing::warn!(player = %program, status = %status, "Player exited with error")
            }
            Some(Err(e)) => tracing::warn!(player = %program, error = %e, "Failed to wait for player"),
            None => match child.kill().await {
                Ok(()) => tracing::debug!(player = %program, "Playback stopped"),
                Err(e) => tracing::warn!(player = %program, error = %e, "Failed to stop player"),
            },
        }
    });

    Ok(())
}

#[async_trait]
impl AudioPlayer for FileAudioPlayer {
    async fn create_reference(&self, clip: &AudioClip) -> Result<PlaybackRef, PlaybackError> {
        tokio::fs::create_dir_all(&self.audio_dir).await?;

        let id = Uuid::new_v4();
        let path = self
            .audio_dir
            .join(format!("speech-{}.{}", id, clip.extension()));
        tokio::fs::write(&path, &clip.bytes).await?;

        let reference = PlaybackRef { id, path };
        tracing::debug!(
            reference = %reference,
            audio_size_bytes = clip.bytes.len(),
            "Playback reference created"
        );
        Ok(reference)
    }

    async fn release_reference(&self, reference: &PlaybackRef) {
        self.stop_if_current(reference.id);

        match tokio::fs::remove_file(&reference.path).await {
            Ok(()) => tracing::debug!(reference = %reference, "Playback reference released"),
            Err(e) => tracing::warn!(
                error = %e,
                reference = %reference,
                "Failed to release playback reference"
            ),
        }
    }

    async fn play(&self, reference: &PlaybackRef) -> Result<(), PlaybackError> {
        if let Some((_, previous)) = self.replace_current(None) {
            previous.stop();
        }

        let stop = StopSignal::default();
        match &self.output {
            PlaybackOutput::Device => device::start(reference.path.clone(), stop.clone()).await?,
            PlaybackOutput::Command(command) => spawn_command(command, reference, stop.clone())?,
        }

        tracing::info!(reference = %reference, output = ?self.output, "Playback started");
        if let Some((_, raced)) = self.replace_current(Some((reference.id, stop))) {
            raced.stop();
        }
        Ok(())
    }
}
