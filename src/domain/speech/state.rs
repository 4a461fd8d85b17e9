//! Explicit UI state for the speech controller.
//!
//! Every mutation the controller performs goes through one of the methods
//! here, so the whole page lifecycle can be exercised without a terminal or
//! a network.

use super::model::{PlaybackRef, VoiceList};

/// Option value used by the single placeholder entry
pub const PLACEHOLDER_VALUE: &str = "default";
pub const NO_VOICES_LABEL: &str = "No voices available";
pub const VOICES_ERROR_LABEL: &str = "Error loading voices";

pub const GENERATING_STATUS: &str = "Generating speech...";
pub const COMPLETE_STATUS: &str = "Generation complete!";
pub const ERROR_STATUS: &str = "Error generating speech";

/// One entry of the voice selection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceOption {
    pub value: String,
    pub label: String,
    pub placeholder: bool,
}

impl VoiceOption {
    fn placeholder(label: &str) -> Self {
        Self {
            value: PLACEHOLDER_VALUE.to_string(),
            label: label.to_string(),
            placeholder: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub pulse: bool,
    /// Bumped by every submission; delayed clears compare against it
    pub token: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioPlayerState {
    pub source: Option<PlaybackRef>,
    pub visible: bool,
    pub playing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub voice_options: Vec<VoiceOption>,
    pub selected_voice: Option<String>,
    pub text: String,
    pub trigger_enabled: bool,
    pub trigger_loading: bool,
    pub status: StatusLine,
    pub audio: AudioPlayerState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            voice_options: Vec::new(),
            selected_voice: None,
            text: String::new(),
            trigger_enabled: true,
            trigger_loading: false,
            status: StatusLine::default(),
            audio: AudioPlayerState::default(),
        }
    }
}

impl UiState {
    /// Replace the selection list with the listing outcome and select the first entry
    pub fn apply_voice_list(&mut self, list: &VoiceList) {
        self.voice_options = match list {
            VoiceList::Available(voices) => voices
                .iter()
                .map(|voice| VoiceOption {
                    value: voice.id.clone(),
                    label: voice.name.clone(),
                    placeholder: false,
                })
                .collect(),
            VoiceList::NoneAvailable => vec![VoiceOption::placeholder(NO_VOICES_LABEL)],
            VoiceList::LoadError => vec![VoiceOption::placeholder(VOICES_ERROR_LABEL)],
        };
        self.selected_voice = self.voice_options.first().map(|option| option.value.clone());
    }

    /// Select by 1-based position or by option value
    pub fn select_voice(&mut self, selector: &str) -> Option<&VoiceOption> {
        let selector = selector.trim();
        let index = match selector.parse::<usize>() {
            Ok(position) if position >= 1 && position <= self.voice_options.len() => {
                Some(position - 1)
            }
            _ => self
                .voice_options
                .iter()
                .position(|option| option.value == selector),
        }?;

        self.selected_voice = Some(self.voice_options[index].value.clone());
        self.voice_options.get(index)
    }

    /// Value the selection control currently reports; empty before voices load
    pub fn selected_voice_id(&self) -> String {
        self.selected_voice.clone().unwrap_or_default()
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Disable the trigger and show the generating status. Returns the new status token.
    pub fn begin_generation(&mut self) -> u64 {
        self.trigger_enabled = false;
        self.trigger_loading = true;
        self.status.token += 1;
        self.status.text = GENERATING_STATUS.to_string();
        self.status.pulse = true;
        self.status.token
    }

    /// Point the player at a new reference and reveal it. Returns the replaced reference.
    pub fn assign_audio(&mut self, reference: PlaybackRef) -> Option<PlaybackRef> {
        self.audio.visible = true;
        self.audio.playing = false;
        self.audio.source.replace(reference)
    }

    pub fn mark_playing(&mut self) {
        self.audio.playing = self.audio.source.is_some();
    }

    pub fn complete_generation(&mut self) {
        self.status.text = COMPLETE_STATUS.to_string();
    }

    pub fn fail_generation(&mut self) {
        self.status.text = ERROR_STATUS.to_string();
    }

    /// Restore the trigger and stop the pulse, whatever the outcome
    pub fn end_generation(&mut self) {
        self.trigger_enabled = true;
        self.trigger_loading = false;
        self.status.pulse = false;
    }

    /// Clear the status text only if no newer submission has started
    pub fn clear_status_if(&mut self, token: u64) -> bool {
        if self.status.token != token {
            return false;
        }
        self.status.text.clear();
        true
    }
}
