use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::{
    domain::speech::{
        InputAction, Notifier, SpeechService, SpeechServiceApi, StatusLine, UiState,
    },
    error::{AppError, AppResult},
};

pub const HELP: &str = "\
Type text and press Enter to generate speech. End a line with \\ to continue on the next line.
Commands:
  /voices         list available voices
  /voice <n|id>   select a voice by number or id
  /generate       generate the current text again
  /status         show the current state
  /help           show this help
  /quit           exit";

/// One line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Voices,
    Voice(String),
    Generate,
    Status,
    Help,
    Quit,
    Unknown(String),
    /// Text line; `continued` lines end with the line-break marker
    Text { content: String, continued: bool },
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if let Some(command) = trimmed.strip_prefix('/') {
            let (name, argument) = match command.split_once(char::is_whitespace) {
                Some((name, argument)) => (name, argument.trim()),
                None => (command, ""),
            };
            return match name {
                "voices" => ConsoleCommand::Voices,
                "voice" => ConsoleCommand::Voice(argument.to_string()),
                "generate" => ConsoleCommand::Generate,
                "status" => ConsoleCommand::Status,
                "help" => ConsoleCommand::Help,
                "quit" | "exit" => ConsoleCommand::Quit,
                _ => ConsoleCommand::Unknown(trimmed.to_string()),
            };
        }

        Self::text(line)
    }

    fn text(line: &str) -> Self {
        let (content, action) = InputAction::from_line(line);
        ConsoleCommand::Text {
            content: content.to_string(),
            continued: action == InputAction::InsertNewline,
        }
    }
}

pub enum Reply {
    Continue(String),
    Quit,
}

/// Terminal front-end: maps lines of input onto controller operations
pub struct ConsoleController {
    speech_service: Arc<SpeechService>,
    notices: mpsc::UnboundedReceiver<Notice>,
    pending: String,
}

enum ConsoleEvent {
    Notice(Notice),
    Line(Option<String>),
}

impl ConsoleController {
    /// `notices` is the receiving end of the service's [`ConsoleNotifier`]
    pub fn new(
        speech_service: Arc<SpeechService>,
        notices: mpsc::UnboundedReceiver<Notice>,
    ) -> Self {
        Self {
            speech_service,
            notices,
            pending: String::new(),
        }
    }

    /// Read lines until EOF or `/quit`, writing replies to `output`
    pub async fn run<R, W>(mut self, input: R, mut output: W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        write_line(&mut output, HELP).await?;
        write_line(&mut output, &render_voices(&self.speech_service.snapshot())).await?;

        let mut lines = input.lines();
        loop {
            let event = tokio::select! {
                Some(notice) = self.notices.recv() => ConsoleEvent::Notice(notice),
                line = lines.next_line() => ConsoleEvent::Line(line?),
            };

            let line = match event {
                ConsoleEvent::Notice(notice) => {
                    write_line(&mut output, &notice.render()).await?;
                    continue;
                }
                ConsoleEvent::Line(Some(line)) => line,
                ConsoleEvent::Line(None) => break,
            };

            let reply = self.handle_line(&line).await;
            // Notices raised while handling the line come before its reply
            while let Ok(notice) = self.notices.try_recv() {
                write_line(&mut output, &notice.render()).await?;
            }

            match reply {
                Reply::Continue(text) if text.is_empty() => {}
                Reply::Continue(text) => write_line(&mut output, &text).await?,
                Reply::Quit => break,
            }
        }

        self.speech_service.close().await;
        tracing::info!("Console closed");
        Ok(())
    }

    pub async fn handle_line(&mut self, line: &str) -> Reply {
        // Inside a continued text block every line is text
        let command = if self.pending.is_empty() {
            ConsoleCommand::parse(line)
        } else {
            ConsoleCommand::text(line)
        };

        match command {
            ConsoleCommand::Voices => Reply::Continue(render_voices(&self.speech_service.snapshot())),
            ConsoleCommand::Voice(selector) => Reply::Continue(self.select_voice(&selector)),
            ConsoleCommand::Generate => Reply::Continue(self.generate().await),
            ConsoleCommand::Status => Reply::Continue(render_status(&self.speech_service.snapshot())),
            ConsoleCommand::Help => Reply::Continue(HELP.to_string()),
            ConsoleCommand::Quit => Reply::Quit,
            ConsoleCommand::Unknown(command) => {
                Reply::Continue(format!("Unknown command: {} (try /help)", command))
            }
            ConsoleCommand::Text {
                content,
                continued: true,
            } => {
                self.pending.push_str(&content);
                self.pending.push('\n');
                Reply::Continue(String::new())
            }
            ConsoleCommand::Text {
                content,
                continued: false,
            } => {
                let mut text = std::mem::take(&mut self.pending);
                text.push_str(&content);
                self.speech_service.set_text(text);
                Reply::Continue(self.generate().await)
            }
        }
    }

    fn select_voice(&self, selector: &str) -> String {
        if selector.is_empty() {
            return "Usage: /voice <n|id>".to_string();
        }
        match self.speech_service.select_voice(selector) {
            Some(option) => format!("Voice: {} ({})", option.label, option.value),
            None => format!("No voice matches '{}'", selector),
        }
    }

    async fn generate(&self) -> String {
        match self.speech_service.submit().await {
            Ok(reference) => format!("Audio: {}", reference),
            // Other failures were already alerted by the notifier
            Err(e) => match AppError::from(e) {
                AppError::Busy(msg) => msg,
                other => {
                    tracing::debug!(error = %other, "Submission ended without audio");
                    String::new()
                }
            },
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> AppResult<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

pub fn render_voices(state: &UiState) -> String {
    if state.voice_options.is_empty() {
        return "Voices: (not loaded)".to_string();
    }

    let mut lines = vec!["Voices:".to_string()];
    for (index, option) in state.voice_options.iter().enumerate() {
        let marker = if state.selected_voice.as_deref() == Some(option.value.as_str()) {
            '*'
        } else {
            ' '
        };
        if option.placeholder {
            lines.push(format!(" {}    {}", marker, option.label));
        } else {
            lines.push(format!(" {} {:>2}. {} ({})", marker, index + 1, option.label, option.value));
        }
    }
    lines.join("\n")
}

pub fn render_status(state: &UiState) -> String {
    let trigger = match (state.trigger_enabled, state.trigger_loading) {
        (true, _) => "ready",
        (false, true) => "generating",
        (false, false) => "disabled",
    };
    let status = if state.status.text.is_empty() {
        "-"
    } else {
        state.status.text.as_str()
    };
    let audio = match (&state.audio.source, state.audio.visible) {
        (Some(reference), true) if state.audio.playing => format!("{} (playing)", reference),
        (Some(reference), true) => reference.to_string(),
        _ => "hidden".to_string(),
    };

    format!(
        "Voice: {}\nTrigger: {}\nStatus: {}\nAudio: {}",
        if state.selected_voice_id().is_empty() {
            "-".to_string()
        } else {
            state.selected_voice_id()
        },
        trigger,
        status,
        audio
    )
}

/// Alert or status line waiting to be printed by the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Alert(String),
    Status(String),
}

impl Notice {
    pub fn render(&self) -> String {
        match self {
            Notice::Alert(message) => format!("[!] {}", message),
            Notice::Status(text) => format!("... {}", text),
        }
    }
}

/// Queues alerts and status changes for the console's output
pub struct ConsoleNotifier {
    notices: mpsc::UnboundedSender<Notice>,
}

impl ConsoleNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (notices, receiver) = mpsc::unbounded_channel();
        (Self { notices }, receiver)
    }

    fn send(&self, notice: Notice) {
        if self.notices.send(notice).is_err() {
            tracing::debug!("Console closed, notice dropped");
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        self.send(Notice::Alert(message.to_string()));
    }

    fn status_changed(&self, status: &StatusLine) {
        if !status.text.is_empty() {
            self.send(Notice::Status(status.text.clone()));
        }
    }
}
