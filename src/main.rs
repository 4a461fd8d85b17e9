use anyhow::Context;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tts_console::controllers::{ConsoleController, ConsoleNotifier};
use tts_console::domain::speech::{SpeechService, SpeechServiceApi};
use tts_console::infrastructure::audio::FileAudioPlayer;
use tts_console::infrastructure::config::{Config, LogFormat};
use tts_console::infrastructure::repositories::HttpSpeechRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        base_url = %config.base_url,
        audio_dir = %config.audio_dir.display(),
        "Starting tts-console"
    );

    let speech_repo = Arc::new(HttpSpeechRepository::new(config.base_url.clone()));
    let player = Arc::new(
        FileAudioPlayer::new(config.audio_dir.clone(), config.audio_player.as_deref())
            .context("Failed to set up audio player")?,
    );
    tracing::info!(output = ?player.output(), "Audio player ready");
    let (notifier, notices) = ConsoleNotifier::channel();
    let notifier = Arc::new(notifier);

    let speech_service = Arc::new(SpeechService::new(
        speech_repo,
        player,
        notifier,
        config.status_clear_delay,
    ));

    // Populate the voice list before accepting input
    speech_service.load_voices().await;

    let console = ConsoleController::new(speech_service, notices);
    console
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("Console failed")?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tts_console=info".into());

    // Logs go to stderr so the console on stdout stays readable
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
