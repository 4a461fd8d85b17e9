/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Playback error: {0}")]
    Playback(String),
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
