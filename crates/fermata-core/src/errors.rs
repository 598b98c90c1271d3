use std::path::PathBuf;

/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type. Only `Config` and
/// `Credential` are allowed to stop the process; everything else is scoped to
/// the message being handled.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("credential error: {path}: {reason}")]
    Credential { path: PathBuf, reason: String },

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("send error: {0}")]
    Send(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

/// Failures talking to the transit backend.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("backend returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
