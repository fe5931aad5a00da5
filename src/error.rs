use std::time::Duration;

/// Failure of a single collector call. Always recoverable: the resolver treats
/// the signal as absent, except for `Rejected` media which becomes
/// [`EngineError::MalformedInput`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SignalError {
    #[error("collector not configured")]
    NotConfigured,

    #[error("collector timed out after {0:?}")]
    Timeout(Duration),

    #[error("collector unavailable: {0}")]
    Unavailable(String),

    #[error("collector returned malformed data: {0}")]
    Malformed(String),

    #[error("input rejected by collector: {0}")]
    Rejected(String),
}

impl From<anyhow::Error> for SignalError {
    fn from(err: anyhow::Error) -> Self {
        SignalError::Unavailable(format!("{err:#}"))
    }
}

impl From<reqwest::Error> for SignalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SignalError::Unavailable(format!("http timeout: {err}"))
        } else if err.is_decode() {
            SignalError::Malformed(err.to_string())
        } else {
            SignalError::Unavailable(err.to_string())
        }
    }
}

pub type SignalResult<T> = Result<T, SignalError>;

/// Errors surfaced to callers of the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("request exceeded the {0:?} ceiling")]
    Timeout(Duration),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("lexicon error: {0}")]
    Lexicon(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
