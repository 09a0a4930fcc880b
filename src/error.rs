use reqwest::StatusCode;
use thiserror::Error;

/// Failure while querying the homework status API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: timeout, DNS, connection reset.
    #[error("request to status API failed: {source}")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The API answered, but not with a success code.
    #[error("status API answered with HTTP {0}")]
    BadStatus(StatusCode),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport {
            source: Box::new(err),
        }
    }
}

/// The response body does not look like a homework status payload.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("response body is not a JSON object")]
    NotAnObject,
    #[error("response has no `homeworks` field")]
    MissingHomeworks,
    #[error("`homeworks` field is not a list")]
    NotAList,
}

/// A single homework record could not be interpreted.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("homework record has no `homework_name`")]
    MissingName,
    #[error("homework record has no `status`")]
    MissingStatus,
    #[error("unknown homework status `{0}`")]
    UnknownStatus(String),
}

/// Everything that can go wrong inside one poll cycle.
///
/// All variants are recoverable: the loop logs them and tries again on the
/// next tick.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Missing startup configuration. The only fatal error in the program.
#[derive(Debug, Error)]
#[error("required environment variable {0} is not set")]
pub struct ConfigError(pub &'static str);
