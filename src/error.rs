use thiserror::Error;

/// Errors surfaced to the user by the calculators and the persistence
/// collaborators. None of them are fatal; each ends one user action.
#[derive(Error, Debug)]
pub enum Error {
    /// A clock time that is not `hour[.minute]` on the 12-hour dial.
    #[error("Invalid time format: {0:?}")]
    InvalidTimeFormat(String),

    /// Bad numeric input, non-positive rate/hours/days, minute >= 60.
    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote call did not complete.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote store answered with a non-success status.
    #[error("Remote store responded with {0}")]
    RemoteStatus(http::StatusCode),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Malformed stored data: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
