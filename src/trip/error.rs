//! Errors from the trip collaborators (trip store, directions API).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("not found")]
    NotFound,

    #[error("no route returned")]
    NoRoute,

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("no trip store configured")]
    Unconfigured,
}
