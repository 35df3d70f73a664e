//! Error types shared by every part of the crate.
//!
//! Remote failures, configuration problems and precondition violations all
//! surface as [`Error`]. The queue peek keeps its own narrower
//! [`QueuePeekError`] so it can decide which failures fall back to the
//! placeholder text.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request to Spotify failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify responded with {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot (de)serialize json: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("'{0}' is not a valid Spotify scope")]
    InvalidScope(String),

    #[error("recommendations need between 1 and 5 seed tracks, got {0}")]
    InvalidSeedCount(usize),

    #[error("repeat count must be a non-negative integer, got '{0}'")]
    InvalidRepeatCount(String),

    #[error("Spotify returned no recommendations to reseed from")]
    EmptySeedPool,

    #[error("current playback does not come from a playlist")]
    NoPlaylistContext,

    #[error("malformed response from Spotify: {0}")]
    MalformedResponse(String),
}

/// Why the next queue entry could not be read.
#[derive(Debug, Error)]
pub enum QueuePeekError {
    #[error("cannot reach the player queue")]
    Network(#[source] Error),

    #[error("nothing is queued")]
    Empty,

    #[error("unexpected queue payload: {0}")]
    Malformed(String),
}

impl From<Error> for QueuePeekError {
    fn from(err: Error) -> Self {
        match err {
            Error::MalformedResponse(msg) => QueuePeekError::Malformed(msg),
            Error::Serde(e) => QueuePeekError::Malformed(e.to_string()),
            other => QueuePeekError::Network(other),
        }
    }
}
