use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Key or secret material could not be loaded.
///
/// Always raised while a producer is being constructed, before any token of a
/// batch is generated.
#[derive(Debug, Error)]
pub enum KeyLoadError {
    #[error("failed to read key material from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{origin} is not a valid {expected}: {reason}")]
    InvalidKey {
        origin: String,
        expected: &'static str,
        reason: String,
    },
}

/// A single token could not be produced.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to serialize claims")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to sign token")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("failed to encrypt token: {0}")]
    Encryption(String),
}

/// The first failing unit of a batch, picked from the lowest failing shard.
#[derive(Debug, Error)]
#[error("token {index} (shard {shard}) failed")]
pub struct BatchError {
    pub shard: usize,
    pub index: usize,
    #[source]
    pub source: TokenError,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write tokens to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("expected {expected} segments in compact token, got {found}")]
    SegmentCount { expected: usize, found: usize },

    #[error("segment is not valid base64url")]
    Base64(#[from] base64::DecodeError),

    #[error("segment is not valid claims JSON")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    KeyLoad(#[from] KeyLoadError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
