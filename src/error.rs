//! Error types for the cast gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the cast gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Discovery subsystem failed to start (fatal at boot)
    #[error("discovery error: {0}")]
    Discovery(String),

    /// Device connectivity error - the transport could not reach the device
    /// or the session died. Distinguished from [`Error::Device`] so callers
    /// can tell "unreachable" apart from "misbehaved".
    #[error("connection error: {0}")]
    Connection(String),

    /// Device command error (quit/launch failed on a live session)
    #[error("device error: {0}")]
    Device(String),

    /// Client request validation error
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Whether this error is the distinguished connectivity kind
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
