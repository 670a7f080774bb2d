//! services/client/src/error.rs
//!
//! Defines the primary error type for the client binary.

use crate::config::ConfigError;
use coursebook_core::ports::PortError;

/// The primary error type for the `client` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core ports or a session read.
    #[error("{0}")]
    Port(#[from] PortError),

    /// Represents an error from building the underlying HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a failure to render a payload as JSON output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Represents a standard Input/Output error (e.g., reading the terminal).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Represents a blocking task (such as the password prompt) that panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A user-facing failure that has already been explained, such as a rejected signin.
    #[error("{0}")]
    Rejected(String),
}
