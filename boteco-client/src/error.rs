//! Client error types

use shared::EntityKind;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::snapshot::{StorageError, StorageErrorKind};

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Fixture file missing, unreadable, or not a JSON array
    #[error("Failed to load fixture {}: {message}", path.display())]
    FixtureLoad { path: PathBuf, message: String },

    /// Non-2xx response or network failure on a remote fetch
    #[error("{}", transport_message(endpoint, *status, message))]
    Transport {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    /// 2xx response whose body is not the expected JSON
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    /// Reachability check of a backend failed
    #[error("Cannot reach {base_url}: {message}")]
    Connectivity { base_url: String, message: String },

    /// Payload does not match the entity schema
    #[error("{}", schema_message(*entity, *index, message))]
    Schema {
        entity: EntityKind,
        index: Option<usize>,
        message: String,
    },

    /// Snapshot store failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// HTTP client could not be built from the configuration
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

fn transport_message(endpoint: &str, status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("API error {code} on {endpoint}: {message}"),
        None => format!("Request to {endpoint} failed: {message}"),
    }
}

fn schema_message(entity: EntityKind, index: Option<usize>, message: &str) -> String {
    match index {
        Some(i) => format!("Invalid {entity} record at index {i}: {message}"),
        None => format!("Invalid {entity} payload: {message}"),
    }
}

impl ClientError {
    /// HTTP status carried by a transport error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether repeating the same call could succeed.
    ///
    /// 5xx responses, failures without a response and failed reachability
    /// checks are retryable; 4xx responses and local errors are not. The
    /// data-access layer itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { status: None, .. } => true,
            Self::Transport {
                status: Some(code), ..
            } => *code >= 500,
            Self::Connectivity { .. } => true,
            _ => false,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
