//! Error types shared across the core crate.
//!
//! Failures are always local: the worst case for the page is a stale or
//! incomplete view, so nothing here is meant to be fatal.

use std::fmt;

/// Failure reported by a [`SkillSource`](crate::source::SkillSource).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (offline, CORS, bad URL).
    Network(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The response body could not be read as text.
    Body(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Status(status) => write!(f, "unexpected HTTP status {status}"),
            Self::Body(msg) => write!(f, "unreadable response body: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Top-level error type for skilldex operations.
#[derive(Debug)]
pub enum SkilldexError {
    /// A resource could not be fetched.
    Fetch { path: String, source: FetchError },
    /// A resource was fetched but is not the expected JSON shape.
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

impl SkilldexError {
    /// Path of the resource involved.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Fetch { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

impl fmt::Display for SkilldexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { path, source } => write!(f, "failed to load {path}: {source}"),
            Self::Parse { path, source } => write!(f, "failed to parse {path}: {source}"),
        }
    }
}

impl std::error::Error for SkilldexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Result type for skilldex operations.
pub type SkilldexResult<T> = Result<T, SkilldexError>;
