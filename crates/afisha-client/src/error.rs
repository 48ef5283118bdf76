//! Client error types.

use std::fmt;

use afisha_core::IcsError;
use afisha_providers::{FetchFailure, ProviderError};

use crate::config::ConfigError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(ConfigError),
    /// Provider error outside the repository (e.g. a direct fetch).
    Provider(ProviderError),
    /// The calendar could not be loaded.
    Fetch(FetchFailure),
    /// ICS generation failed.
    Ics(IcsError),
    /// IO error.
    Io(std::io::Error),
    /// JSON serialization error.
    Json(serde_json::Error),
    /// Invalid argument combination or value.
    Usage(String),
    /// No event with the given id in the loaded year.
    EventNotFound(String),
    /// The current user is not on the admin allow-list.
    NotAdmin,
    /// Action failed (open, copy, etc).
    Action(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {}", err),
            Self::Provider(err) => write!(f, "provider error: {}", err),
            Self::Fetch(failure) => write!(f, "{}", failure),
            Self::Ics(err) => write!(f, "export failed: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Json(err) => write!(f, "JSON error: {}", err),
            Self::Usage(msg) => write!(f, "{}", msg),
            Self::EventNotFound(id) => write!(f, "no event with id `{}`", id),
            Self::NotAdmin => write!(f, "this command is available to administrators only"),
            Self::Action(msg) => write!(f, "action failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Provider(err) => Some(err),
            Self::Ics(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<FetchFailure> for ClientError {
    fn from(failure: FetchFailure) -> Self {
        Self::Fetch(failure)
    }
}

impl From<IcsError> for ClientError {
    fn from(err: IcsError) -> Self {
        Self::Ics(err)
    }
}
