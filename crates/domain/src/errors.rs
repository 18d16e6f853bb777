//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad classes of [`AepError`], used for logging labels and for callers
/// that only care about the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Missing config keys, unknown gateways, unresolvable endpoint paths
    Configuration,
    /// Response status outside the accepted set
    Http,
    /// Connection failures and unparseable response bodies
    Transport,
    /// Terminal failure or timeout while polling a long-running job
    Process,
    /// Remote side answered outside the agreed vocabulary
    Protocol,
    /// Content the client cannot decode
    Content,
    /// Caller input that the platform state cannot satisfy
    Input,
    /// Token acquisition failures
    Auth,
}

/// Main error type for platform operations
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum AepError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown endpoint: {path}")]
    UnknownEndpoint { path: String },

    #[error("{status} HTTP request failed: {body} for url: {url}")]
    HttpRequest { status: u16, body: String, url: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid JSON from {url}: {message}")]
    InvalidJson { url: String, message: String },

    #[error("The process has failed (status {status})")]
    ProcessFailed { status: String },

    #[error(
        "Unknown status {status}. Expecting {success} for success, {wait} for wait, {failure} for failure"
    )]
    UnexpectedStatus { status: String, success: String, wait: String, failure: String },

    #[error("Polling gave up after {attempts} attempts (last status {last_status})")]
    PollingTimeout { attempts: u32, last_status: String },

    #[error("Unsupported content: {0}")]
    UnsupportedContent(String),

    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query cannot be updated in place: {0}")]
    QueryImmutable(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AepError {
    /// Category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) | Self::UnknownEndpoint { .. } => ErrorCategory::Configuration,
            Self::HttpRequest { .. } => ErrorCategory::Http,
            Self::Transport(_) | Self::InvalidJson { .. } => ErrorCategory::Transport,
            Self::ProcessFailed { .. } | Self::PollingTimeout { .. } => ErrorCategory::Process,
            Self::UnexpectedStatus { .. } | Self::MissingField { .. } => ErrorCategory::Protocol,
            Self::UnsupportedContent(_) => ErrorCategory::Content,
            Self::NotFound(_) | Self::QueryImmutable(_) | Self::InvalidInput(_) => {
                ErrorCategory::Input
            }
            Self::Auth(_) => ErrorCategory::Auth,
        }
    }

    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::UnknownEndpoint { .. } => "unknown_endpoint",
            Self::HttpRequest { .. } => "http_request",
            Self::Transport(_) => "transport",
            Self::InvalidJson { .. } => "invalid_json",
            Self::ProcessFailed { .. } => "process_failed",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::PollingTimeout { .. } => "polling_timeout",
            Self::UnsupportedContent(_) => "unsupported_content",
            Self::MissingField { .. } => "missing_field",
            Self::NotFound(_) => "not_found",
            Self::QueryImmutable(_) => "query_immutable",
            Self::Auth(_) => "auth",
            Self::InvalidInput(_) => "invalid_input",
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpRequest { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for platform operations
pub type Result<T> = std::result::Result<T, AepError>;
