//! Error handling for the Crew Deck dashboard
//!
//! This module defines the crate error type, a Result alias, and the
//! helpers that turn errors into the single human-readable message a list
//! view shows to the user.
//!
//! A response to a superseded request is *not* an error. It is reported as
//! [`crate::list::ApplyOutcome::Discarded`] and never reaches this module.

use std::time::Duration;
use thiserror::Error;

/// Main error type for Crew Deck operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// No response was received (connectivity, DNS, CORS-style refusal)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("Server responded {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Malformed local input, rejected before any request is made
    #[error("Validation error: {0}")]
    Validation(String),

    /// The response body could not be interpreted
    #[error("Decode error: {0}")]
    Decode(String),

    /// The fetch-all loop hit its page cap without seeing the end of data
    #[error("Fetch-all stopped after {pages} pages without reaching the end of data")]
    FetchAllCapExceeded { pages: u32 },

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DashboardError>,
    },
}

impl DashboardError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DashboardError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Strip any context wrappers and return the underlying error
    pub fn root(&self) -> &DashboardError {
        match self {
            DashboardError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Categorize the error for display purposes
    pub fn category(&self) -> ErrorCategory {
        match self.root() {
            DashboardError::Network(_) => ErrorCategory::Network,
            DashboardError::Timeout(_) => ErrorCategory::Timeout,
            DashboardError::Server { status, .. } if *status == 404 => ErrorCategory::NotFound,
            DashboardError::Server { status, .. } if *status == 401 || *status == 403 => {
                ErrorCategory::Auth
            }
            DashboardError::Server { .. } => ErrorCategory::Server,
            DashboardError::Validation(_) => ErrorCategory::Validation,
            DashboardError::Config(_) | DashboardError::Io(_) => ErrorCategory::Config,
            _ => ErrorCategory::Other,
        }
    }

    /// Format the error as the message shown next to a list view
    ///
    /// Server-provided messages are preferred; network failures get a
    /// hint about connectivity since no status code is available.
    pub fn user_message(&self) -> String {
        match self.root() {
            DashboardError::Network(_) => {
                "No response received from server (network/CORS?).".to_string()
            }
            DashboardError::Server {
                status,
                message: Some(message),
            } => format!("Server responded {status}: {message}"),
            DashboardError::Server {
                status,
                message: None,
            } => format!("Server responded {status}"),
            DashboardError::Timeout(after) => format_timeout_error(after.as_secs()),
            DashboardError::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for Crew Deck operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

/// Format a timeout message
pub fn format_timeout_error(timeout_secs: u64) -> String {
    format!("Request timed out after {}s", timeout_secs)
}

/// Categorize an error for display purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network/connection issues
    Network,
    /// Request timed out
    Timeout,
    /// Authentication/authorization issues
    Auth,
    /// Resource not found
    NotFound,
    /// Any other non-2xx response
    Server,
    /// Bad local input
    Validation,
    /// Configuration issues
    Config,
    /// Other/unknown issues
    Other,
}

impl ErrorCategory {
    /// Get a short label for the category
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Network",
            ErrorCategory::Timeout => "Timeout",
            ErrorCategory::Auth => "Auth",
            ErrorCategory::NotFound => "Not Found",
            ErrorCategory::Server => "Server",
            ErrorCategory::Validation => "Invalid Input",
            ErrorCategory::Config => "Config",
            ErrorCategory::Other => "Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashboardError::Validation("airport and date required".to_string());
        assert_eq!(err.to_string(), "Validation error: airport and date required");
    }

    #[test]
    fn test_server_error_display() {
        let err = DashboardError::Server {
            status: 500,
            message: Some("Database error".to_string()),
        };
        assert_eq!(err.to_string(), "Server responded 500: Database error");

        let err = DashboardError::Server {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "Server responded 502");
    }

    #[test]
    fn test_error_with_context() {
        let err = DashboardError::Network("connection refused".to_string());
        let with_ctx = err.with_context("Failed to fetch crew");
        assert!(with_ctx.to_string().contains("Failed to fetch crew"));
        assert_eq!(with_ctx.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_user_message_prefers_server_detail() {
        let err = DashboardError::Server {
            status: 400,
            message: Some("flight_id 9 does not exist".to_string()),
        }
        .with_context("assign roster");
        assert_eq!(
            err.user_message(),
            "Server responded 400: flight_id 9 does not exist"
        );
    }

    #[test]
    fn test_user_message_network_and_timeout() {
        let err = DashboardError::Network("dns error".to_string());
        assert_eq!(
            err.user_message(),
            "No response received from server (network/CORS?)."
        );

        let err = DashboardError::Timeout(Duration::from_secs(30));
        assert_eq!(err.user_message(), "Request timed out after 30s");
    }

    #[test]
    fn test_categorize_server_statuses() {
        let not_found = DashboardError::Server {
            status: 404,
            message: None,
        };
        assert_eq!(not_found.category(), ErrorCategory::NotFound);

        let denied = DashboardError::Server {
            status: 403,
            message: None,
        };
        assert_eq!(denied.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::Validation.label(), "Invalid Input");
    }
}
