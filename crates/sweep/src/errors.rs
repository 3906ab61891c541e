//! Error types for the orphan scan domain.
//!
//! [`GitHubError`] is the error half of the [`crate::GitHubApi`] port. It is
//! `Clone + Serialize` because a failed repository keeps its error inside the
//! [`crate::ScanResult`] that is later exported as JSON.
//!
//! [`ScanError`] covers the only conditions that abort a namespace scan as a
//! whole. Every other failure is isolated to one repository.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Namespace;

// ---------------------------------------------------------------------------
// Port-level errors
// ---------------------------------------------------------------------------

/// Failure reported by a [`crate::GitHubApi`] implementation.
///
/// The scanner never retries; every variant is terminal for the unit of work
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GitHubError {
    /// The API answered `404 Not Found` for the requested resource.
    #[error("Not found: {resource}")]
    NotFound {
        /// API path or description of the missing resource.
        resource: String,
    },

    /// The API answered with a non-success status other than 404.
    #[error("GitHub API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, or the raw body.
        message: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset, ...).
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("Unexpected response payload: {message}")]
    Decode { message: String },

    /// The caller supplied a value the API cannot accept (e.g. an empty name).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl GitHubError {
    /// Returns `true` for [`GitHubError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ---------------------------------------------------------------------------
// Scan-level errors
// ---------------------------------------------------------------------------

/// Errors that abort a namespace scan before any result is produced.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The namespace's repositories could not be enumerated.
    #[error("Failed to list repositories of '{namespace}': {source}")]
    ListRepositories {
        namespace: Namespace,
        #[source]
        source: GitHubError,
    },

    /// The scan options are unusable (e.g. zero concurrency).
    #[error("Invalid scan options: {message}")]
    InvalidOptions { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_error_serializes_with_kind_tag() {
        let err = GitHubError::Api {
            status: 502,
            message: "Bad Gateway".into(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "api");
        assert_eq!(json["status"], 502);
        assert_eq!(err.to_string(), "GitHub API error 502: Bad Gateway");
    }

    #[test]
    fn scan_error_exposes_listing_cause() {
        let err = ScanError::ListRepositories {
            namespace: Namespace::new("acme").unwrap(),
            source: GitHubError::NotFound {
                resource: "users/acme/repos".into(),
            },
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Not found: users/acme/repos"));
        assert!(err.to_string().contains("'acme'"));
    }
}
