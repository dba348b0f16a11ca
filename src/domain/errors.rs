//! Domain errors for the credential subsystem.

use thiserror::Error;

/// Format a list of missing option names as a human-readable string: `a, b, c`.
fn format_missing_fields(fields: &[String]) -> String {
    fields.join(", ")
}

/// Errors that can occur while minting, signing, or caching credentials.
///
/// Every failure mode is a structured value; no path terminates the process.
/// The cache propagates provider errors verbatim and performs no retry of its
/// own, so callers can apply their own policy.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The long-lived credential document is missing, unreadable, or not in
    /// the expected shape (bad JSON, missing fields, bad PEM).
    #[error("Malformed credential source: {0}")]
    MalformedSource(String),

    /// One or more required role-assumption options are absent. Carries the
    /// complete list of missing field names, not merely the first.
    #[error("Missing required options: {}", format_missing_fields(.0))]
    MissingRequiredOptions(Vec<String>),

    /// The token or role endpoint returned a non-success status, or the
    /// request failed in transit. Carries status and body when available.
    #[error("Credential exchange failed ({}): {body}", .status.map_or_else(|| "transport error".to_string(), |s| format!("HTTP {s}")))]
    ExchangeFailed {
        /// HTTP status code, when a response was received.
        status: Option<u16>,
        /// Response body or transport error description.
        body: String,
    },

    /// A cryptographic operation failed (malformed PEM, wrong key type).
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// The endpoint replied with a success status but the body did not match
    /// the expected JSON/XML shape.
    #[error("Unexpected response shape: {0}")]
    ParseFailed(String),
}

/// Convenience alias used throughout the crate.
pub type CredentialResult<T> = Result<T, CredentialError>;

impl From<reqwest::Error> for CredentialError {
    fn from(err: reqwest::Error) -> Self {
        CredentialError::ExchangeFailed {
            status: err.status().map(|s| s.as_u16()),
            body: err.to_string(),
        }
    }
}
