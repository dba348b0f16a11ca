//! Domain models for credential sources and minted credentials.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

/// Immutable identity of a long-lived credential origin.
///
/// A source describes where a short-lived credential can be minted from; it
/// never holds the minted secret itself. Sources with the same cache key are
/// treated as the same identity by the [`CredentialCache`].
///
/// [`CredentialCache`]: crate::infrastructure::credentials::CredentialCache
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// A service-account key file on disk. The document is JSON containing
    /// `client_email` and a PEM-encoded RSA `private_key`; both are parsed at
    /// mint time so a bad file surfaces as a recoverable error.
    ServiceAccountFile {
        /// Path to the JSON key document.
        path: PathBuf,
    },

    /// Long-lived base keys plus a role identifier, exchanged for a temporary
    /// access/secret/session-token triple.
    AssumedRole(AssumeRoleOptions),

    /// A static API key passed through unchanged.
    StaticKey {
        /// The key material.
        value: String,
    },
}

impl CredentialSource {
    /// Stable string key identifying this source in the cache.
    ///
    /// Service accounts are keyed by file path; assumed roles by
    /// `role_arn + session_name + access_key_id`; static keys by a digest of
    /// the key material so the secret itself never appears in logs or maps.
    pub fn cache_key(&self) -> String {
        match self {
            CredentialSource::ServiceAccountFile { path } => {
                format!("sa:{}", path.display())
            }
            CredentialSource::AssumedRole(options) => format!(
                "role:{}:{}:{}",
                options.role_arn.as_deref().unwrap_or_default(),
                options.role_session_name.as_deref().unwrap_or_default(),
                options.access_key_id.as_deref().unwrap_or_default(),
            ),
            CredentialSource::StaticKey { value } => {
                let digest = Sha256::digest(value.as_bytes());
                format!("static:{}", hex::encode(digest))
            }
        }
    }
}

/// Caller-supplied options for a role-assumption exchange.
///
/// The four required fields are `Option` so validation can report every
/// missing field at once rather than failing on the first.
#[derive(Debug, Clone, Default)]
pub struct AssumeRoleOptions {
    /// Identifier of the role to assume. Required.
    pub role_arn: Option<String>,
    /// Name recorded against the temporary session. Required.
    pub role_session_name: Option<String>,
    /// Long-lived access key id used to sign the exchange. Required.
    pub access_key_id: Option<String>,
    /// Long-lived secret key used to derive the signing key. Required.
    pub secret_access_key: Option<String>,
    /// External id forwarded to the role endpoint, when the role demands one.
    pub external_id: Option<String>,
    /// Requested session lifetime in seconds; the issuer may clamp it.
    pub duration_seconds: Option<u32>,
    /// Signing region; defaults to the configured region when absent.
    pub region: Option<String>,
}

impl AssumeRoleOptions {
    /// Names of all required fields that are absent, in declaration order.
    pub fn missing_required_fields(&self) -> Vec<String> {
        let required = [
            ("role_arn", &self.role_arn),
            ("role_session_name", &self.role_session_name),
            ("access_key_id", &self.access_key_id),
            ("secret_access_key", &self.secret_access_key),
        ];
        required
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| (*name).to_string())
            .collect()
    }
}

/// The secret material carried by a minted credential.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretPayload {
    /// An OAuth2 bearer token from a JWT exchange.
    BearerToken(String),
    /// A temporary access/secret/session-token triple from a role assumption.
    SessionCredentials {
        /// Temporary access key id.
        access_key_id: String,
        /// Temporary secret key.
        secret_access_key: String,
        /// Session token accompanying the pair.
        session_token: String,
    },
    /// A static API key passed through unchanged.
    ApiKey(String),
}

impl fmt::Debug for SecretPayload {
    // Secrets never appear in Debug output; log scrubbing relies on this.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretPayload::BearerToken(_) => f.write_str("BearerToken([REDACTED])"),
            SecretPayload::SessionCredentials { access_key_id, .. } => f
                .debug_struct("SessionCredentials")
                .field("access_key_id", access_key_id)
                .field("secret_access_key", &"[REDACTED]")
                .field("session_token", &"[REDACTED]")
                .finish(),
            SecretPayload::ApiKey(_) => f.write_str("ApiKey([REDACTED])"),
        }
    }
}

/// A freshly minted credential as returned by a provider.
///
/// `expires_at` is the issuer's true expiry; the cache subtracts its safety
/// margin before storing.
#[derive(Debug, Clone)]
pub struct MintedCredential {
    /// The secret material.
    pub payload: SecretPayload,
    /// Absolute issuer-stated expiry.
    pub expires_at: DateTime<Utc>,
}

/// A credential held by the cache.
///
/// Invariant: `expires_at` is strictly before the issuer's real expiry (the
/// safety margin has already been applied), so a value read from the cache is
/// never within its last margin-seconds of true validity.
#[derive(Debug, Clone)]
pub struct CachedCredential {
    /// The secret material.
    pub payload: SecretPayload,
    /// Margined deadline after which the entry is considered stale.
    pub expires_at: DateTime<Utc>,
    /// When the provider minted this value.
    pub minted_at: DateTime<Utc>,
}

impl CachedCredential {
    /// Whether the entry is still usable at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
