//! Type-safe configuration models.

use serde::{Deserialize, Serialize};

use crate::infrastructure::credentials::assume_role::{DEFAULT_REGION, DEFAULT_STS_ENDPOINT};
use crate::infrastructure::credentials::cache::DEFAULT_SAFETY_MARGIN_SECS;
use crate::infrastructure::credentials::service_account::{DEFAULT_SCOPE, DEFAULT_TOKEN_URL};

/// Top-level configuration for the credential subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Service-account JWT exchange settings.
    pub oauth: OAuthConfig,
    /// Role-assumption settings.
    pub sts: StsConfig,
    /// Cache behavior.
    pub cache: CacheConfig,
}

/// Service-account JWT exchange settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// OAuth2 token endpoint; also the `aud` claim of the assertion.
    pub token_url: String,
    /// Scope requested in the assertion.
    pub scope: String,
    /// Declared assertion lifetime in seconds.
    pub jwt_lifetime_secs: i64,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            jwt_lifetime_secs: 3600,
            timeout_secs: 30,
        }
    }
}

/// Role-assumption settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StsConfig {
    /// Role endpoint URL.
    pub endpoint: String,
    /// Signing region used when a source carries none.
    pub region: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StsConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_STS_ENDPOINT.to_string(),
            region: DEFAULT_REGION.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Cache behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds subtracted from issuer-stated lifetimes before caching.
    pub safety_margin_secs: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            safety_margin_secs: DEFAULT_SAFETY_MARGIN_SECS,
        }
    }
}
