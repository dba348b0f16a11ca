//! Static-key passthrough provider.
//!
//! Static API keys are modelled as a provider with a long fixed lifetime so
//! the cache treats every scheme uniformly.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::domain::errors::{CredentialError, CredentialResult};
use crate::domain::models::{CredentialSource, MintedCredential, SecretPayload};
use crate::domain::ports::CredentialProvider;

// Effectively non-expiring; the cache margin stays negligible against this.
const STATIC_KEY_LIFETIME_DAYS: i64 = 3650;

/// Passes static keys through unchanged, with no network access.
#[derive(Debug, Default)]
pub struct StaticKeyProvider;

impl StaticKeyProvider {
    /// Create the provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CredentialProvider for StaticKeyProvider {
    fn scheme(&self) -> &str {
        "static-key"
    }

    async fn mint(&self, source: &CredentialSource) -> CredentialResult<MintedCredential> {
        let CredentialSource::StaticKey { value } = source else {
            return Err(CredentialError::MalformedSource(
                "expected a static-key source".to_string(),
            ));
        };
        Ok(MintedCredential {
            payload: SecretPayload::ApiKey(value.clone()),
            expires_at: Utc::now() + Duration::days(STATIC_KEY_LIFETIME_DAYS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_key_passes_through() {
        let provider = StaticKeyProvider::new();
        let source = CredentialSource::StaticKey {
            value: "sk-123".to_string(),
        };
        let minted = provider.mint(&source).await.unwrap();
        assert_eq!(minted.payload, SecretPayload::ApiKey("sk-123".to_string()));
        assert!(minted.expires_at > Utc::now() + Duration::days(3000));
    }

    #[tokio::test]
    async fn test_static_key_rejects_other_sources() {
        let provider = StaticKeyProvider::new();
        let source = CredentialSource::ServiceAccountFile {
            path: "/tmp/sa.json".into(),
        };
        let result = provider.mint(&source).await;
        assert!(matches!(result, Err(CredentialError::MalformedSource(_))));
    }
}
