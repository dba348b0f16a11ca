//! Per-scheme provider dispatch.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::CredentialResult;
use crate::domain::models::{CredentialSource, MintedCredential};
use crate::domain::ports::CredentialProvider;
use crate::infrastructure::config::CredentialsConfig;
use crate::infrastructure::credentials::assume_role::{AssumeRoleConfig, AssumeRoleProvider};
use crate::infrastructure::credentials::service_account::{
    ServiceAccountConfig, ServiceAccountProvider,
};
use crate::infrastructure::credentials::static_key::StaticKeyProvider;

/// Dispatches each source variant to its scheme's provider.
///
/// This is the provider the cache is normally constructed with; tests may
/// inject a single concrete provider instead.
pub struct ProviderRouter {
    service_account: ServiceAccountProvider,
    assume_role: AssumeRoleProvider,
    static_key: StaticKeyProvider,
}

impl ProviderRouter {
    /// Build a router with default provider configurations.
    pub fn new() -> CredentialResult<Self> {
        Ok(Self {
            service_account: ServiceAccountProvider::new()?,
            assume_role: AssumeRoleProvider::new()?,
            static_key: StaticKeyProvider::new(),
        })
    }

    /// Build a router from loaded configuration.
    pub fn from_config(config: &CredentialsConfig) -> CredentialResult<Self> {
        Ok(Self {
            service_account: ServiceAccountProvider::with_config(ServiceAccountConfig {
                token_url: config.oauth.token_url.clone(),
                scope: config.oauth.scope.clone(),
                jwt_lifetime_secs: config.oauth.jwt_lifetime_secs,
                timeout_secs: config.oauth.timeout_secs,
            })?,
            assume_role: AssumeRoleProvider::with_config(AssumeRoleConfig {
                endpoint: config.sts.endpoint.clone(),
                region: config.sts.region.clone(),
                timeout_secs: config.sts.timeout_secs,
            })?,
            static_key: StaticKeyProvider::new(),
        })
    }

    fn provider_for(&self, source: &CredentialSource) -> &dyn CredentialProvider {
        match source {
            CredentialSource::ServiceAccountFile { .. } => &self.service_account,
            CredentialSource::AssumedRole(_) => &self.assume_role,
            CredentialSource::StaticKey { .. } => &self.static_key,
        }
    }
}

#[async_trait]
impl CredentialProvider for ProviderRouter {
    fn scheme(&self) -> &str {
        "router"
    }

    async fn mint(&self, source: &CredentialSource) -> CredentialResult<MintedCredential> {
        let provider = self.provider_for(source);
        debug!(scheme = provider.scheme(), "dispatching mint");
        provider.mint(source).await
    }
}
