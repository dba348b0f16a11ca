//! Credential provider port.
//!
//! Every credential scheme (service-account JWT exchange, role assumption,
//! static passthrough) implements the same capability: produce one fresh
//! short-lived credential from a long-lived source. The cache consumes all
//! schemes uniformly through this trait.

use async_trait::async_trait;

use crate::domain::errors::CredentialResult;
use crate::domain::models::{CredentialSource, MintedCredential};

/// Port trait for credential minting implementations.
///
/// # Implementations
///
/// - `ServiceAccountProvider`: signs a JWT assertion and exchanges it at an
///   OAuth2 token endpoint for a bearer token
/// - `AssumeRoleProvider`: signs a role-assumption request with a derived-key
///   chain and exchanges it for a temporary key triple
/// - `StaticKeyProvider`: passes a static key through unchanged
/// - `ProviderRouter`: dispatches to the above by source variant
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the cache invokes them from
/// arbitrary tokio tasks.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Short identifier for the scheme, used in logs.
    ///
    /// Examples: "service-account-jwt", "assume-role", "static-key".
    fn scheme(&self) -> &str;

    /// Mint one fresh credential from `source`.
    ///
    /// A mint either completes or fails; no cancellation contract is imposed
    /// beyond whatever timeout the transport enforces. Errors are structured
    /// values and safe to surface to callers unmodified.
    async fn mint(&self, source: &CredentialSource) -> CredentialResult<MintedCredential>;
}
