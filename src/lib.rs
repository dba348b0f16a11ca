//! Credmint - Ephemeral Credential Minting for Cloud LLM Providers
//!
//! Credmint turns long-lived credential documents into short-lived,
//! cryptographically derived ones: it signs JWT assertions and exchanges them
//! for OAuth2 bearer tokens, signs role-assumption requests with a
//! derived-key chain and exchanges them for temporary key triples, and caches
//! the results so concurrent callers never trigger redundant mints and never
//! receive expired secrets.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): credential models, error taxonomy, and the
//!   `CredentialProvider` port
//! - **Infrastructure Layer** (`infrastructure`): signing primitives, one
//!   minter per credential scheme, the credential cache, and configuration
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use credmint::{CredentialCache, CredentialSource, ProviderRouter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cache = CredentialCache::new(Arc::new(ProviderRouter::new()?));
//!     let source = CredentialSource::ServiceAccountFile {
//!         path: "/etc/keys/service-account.json".into(),
//!     };
//!     let credential = cache.get_or_refresh(&source).await?;
//!     // Attach `credential.payload` to an outbound LLM request.
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::errors::{CredentialError, CredentialResult};
pub use domain::models::{
    AssumeRoleOptions, CachedCredential, CredentialSource, MintedCredential, SecretPayload,
};
pub use domain::ports::CredentialProvider;
pub use infrastructure::config::{ConfigError, ConfigLoader, CredentialsConfig};
pub use infrastructure::credentials::{
    AssumeRoleProvider, CredentialCache, ProviderRouter, ServiceAccountProvider, StaticKeyProvider,
};
