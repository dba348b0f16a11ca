//! Credential minting and caching infrastructure
//!
//! One minter per credential scheme, all consumed uniformly by the cache:
//! - Service-account JWT exchange (OAuth2 bearer tokens)
//! - Role assumption (temporary access/secret/session-token triples)
//! - Static key passthrough

pub mod assume_role;
pub mod cache;
pub mod router;
pub mod service_account;
pub mod static_key;

pub use assume_role::{AssumeRoleConfig, AssumeRoleProvider};
pub use cache::{CredentialCache, DEFAULT_SAFETY_MARGIN_SECS};
pub use router::ProviderRouter;
pub use service_account::{ServiceAccountConfig, ServiceAccountProvider};
pub use static_key::StaticKeyProvider;
