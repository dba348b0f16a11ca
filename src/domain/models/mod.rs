//! Domain models.

pub mod credential;

pub use credential::{
    AssumeRoleOptions, CachedCredential, CredentialSource, MintedCredential, SecretPayload,
};
