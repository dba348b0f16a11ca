//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the async trait interfaces that infrastructure
//! adapters implement:
//! - CredentialProvider: mint one fresh credential from a long-lived source
//!
//! These traits define the contracts that allow the domain to be independent
//! of specific infrastructure implementations.

pub mod credential_provider;

pub use credential_provider::CredentialProvider;
