//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - Credential minting and caching (providers + cache)
//! - Cryptographic signing primitives
//! - Configuration management
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod credentials;
pub mod signing;
