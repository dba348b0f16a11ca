//! Hierarchical configuration loading.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::infrastructure::config::model::CredentialsConfig;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("OAuth token URL cannot be empty")]
    EmptyTokenUrl,

    #[error("OAuth scope cannot be empty")]
    EmptyScope,

    #[error("Role endpoint cannot be empty")]
    EmptyStsEndpoint,

    #[error("Signing region cannot be empty")]
    EmptyRegion,

    #[error("Invalid jwt_lifetime_secs: {0}. Must be positive")]
    InvalidJwtLifetime(i64),

    #[error(
        "Invalid safety_margin_secs: {0}. Must be non-negative and below the JWT lifetime ({1})"
    )]
    InvalidSafetyMargin(i64, i64),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .credmint/config.yaml (project config)
    /// 3. .credmint/local.yaml (project local overrides, optional)
    /// 4. Environment variables (CREDMINT_* prefix, highest priority)
    pub fn load() -> Result<CredentialsConfig> {
        let config: CredentialsConfig = Figment::new()
            .merge(Serialized::defaults(CredentialsConfig::default()))
            .merge(Yaml::file(".credmint/config.yaml"))
            .merge(Yaml::file(".credmint/local.yaml"))
            .merge(Env::prefixed("CREDMINT_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<CredentialsConfig> {
        let config: CredentialsConfig = Figment::new()
            .merge(Serialized::defaults(CredentialsConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &CredentialsConfig) -> Result<(), ConfigError> {
        if config.oauth.token_url.is_empty() {
            return Err(ConfigError::EmptyTokenUrl);
        }
        if config.oauth.scope.is_empty() {
            return Err(ConfigError::EmptyScope);
        }
        if config.oauth.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidJwtLifetime(
                config.oauth.jwt_lifetime_secs,
            ));
        }
        if config.oauth.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.oauth.timeout_secs));
        }

        if config.sts.endpoint.is_empty() {
            return Err(ConfigError::EmptyStsEndpoint);
        }
        if config.sts.region.is_empty() {
            return Err(ConfigError::EmptyRegion);
        }
        if config.sts.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.sts.timeout_secs));
        }

        // A margin at or above the declared lifetime would cache every entry
        // already stale.
        if config.cache.safety_margin_secs < 0
            || config.cache.safety_margin_secs >= config.oauth.jwt_lifetime_secs
        {
            return Err(ConfigError::InvalidSafetyMargin(
                config.cache.safety_margin_secs,
                config.oauth.jwt_lifetime_secs,
            ));
        }

        Ok(())
    }
}
