//! # dk-configs
//!
//! Typed settings for assembling the workflow. The case backend is chosen
//! here, once, at startup — nothing downstream feature-detects or branches on
//! the presence of an API again.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which case repository the application talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Locally-created cases plus seed data; no network.
    Memory,
    /// The dossier REST API is authoritative.
    Rest,
}

/// The acting user, as configured for the static auth plugin. The role is a
/// wire string ("DEMANDEUR" / "EXPERT" / "ADMIN") parsed at assembly time.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySettings {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_backend")]
    pub backend: BackendMode,

    /// Base URL of the dossier API. Required in rest mode.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Pre-issued bearer token handed to the static auth plugin.
    #[serde(default)]
    pub bearer_token: Option<SecretString>,

    #[serde(default)]
    pub identity: Option<IdentitySettings>,

    /// Display prefixes the id search recognizes: with the default "cap",
    /// searching "CAP-r1" or "#cap-r1" finds case "r1".
    #[serde(default = "default_reference_prefixes")]
    pub reference_prefixes: Vec<String>,
}

fn default_backend() -> BackendMode {
    BackendMode::Memory
}

fn default_reference_prefixes() -> Vec<String> {
    vec!["cap".to_string(), "capitune".to_string()]
}

impl Settings {
    /// Loads `dossier-kit.toml` (optional) then `DK_*` environment
    /// variables, with `.env` files honored.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let cfg = Config::builder()
            .add_source(File::with_name("dossier-kit").required(false))
            .add_source(Environment::with_prefix("DK").separator("__"))
            .build()?;

        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;

        tracing::debug!(backend = ?settings.backend, "configuration loaded");
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == BackendMode::Rest && self.api_base().is_none() {
            return Err(ConfigError::Invalid(
                "backend \"rest\" requires api_base_url".to_string(),
            ));
        }
        Ok(())
    }

    /// The API base with surrounding whitespace and any trailing slash
    /// removed; None when unset or blank.
    pub fn api_base(&self) -> Option<String> {
        self.api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(backend: BackendMode, base: Option<&str>) -> Settings {
        Settings {
            backend,
            api_base_url: base.map(str::to_string),
            bearer_token: None,
            identity: None,
            reference_prefixes: default_reference_prefixes(),
        }
    }

    #[test]
    fn rest_mode_requires_a_base_url() {
        assert!(bare(BackendMode::Rest, None).validate().is_err());
        assert!(bare(BackendMode::Rest, Some("   ")).validate().is_err());
        assert!(bare(BackendMode::Rest, Some("https://api.example.com"))
            .validate()
            .is_ok());
        assert!(bare(BackendMode::Memory, None).validate().is_ok());
    }

    #[test]
    fn api_base_is_normalized() {
        let settings = bare(BackendMode::Rest, Some(" https://api.example.com/ "));
        assert_eq!(
            settings.api_base().as_deref(),
            Some("https://api.example.com")
        );
        assert_eq!(bare(BackendMode::Memory, Some("")).api_base(), None);
    }
}
