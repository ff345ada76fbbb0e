use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::booking::AVIATIONSTACK_API_URL;
use crate::error::{AdvisorError, Result};
use crate::locale::{self, DEFAULT_LANGUAGE};
use crate::transport::GEMINI_API_URL;

/// Main configuration structure for the advisor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub gemini: GeminiConfig,
    pub aviation: AviationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub version: String,
    /// Language used when a request does not name one
    pub default_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub endpoint: String,
    /// Request timeout; unset means no timeout
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AviationConfig {
    /// Flight lookups are skipped when unset
    pub api_key: Option<String>,
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "movesmart-advisor".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: GEMINI_API_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl Default for AviationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: AVIATIONSTACK_API_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides.
    /// Fails when the file is broken or a required credential is missing.
    pub fn load() -> Result<Self> {
        let env_paths = ["../.env", ".env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::warn!(
                "No .env file found in any expected location - continuing with env vars only"
            );
        }

        let config_path =
            env::var("ADVISOR_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| {
                AdvisorError::Config(format!("Failed to read config file {config_path}: {e}"))
            })?;
            let config = Self::from_yaml(&contents).map_err(|e| {
                AdvisorError::Config(format!("Failed to parse config file {config_path}: {e}"))
            })?;
            tracing::info!("Loaded configuration from {}", config_path);
            config
        } else {
            tracing::warn!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Apply environment variable overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Gemini overrides
        if let Some(api_key) = lookup("GEMINI_API_KEY") {
            self.gemini.api_key = api_key;
        }
        if let Some(endpoint) = lookup("GEMINI_API_URL") {
            self.gemini.endpoint = endpoint;
        }
        if let Some(timeout) = lookup("GEMINI_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(secs) => self.gemini.timeout_seconds = Some(secs),
                Err(_) => tracing::warn!("Ignoring invalid GEMINI_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        // AviationStack overrides
        if let Some(api_key) = lookup("AVIATIONSTACK_API_KEY") {
            self.aviation.api_key = Some(api_key).filter(|k| !k.is_empty());
        }
        if let Some(endpoint) = lookup("AVIATIONSTACK_API_URL") {
            self.aviation.endpoint = endpoint;
        }

        // Service overrides
        if let Some(language) = lookup("ADVISOR_DEFAULT_LANGUAGE") {
            self.service.default_language = language;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.gemini.api_key.trim().is_empty() {
            return Err(AdvisorError::Config(
                "GEMINI_API_KEY must be set".to_string(),
            ));
        }
        if self.gemini.endpoint.is_empty() {
            return Err(AdvisorError::Config(
                "gemini.endpoint cannot be empty".to_string(),
            ));
        }
        if self.gemini.timeout_seconds == Some(0) {
            return Err(AdvisorError::Config(
                "gemini.timeout_seconds cannot be 0".to_string(),
            ));
        }
        if self.aviation.timeout_seconds == Some(0) {
            return Err(AdvisorError::Config(
                "aviation.timeout_seconds cannot be 0".to_string(),
            ));
        }
        if !locale::is_supported(&self.service.default_language) {
            tracing::warn!(
                "Default language '{}' has no templates; English will be used",
                self.service.default_language
            );
        }
        Ok(())
    }

    /// Get Gemini timeout as Duration
    pub fn gemini_timeout(&self) -> Option<Duration> {
        self.gemini.timeout_seconds.map(Duration::from_secs)
    }

    /// Get AviationStack timeout as Duration
    pub fn aviation_timeout(&self) -> Option<Duration> {
        self.aviation.timeout_seconds.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let cfg = Config::default();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, AdvisorError::Config(msg) if msg.contains("GEMINI_API_KEY")));
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = Config::default();
        cfg.apply_env_overrides(lookup_from(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_TIMEOUT_SECONDS", "20"),
            ("AVIATIONSTACK_API_KEY", "fly"),
            ("ADVISOR_DEFAULT_LANGUAGE", "es"),
        ]));
        assert_eq!(cfg.gemini.api_key, "secret");
        assert_eq!(cfg.gemini_timeout(), Some(Duration::from_secs(20)));
        assert_eq!(cfg.aviation.api_key.as_deref(), Some("fly"));
        assert_eq!(cfg.service.default_language, "es");
        assert_eq!(cfg.gemini.endpoint, GEMINI_API_URL);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_timeout_override_is_ignored() {
        let mut cfg = Config::default();
        cfg.apply_env_overrides(lookup_from(&[("GEMINI_TIMEOUT_SECONDS", "soon")]));
        assert_eq!(cfg.gemini.timeout_seconds, None);
    }

    #[test]
    fn test_empty_aviation_key_is_unset() {
        let mut cfg = Config::default();
        cfg.apply_env_overrides(lookup_from(&[("AVIATIONSTACK_API_KEY", "")]));
        assert_eq!(cfg.aviation.api_key, None);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut cfg = Config::default();
        cfg.gemini.api_key = "k".to_string();
        cfg.gemini.timeout_seconds = Some(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let cfg = Config::from_yaml(
            "gemini:\n  api_key: from-file\n  timeout_seconds: 30\nservice:\n  default_language: es\n",
        )
        .expect("yaml should parse");
        assert_eq!(cfg.gemini.api_key, "from-file");
        assert_eq!(cfg.gemini.endpoint, GEMINI_API_URL);
        assert_eq!(cfg.gemini.timeout_seconds, Some(30));
        assert_eq!(cfg.service.default_language, "es");
        assert_eq!(cfg.service.name, "movesmart-advisor");
        assert_eq!(cfg.aviation.endpoint, AVIATIONSTACK_API_URL);
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let mut cfg = Config::from_yaml("gemini:\n  api_key: from-file\n").unwrap();
        cfg.apply_env_overrides(lookup_from(&[("GEMINI_API_KEY", "from-env")]));
        assert_eq!(cfg.gemini.api_key, "from-env");
    }
}
