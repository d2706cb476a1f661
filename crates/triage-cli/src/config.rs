//! CLI configuration management.
//!
//! Precedence, lowest first: built-in defaults, the JSON config file, then
//! environment variables (a `.env` file is loaded into the environment
//! first). The provider API key is never part of this struct; only the name
//! of the variable that holds it is.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use triage_classifier::{ClassifierConfig, CredentialProvider, EnvCredentials};

/// Application-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Completion provider settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let config = match Self::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };

        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Read a config file. Missing keys take their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Apply `TRIAGE_*` overrides from `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TRIAGE_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("TRIAGE_PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("TRIAGE_PORT is not a valid port: {port}"))?;
        }
        if let Some(api_url) = lookup("TRIAGE_API_URL") {
            self.classifier.api_url = api_url;
        }
        if let Some(model) = lookup("TRIAGE_MODEL") {
            self.classifier.model = model;
        }
        if let Some(var) = lookup("TRIAGE_CREDENTIAL_ENV") {
            self.classifier.credential_env = var;
        }
        Ok(self)
    }

    /// Path to the configuration file.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "triage", "triage")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Credentials read from the configured variable.
    pub fn credentials(&self) -> EnvCredentials {
        EnvCredentials::new(&self.classifier.credential_env)
    }

    /// Whether the credential variable is currently set and non-empty.
    pub fn has_credential(&self) -> bool {
        self.credentials().api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.classifier.credential_env, "OPENROUTER_API_KEY");
    }

    #[test]
    fn env_overrides_win() {
        let config = Config::default()
            .with_overrides(env(&[
                ("TRIAGE_PORT", "9090"),
                ("TRIAGE_MODEL", "meta-llama/llama-3-8b-instruct"),
                ("TRIAGE_CREDENTIAL_ENV", "MY_KEY"),
            ]))
            .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.classifier.model, "meta-llama/llama-3-8b-instruct");
        assert_eq!(config.classifier.credential_env, "MY_KEY");
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = Config::default()
            .with_overrides(env(&[("TRIAGE_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("TRIAGE_PORT"));
    }

    #[test]
    fn blank_credential_counts_as_absent() {
        let var = "TRIAGE_CONFIG_TEST_BLANK_KEY";
        let config = Config::default()
            .with_overrides(env(&[("TRIAGE_CREDENTIAL_ENV", var)]))
            .unwrap();
        assert_eq!(config.credentials().var(), var);

        std::env::set_var(var, "  ");
        assert!(!config.has_credential());

        std::env::set_var(var, "sk-live");
        assert!(config.has_credential());

        std::env::remove_var(var);
    }

    #[test]
    fn partial_config_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"port": 7000, "classifier": {"model": "x/y"}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.classifier.model, "x/y");
        assert_eq!(config.classifier.api_url, "https://openrouter.ai/api/v1");
    }
}
