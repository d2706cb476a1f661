//! Where the classifier gets its API credential from.
//!
//! The credential is looked up on every call, never cached, so rotating or
//! removing it takes effect on the next classification.

use std::env;

/// Supplies the provider API key at call time.
pub trait CredentialProvider: Send + Sync {
    /// The current key, or `None` when classification is not configured.
    fn api_key(&self) -> Option<String>;
}

/// Reads the key from an environment variable on each call.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable being read.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|key| !key.trim().is_empty())
    }
}

/// A fixed key (or a fixed absence of one).
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<String>);

impl StaticCredentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        self.0.clone()
    }
}
