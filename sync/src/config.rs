//! Configuration for list sync.

use std::env;

/// Sync configuration, loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Site prefix every list API path is built from
    pub prefix: String,
}

impl SyncConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let prefix = lookup("SITE_PREFIX")
            .map(|prefix| prefix.trim_end_matches('/').to_string())
            .filter(|prefix| !prefix.is_empty())
            .ok_or(ConfigError::MissingPrefix)?;

        Ok(Self { prefix })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SITE_PREFIX environment variable is required")]
    MissingPrefix,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_prefix() {
        let config =
            SyncConfig::from_lookup(lookup(&[("SITE_PREFIX", "example.com/site/")])).unwrap();
        assert_eq!(config, SyncConfig::new("example.com/site"));
    }

    #[test]
    fn missing_or_blank_prefix() {
        assert_eq!(
            SyncConfig::from_lookup(lookup(&[])),
            Err(ConfigError::MissingPrefix)
        );
        assert_eq!(
            SyncConfig::from_lookup(lookup(&[("SITE_PREFIX", "/")])),
            Err(ConfigError::MissingPrefix)
        );
    }
}
