// Runtime configuration.
// Reads the shop endpoint, access credential and timeouts from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{HoneyError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://api.jsonbin.io/v3/b/68d6a50cae596e708ffcc69c";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_MASTER_KEY: &str = "HONEYSHOPS_MASTER_KEY";
pub const ENV_ENDPOINT: &str = "HONEYSHOPS_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "HONEYSHOPS_TIMEOUT_SECS";
pub const ENV_CACHE_FILE: &str = "HONEYSHOPS_CACHE_FILE";

/// Settings needed to reach the shop listing and store its snapshot.
#[derive(Debug, Clone)]
pub struct Config {
    /// Full URL of the shop listing.
    pub endpoint: String,
    /// Value sent in the `X-Master-Key` header. Only needed for network fetches.
    pub master_key: Option<String>,
    /// Upper bound on a single HTTP request.
    pub request_timeout: Duration,
    /// Overrides the platform cache location when set.
    pub cache_file: Option<PathBuf>,
}

impl Config {
    /// Build a config with defaults for everything except the credential.
    pub fn new(master_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            master_key: Some(master_key.into()),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_file: None,
        }
    }

    /// Point the config at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Read the config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let master_key = lookup(ENV_MASTER_KEY).filter(|key| !key.trim().is_empty());

        let endpoint = lookup(ENV_ENDPOINT).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(HoneyError::InvalidConfig {
                var: ENV_ENDPOINT.to_string(),
                reason: format!("not an http(s) URL: {endpoint}"),
            });
        }

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| HoneyError::InvalidConfig {
                    var: ENV_TIMEOUT_SECS.to_string(),
                    reason: e.to_string(),
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint,
            master_key,
            request_timeout: Duration::from_secs(timeout_secs),
            cache_file: lookup(ENV_CACHE_FILE).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[(ENV_MASTER_KEY, "secret")])).unwrap();
        assert_eq!(config.master_key.as_deref(), Some("secret"));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.cache_file.is_none());
    }

    #[test]
    fn test_master_key_optional() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.master_key.is_none());

        let config = Config::from_lookup(lookup_from(&[(ENV_MASTER_KEY, "  ")])).unwrap();
        assert!(config.master_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_MASTER_KEY, "secret"),
            (ENV_ENDPOINT, "http://localhost:9000/shops"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_CACHE_FILE, "/tmp/shops.json"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://localhost:9000/shops");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.cache_file, Some(PathBuf::from("/tmp/shops.json")));
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup_from(&[
            (ENV_MASTER_KEY, "secret"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, HoneyError::InvalidConfig { ref var, .. } if var == ENV_TIMEOUT_SECS));

        let err = Config::from_lookup(lookup_from(&[
            (ENV_MASTER_KEY, "secret"),
            (ENV_ENDPOINT, "ftp://example.com"),
        ]))
        .unwrap_err();
        assert!(matches!(err, HoneyError::InvalidConfig { ref var, .. } if var == ENV_ENDPOINT));
    }
}
