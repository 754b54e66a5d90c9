//! Credential and endpoint resolution
//!
//! Resolution order per field: environment variable, then the per-user
//! settings file. The file only fills gaps. Nothing is cached; every
//! [`ConfigSource::resolve`] call re-reads the environment and the file.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable holding the service base URL
pub const BASE_URL_ENV: &str = "API_BASE_URL";

/// Environment variable holding the bearer token
pub const BEARER_TOKEN_ENV: &str = "API_BEARER_TOKEN";

/// Placeholder shown instead of the bearer token
const MASK: &str = "***";

/// Resolved service configuration
///
/// Either field may be unset; operations check before making a request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub base_url: Option<String>,
    pub bearer_token: Option<String>,
}

impl Config {
    /// Create a fully populated config
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            bearer_token: Some(bearer_token.into()),
        }
    }

    /// Both base URL and token, if present
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.base_url.as_deref(), self.bearer_token.as_deref()) {
            (Some(base), Some(token)) => Some((base, token)),
            _ => None,
        }
    }

    /// Introspection view with the token masked
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            base_url: self.base_url.clone(),
            bearer_token: self.bearer_token.as_ref().map(|_| MASK.to_string()),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| MASK))
            .finish()
    }
}

/// Serializable config view, safe to hand to a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub base_url: Option<String>,
    pub bearer_token: Option<String>,
}

/// Something that can produce a [`Config`] on demand
pub trait ConfigSource: Send + Sync {
    /// Resolve the current configuration. Never fails.
    fn resolve(&self) -> Config;
}

impl ConfigSource for Config {
    fn resolve(&self) -> Config {
        self.clone()
    }
}

/// Default source: process environment, then `~/.api/config.json`
#[derive(Debug, Clone, Default)]
pub struct EnvConfigSource {
    path: Option<PathBuf>,
}

impl EnvConfigSource {
    /// Source using the default per-user settings file
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Source using a specific settings file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Settings file this source reads, if one can be located
    pub fn config_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(default_config_path)
    }
}

impl ConfigSource for EnvConfigSource {
    fn resolve(&self) -> Config {
        let path = self.config_path();
        resolve_with(|key| env::var(key).ok(), path.as_deref())
    }
}

/// Default settings file: `<home>/.api/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".api").join("config.json"))
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Settings file key holding the base URL
const FILE_BASE_URL_KEY: &str = "baseURL";

/// Settings file key holding the bearer token
const FILE_BEARER_TOKEN_KEY: &str = "bearerToken";

/// Resolve a config from a variable lookup and an optional settings file
///
/// Empty values count as unset. The file is only read when a field is
/// still missing after the lookup.
pub fn resolve_with<F>(lookup: F, path: Option<&Path>) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config {
        base_url: non_empty(lookup(BASE_URL_ENV)),
        bearer_token: non_empty(lookup(BEARER_TOKEN_ENV)),
    };

    if config.base_url.is_some() && config.bearer_token.is_some() {
        return config;
    }

    if let Some(file) = path.and_then(read_config_file) {
        if config.base_url.is_none() {
            config.base_url = file_string(&file, FILE_BASE_URL_KEY, path);
        }
        if config.bearer_token.is_none() {
            config.bearer_token = file_string(&file, FILE_BEARER_TOKEN_KEY, path);
        }
    }

    config
}

/// Settings file as a JSON object; each key is read on its own
fn read_config_file(path: &Path) -> Option<Map<String, Value>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Config file not readable");
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(Value::Object(file)) => Some(file),
        Ok(_) => {
            warn!(path = %path.display(), "Ignoring config file: not a JSON object");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring malformed config file");
            None
        }
    }
}

/// Non-empty string value of one settings key; other types leave it unset
fn file_string(file: &Map<String, Value>, key: &str, path: Option<&Path>) -> Option<String> {
    let value = file.get(key)?;
    match value.as_str() {
        Some(s) => non_empty(Some(s.to_string())),
        None => {
            if !value.is_null() {
                warn!(
                    path = ?path,
                    key,
                    "Ignoring config file value: expected a string"
                );
            }
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_env_only() {
        let config = resolve_with(
            vars(&[
                (BASE_URL_ENV, "https://env.test"),
                (BEARER_TOKEN_ENV, "env-token"),
            ]),
            None,
        );
        assert_eq!(config, Config::new("https://env.test", "env-token"));
    }

    #[test]
    fn test_file_fills_gaps_only() {
        let file = config_file(r#"{"baseURL":"https://file.test","bearerToken":"file-token"}"#);
        let config = resolve_with(vars(&[(BEARER_TOKEN_ENV, "env-token")]), Some(file.path()));

        assert_eq!(config.base_url.as_deref(), Some("https://file.test"));
        assert_eq!(config.bearer_token.as_deref(), Some("env-token"));
    }

    #[test]
    fn test_file_only() {
        let file = config_file(r#"{"baseURL":"https://file.test","bearerToken":"file-token"}"#);
        let config = resolve_with(vars(&[]), Some(file.path()));
        assert_eq!(config, Config::new("https://file.test", "file-token"));
    }

    #[test]
    fn test_empty_env_treated_as_unset() {
        let file = config_file(r#"{"baseURL":"https://file.test"}"#);
        let config = resolve_with(vars(&[(BASE_URL_ENV, "")]), Some(file.path()));
        assert_eq!(config.base_url.as_deref(), Some("https://file.test"));
        assert!(config.bearer_token.is_none());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve_with(vars(&[]), Some(&dir.path().join("config.json")));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_file() {
        let file = config_file("{ not json");
        let config = resolve_with(vars(&[(BASE_URL_ENV, "https://env.test")]), Some(file.path()));
        assert_eq!(config.base_url.as_deref(), Some("https://env.test"));
        assert!(config.bearer_token.is_none());
    }

    #[test]
    fn test_file_wrong_type_leaves_only_that_field_unset() {
        let file = config_file(r#"{"baseURL":"https://file.test","bearerToken":12345}"#);
        let config = resolve_with(vars(&[]), Some(file.path()));
        assert_eq!(config.base_url.as_deref(), Some("https://file.test"));
        assert!(config.bearer_token.is_none());

        let file = config_file(r#"{"baseURL":["x"],"bearerToken":"file-token"}"#);
        let config = resolve_with(vars(&[]), Some(file.path()));
        assert!(config.base_url.is_none());
        assert_eq!(config.bearer_token.as_deref(), Some("file-token"));
    }

    #[test]
    fn test_file_not_an_object() {
        let file = config_file(r#"["https://file.test"]"#);
        let config = resolve_with(vars(&[]), Some(file.path()));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_source_with_path() {
        let source = EnvConfigSource::with_path("/tmp/pdfkit/config.json");
        assert_eq!(
            source.config_path(),
            Some(PathBuf::from("/tmp/pdfkit/config.json"))
        );
    }

    #[test]
    fn test_snapshot_masks_token() {
        let snapshot = Config::new("https://api.test", "secret").snapshot();
        assert_eq!(snapshot.base_url.as_deref(), Some("https://api.test"));
        assert_eq!(snapshot.bearer_token.as_deref(), Some("***"));

        let snapshot = Config::default().snapshot();
        assert!(snapshot.base_url.is_none());
        assert!(snapshot.bearer_token.is_none());
    }

    #[test]
    fn test_debug_masks_token() {
        let debug = format!("{:?}", Config::new("https://api.test", "secret"));
        assert!(!debug.contains("secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_credentials() {
        assert_eq!(
            Config::new("https://api.test", "tok").credentials(),
            Some(("https://api.test", "tok"))
        );
        let partial = Config {
            base_url: Some("https://api.test".to_string()),
            bearer_token: None,
        };
        assert!(partial.credentials().is_none());
    }
}
