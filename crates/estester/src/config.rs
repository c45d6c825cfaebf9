//! Configuration for the test-case lifecycles.
//!
//! Configuration is explicit: every test case is built from one of the structs
//! below, which can be written in code with struct-update syntax or read from
//! a JSON data file.
//!
//! # Environment Variables
//!
//! [`ServiceConfig::from_env`] reads:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ESTESTER_HOST` | http://0.0.0.0:9200/ | Base URL of the search service |
//! | `ESTESTER_HTTP_PROXY` | (none) | Proxy used for `http` URLs |
//! | `ESTESTER_HTTPS_PROXY` | (none) | Proxy used for `https` URLs |
//! | `ESTESTER_REQUEST_TIMEOUT` | (none) | Per-request timeout, e.g. `30s` |
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use estester::SingleIndexConfig;
//!
//! let config = SingleIndexConfig {
//!     index: "dogs.test".to_string(),
//!     timeout: Some(Duration::from_millis(500)),
//!     ..Default::default()
//! };
//! assert!(config.reset_index);
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::{EsError, EsResult};
use crate::fixture::Fixture;

/// Default base URL of the search service.
pub const DEFAULT_HOST: &str = "http://0.0.0.0:9200/";

/// Default index used by single-index test cases.
pub const DEFAULT_INDEX: &str = "sample.test";

/// Default settle delay after loading fixtures.
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings shared by both test-case flavors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the service (default: `http://0.0.0.0:9200/`).
    #[serde(default = "default_host")]
    pub host: String,

    /// Proxies keyed by scheme: `http`, `https` or `all`.
    #[serde(default)]
    pub proxies: BTreeMap<String, String>,

    /// Optional per-request HTTP timeout.
    #[serde(default, with = "optional_duration")]
    pub request_timeout: Option<Duration>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            proxies: BTreeMap::new(),
            request_timeout: None,
        }
    }
}

impl ServiceConfig {
    /// Creates a configuration pointing at the given host.
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Reads the configuration from `ESTESTER_*` environment variables,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("ESTESTER_HOST") {
            if !host.trim().is_empty() {
                config.host = host.trim().to_string();
            }
        }
        if let Ok(proxy) = std::env::var("ESTESTER_HTTP_PROXY") {
            config.proxies.insert("http".to_string(), proxy);
        }
        if let Ok(proxy) = std::env::var("ESTESTER_HTTPS_PROXY") {
            config.proxies.insert("https".to_string(), proxy);
        }
        if let Ok(timeout) = std::env::var("ESTESTER_REQUEST_TIMEOUT") {
            match humantime::parse_duration(&timeout) {
                Ok(duration) => config.request_timeout = Some(duration),
                Err(e) => {
                    tracing::warn!(
                        value = %timeout,
                        error = %e,
                        "Ignoring ESTESTER_REQUEST_TIMEOUT"
                    );
                }
            }
        }

        config
    }

    /// Returns the host as a URL whose path ends with `/`.
    pub fn base_url(&self) -> EsResult<Url> {
        let mut url = Url::parse(&self.host)
            .map_err(|e| EsError::Config(format!("invalid host '{}': {}", self.host, e)))?;
        if url.cannot_be_a_base() {
            return Err(EsError::Config(format!(
                "host '{}' cannot be used as a base URL",
                self.host
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.base_url() {
            errors.push(e.to_string());
        }

        for (scheme, proxy) in &self.proxies {
            if !matches!(scheme.as_str(), "http" | "https" | "all") {
                errors.push(format!("Unknown proxy scheme '{}'", scheme));
            }
            if Url::parse(proxy).is_err() {
                errors.push(format!("Invalid proxy URL '{}' for {}", proxy, scheme));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration for a test case that owns exactly one index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleIndexConfig {
    /// Connection settings.
    #[serde(flatten)]
    pub service: ServiceConfig,

    /// Name of the index owned by the test case (default: `sample.test`).
    #[serde(default = "default_index")]
    pub index: String,

    /// Delete an existing index of the same name before creating it (default: true).
    #[serde(default = "default_reset_index")]
    pub reset_index: bool,

    /// Documents loaded by `setup`.
    #[serde(default)]
    pub fixtures: Vec<Fixture>,

    /// Mappings used when the index is created.
    #[serde(default = "empty_object")]
    pub mappings: Value,

    /// Settings used when the index is created.
    #[serde(default = "empty_object")]
    pub settings: Value,

    /// Settle delay after loading fixtures; `None` disables the wait.
    #[serde(default = "default_settle_timeout", with = "optional_duration")]
    pub timeout: Option<Duration>,

    /// Delete the index in `teardown` (default: false).
    #[serde(default)]
    pub delete_on_teardown: bool,
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

fn default_reset_index() -> bool {
    true
}

fn default_settle_timeout() -> Option<Duration> {
    Some(DEFAULT_SETTLE_TIMEOUT)
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Default for SingleIndexConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            index: default_index(),
            reset_index: default_reset_index(),
            fixtures: Vec::new(),
            mappings: empty_object(),
            settings: empty_object(),
            timeout: default_settle_timeout(),
            delete_on_teardown: false,
        }
    }
}

/// Declaration of one index in a multi-index test case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Index settings; falls back to the test case's default settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,

    /// Index mappings; falls back to the test case's default mappings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings: Option<Value>,

    /// Documents loaded into this index by `setup`.
    #[serde(default)]
    pub fixtures: Vec<Fixture>,

    /// Aliases attached to this index by `setup`.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl IndexDefinition {
    /// Creates a definition holding only fixtures.
    pub fn with_fixtures(fixtures: Vec<Fixture>) -> Self {
        Self {
            fixtures,
            ..Default::default()
        }
    }

    /// Sets the aliases.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }
}

/// Configuration for a test case spanning several indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiIndexConfig {
    /// Connection settings.
    #[serde(flatten)]
    pub service: ServiceConfig,

    /// Declared indices keyed by name.
    #[serde(default)]
    pub data: BTreeMap<String, IndexDefinition>,

    /// Delete each declared index before creating it (default: true).
    #[serde(default = "default_reset_index")]
    pub reset_index: bool,

    /// Default mappings for indices created without explicit ones.
    #[serde(default = "empty_object")]
    pub mappings: Value,

    /// Default settings for indices created without explicit ones.
    #[serde(default = "empty_object")]
    pub settings: Value,

    /// Settle delay after loading fixtures; `None` disables the wait.
    #[serde(default = "default_settle_timeout", with = "optional_duration")]
    pub timeout: Option<Duration>,

    /// Delete every declared index in `teardown` (default: false).
    #[serde(default)]
    pub delete_on_teardown: bool,
}

impl Default for MultiIndexConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            data: BTreeMap::new(),
            reset_index: default_reset_index(),
            mappings: empty_object(),
            settings: empty_object(),
            timeout: default_settle_timeout(),
            delete_on_teardown: false,
        }
    }
}

/// Reads a data file mapping index names to [`IndexDefinition`]s.
pub fn load_data_file(path: impl AsRef<Path>) -> EsResult<BTreeMap<String, IndexDefinition>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| EsError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| EsError::Config(format!("invalid data file {}: {}", path.display(), e)))
}

/// Serde module for optional durations.
///
/// Accepts `null`/`false`/`0` (disabled), `true` (the default settle delay),
/// a number of seconds, or a humantime string such as `"500ms"`.
mod optional_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Seconds(f64),
        Text(String),
    }

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_str(&humantime::format_duration(*d).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let duration = match Option::<Raw>::deserialize(deserializer)? {
            None | Some(Raw::Flag(false)) => None,
            Some(Raw::Flag(true)) => Some(super::DEFAULT_SETTLE_TIMEOUT),
            Some(Raw::Seconds(secs)) => {
                Some(Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)?)
            }
            Some(Raw::Text(s)) => {
                Some(humantime::parse_duration(&s).map_err(serde::de::Error::custom)?)
            }
        };
        Ok(duration.filter(|d| !d.is_zero()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_index_defaults() {
        let config = SingleIndexConfig::default();
        assert_eq!(config.index, "sample.test");
        assert!(config.reset_index);
        assert_eq!(config.service.host, "http://0.0.0.0:9200/");
        assert!(config.fixtures.is_empty());
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(config.service.proxies.is_empty());
        assert!(!config.delete_on_teardown);
    }

    #[test]
    fn test_deserialize_empty_object_matches_defaults() {
        let config: SingleIndexConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, SingleIndexConfig::default());

        let config: MultiIndexConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, MultiIndexConfig::default());
    }

    #[test]
    fn test_timeout_forms() {
        let parse = |v: Value| {
            serde_json::from_value::<SingleIndexConfig>(json!({ "timeout": v }))
                .unwrap()
                .timeout
        };

        assert_eq!(parse(json!(null)), None);
        assert_eq!(parse(json!(false)), None);
        assert_eq!(parse(json!(0)), None);
        assert_eq!(parse(json!(true)), Some(Duration::from_secs(5)));
        assert_eq!(parse(json!(2)), Some(Duration::from_secs(2)));
        assert_eq!(parse(json!(0.25)), Some(Duration::from_millis(250)));
        assert_eq!(parse(json!("1500ms")), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_negative_timeout_is_rejected() {
        let result = serde_json::from_value::<SingleIndexConfig>(json!({ "timeout": -1 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_flattened_service_fields() {
        let config: SingleIndexConfig = serde_json::from_value(json!({
            "host": "http://es.local:9200",
            "proxies": {"http": "http://proxy.local:3128"},
            "index": "dogs",
            "reset_index": false
        }))
        .unwrap();

        assert_eq!(config.service.host, "http://es.local:9200");
        assert_eq!(
            config.service.proxies.get("http").map(String::as_str),
            Some("http://proxy.local:3128")
        );
        assert_eq!(config.index, "dogs");
        assert!(!config.reset_index);
    }

    #[test]
    fn test_base_url_adds_trailing_slash() {
        let config = ServiceConfig::with_host("http://localhost:9200");
        assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:9200/");

        let config = ServiceConfig::with_host("http://localhost:9200/es");
        assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:9200/es/");

        let config = ServiceConfig::default();
        assert_eq!(config.base_url().unwrap().as_str(), "http://0.0.0.0:9200/");
    }

    #[test]
    fn test_invalid_host() {
        let config = ServiceConfig::with_host("not a url");
        assert!(matches!(config.base_url(), Err(EsError::Config(_))));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_proxies() {
        let mut config = ServiceConfig::default();
        config
            .proxies
            .insert("http".to_string(), "http://proxy:3128".to_string());
        assert!(config.validate().is_ok());

        config
            .proxies
            .insert("gopher".to_string(), "nope".to_string());
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("gopher")));
    }

    #[test]
    fn test_index_definition_deserialization() {
        let data: BTreeMap<String, IndexDefinition> = serde_json::from_value(json!({
            "thepolice": {
                "aliases": ["band", "single-man-band"],
                "fixtures": [
                    {"type": "member", "id": "sting", "body": {"name": "Gordon"}}
                ]
            },
            "metallica": {}
        }))
        .unwrap();

        let police = &data["thepolice"];
        assert_eq!(police.aliases, vec!["band", "single-man-band"]);
        assert_eq!(police.fixtures.len(), 1);
        assert!(police.settings.is_none());
        assert_eq!(data["metallica"], IndexDefinition::default());
    }

    #[test]
    fn test_load_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let data = json!({
            "personal": {
                "fixtures": [{"type": "contact", "id": "1", "body": {"name": "Dmitriy"}}]
            }
        });
        std::fs::write(&path, data.to_string()).unwrap();

        let data = load_data_file(&path).unwrap();
        assert_eq!(data["personal"].fixtures[0].id, "1");

        let missing = load_data_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(EsError::Config(_))));
    }
}
