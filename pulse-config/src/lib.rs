//! Loader for the news job configuration with YAML + environment overlays.
//!
//! Every field has a default, so running without a `pulse.yaml` reproduces the
//! stock behavior: three Google News AI searches spliced into `ai-pulse.html`.
//! Environment variables prefixed with `PULSE_` override file values, using
//! `__` to reach nested keys (`PULSE_HTTP__TIMEOUT_SECS=10`). `feeds` may be
//! given as a comma separated list in the environment.
use config::{Config, ConfigError, Environment, File};
use pulse_common::observability::LogFormat;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use url::Url;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Google News RSS searches polled when no `feeds` are configured.
pub const DEFAULT_FEEDS: [&str; 3] = [
    "https://news.google.com/rss/search?q=artificial+intelligence&hl=en-US&gl=US&ceid=US:en",
    "https://news.google.com/rss/search?q=OpenAI+OR+ChatGPT+OR+Claude+AI&hl=en-US&gl=US&ceid=US:en",
    "https://news.google.com/rss/search?q=machine+learning+business&hl=en-US&gl=US&ceid=US:en",
];

pub const DEFAULT_PAGE: &str = "ai-pulse.html";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub version: Option<String>,
    /// Feed URLs, fetched one after another in this order.
    pub feeds: Vec<String>,
    /// Page whose feed block gets rewritten.
    pub page: PathBuf,
    /// Top-N cut after ranking. `None` keeps the pipeline default.
    pub max_items: Option<usize>,
    /// Length of the lowercased title prefix used as dedup key.
    pub dedup_prefix_chars: Option<usize>,
    pub markers: MarkerConfig,
    pub http: HttpConfig,
    pub log: LogSettings,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            version: None,
            feeds: DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
            page: PathBuf::from(DEFAULT_PAGE),
            max_items: None,
            dedup_prefix_chars: None,
            markers: MarkerConfig::default(),
            http: HttpConfig::default(),
            log: LogSettings::default(),
        }
    }
}

/// Literal splice boundaries; unset values fall back to the page's stock markers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// `None` leaves the transport default in place.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("pulse/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub format: LogFormat,
    /// Overrides the `info` default when `RUST_LOG` is unset.
    pub filter: Option<String>,
    pub dir: Option<PathBuf>,
}

impl PulseConfig {
    /// Reject values the pipeline cannot work with.
    ///
    /// ```
    /// use pulse_config::PulseConfig;
    ///
    /// let mut cfg = PulseConfig::default();
    /// assert!(cfg.validate().is_ok());
    ///
    /// cfg.feeds.push("ftp://example.com/feed".into());
    /// assert!(cfg.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        for feed in &self.feeds {
            let url = Url::parse(feed)
                .map_err(|e| ConfigError::Message(format!("invalid feed URL {feed:?}: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::Message(format!(
                    "feed URL {feed:?} must use http or https"
                )));
            }
        }
        if self.max_items == Some(0) {
            return Err(ConfigError::Message("max_items must be at least 1".into()));
        }
        if self.dedup_prefix_chars == Some(0) {
            return Err(ConfigError::Message(
                "dedup_prefix_chars must be at least 1".into(),
            ));
        }
        let markers = [("start", &self.markers.start), ("end", &self.markers.end)];
        for (name, marker) in markers {
            if marker.as_deref().is_some_and(str::is_empty) {
                return Err(ConfigError::Message(format!(
                    "markers.{name} must not be empty"
                )));
            }
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("http.user_agent must not be empty".into()));
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct PulseConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for PulseConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseConfigLoader {
    /// Start empty; every field has a default and `PULSE_` env overrides are
    /// applied on [`load`](Self::load).
    ///
    /// ```
    /// use pulse_config::{PulseConfigLoader, DEFAULT_FEEDS};
    ///
    /// let config = PulseConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.feeds.len(), DEFAULT_FEEDS.len());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped so
    /// scheduled runs can rely on defaults and environment alone.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use pulse_config::PulseConfigLoader;
    ///
    /// let cfg = PulseConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// feeds:
    ///   - "https://example.com/rss"
    /// page: "site/ai-pulse.html"
    /// max_items: 5
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.feeds, vec!["https://example.com/rss".to_string()]);
    /// assert_eq!(cfg.max_items, Some(5));
    /// assert_eq!(cfg.page.to_str(), Some("site/ai-pulse.html"));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder, expand `${VAR}` placeholders and validate.
    ///
    /// ```
    /// use pulse_config::PulseConfigLoader;
    ///
    /// unsafe { std::env::set_var("PULSE_DOC_UA", "pulse-docs/2"); }
    ///
    /// let config = PulseConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// http:
    ///   user_agent: "${PULSE_DOC_UA}"
    ///   timeout_secs: 20
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.http.user_agent, "pulse-docs/2");
    /// assert_eq!(config.http.timeout_secs, Some(20));
    ///
    /// unsafe { std::env::remove_var("PULSE_DOC_UA"); }
    /// ```
    pub fn load(self) -> Result<PulseConfig, ConfigError> {
        // Added last so the environment overrides every file source.
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("PULSE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("feeds"),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: PulseConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;

        Ok(typed)
    }
}
