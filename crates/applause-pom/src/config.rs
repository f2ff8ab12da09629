//! Framework configuration.
//!
//! Values are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. a YAML file
//! 3. programmatic overrides
//! 4. `APPLAUSE_POM_*` environment variables

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::PageObjectOptions;
use crate::logging::LogFormat;
use crate::platform::Platform;
use crate::result::{PomError, PomResult};
use crate::wait::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};

/// Prefix shared by every configuration environment variable
pub const ENV_PREFIX: &str = "APPLAUSE_POM_";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkConfig {
    /// Default element timeout in milliseconds
    pub timeout_ms: u64,
    /// Default polling interval in milliseconds
    pub polling_interval_ms: u64,
    /// Platform name, friendly (`WebDesktopChrome`) or underscored
    pub platform: String,
    /// Fail list resolution when nothing matches
    pub throw_exception_on_empty_list: bool,
    /// Re-resolve lists before every access
    pub auto_refresh_list: bool,
    /// `tracing` filter directive
    pub log_filter: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            polling_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            platform: Platform::Default.friendly_name().to_string(),
            throw_exception_on_empty_list: true,
            auto_refresh_list: false,
            log_filter: crate::logging::DEFAULT_FILTER.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl FrameworkConfig {
    /// Start a layered load
    #[must_use]
    pub fn loader() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Resolved platform
    #[must_use]
    pub fn platform(&self) -> Platform {
        Platform::from_name(&self.platform)
    }

    /// Page-object defaults derived from this configuration
    #[must_use]
    pub fn page_object_options(&self) -> PageObjectOptions {
        PageObjectOptions {
            timeout: Duration::from_millis(self.timeout_ms),
            polling_interval: Duration::from_millis(self.polling_interval_ms),
            throw_exception_on_empty_list: self.throw_exception_on_empty_list,
            auto_refresh_list: self.auto_refresh_list,
        }
    }

    fn apply(&mut self, layer: PartialConfig) {
        if let Some(v) = layer.timeout_ms {
            self.timeout_ms = v;
        }
        if let Some(v) = layer.polling_interval_ms {
            self.polling_interval_ms = v;
        }
        if let Some(v) = layer.platform {
            self.platform = v;
        }
        if let Some(v) = layer.throw_exception_on_empty_list {
            self.throw_exception_on_empty_list = v;
        }
        if let Some(v) = layer.auto_refresh_list {
            self.auto_refresh_list = v;
        }
        if let Some(v) = layer.log_filter {
            self.log_filter = v;
        }
        if let Some(v) = layer.log_format {
            self.log_format = v;
        }
    }
}

/// One configuration layer; unset fields leave lower layers in place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    /// Default element timeout in milliseconds
    pub timeout_ms: Option<u64>,
    /// Default polling interval in milliseconds
    pub polling_interval_ms: Option<u64>,
    /// Platform name
    pub platform: Option<String>,
    /// Fail list resolution when nothing matches
    pub throw_exception_on_empty_list: Option<bool>,
    /// Re-resolve lists before every access
    pub auto_refresh_list: Option<bool>,
    /// `tracing` filter directive
    pub log_filter: Option<String>,
    /// Log output format
    pub log_format: Option<LogFormat>,
}

impl PartialConfig {
    /// Parse a YAML layer
    pub fn from_yaml(yaml: &str) -> PomResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Read a layer from `APPLAUSE_POM_*` variables
    pub fn from_env(vars: &HashMap<String, String>) -> PomResult<Self> {
        let get = |key: &str| vars.get(&format!("{ENV_PREFIX}{key}")).map(|v| v.trim());
        Ok(Self {
            timeout_ms: get("TIMEOUT_MS").map(|v| parse_u64("TIMEOUT_MS", v)).transpose()?,
            polling_interval_ms: get("POLLING_INTERVAL_MS")
                .map(|v| parse_u64("POLLING_INTERVAL_MS", v))
                .transpose()?,
            platform: get("PLATFORM").map(str::to_string),
            throw_exception_on_empty_list: get("THROW_ON_EMPTY_LIST")
                .map(|v| parse_bool("THROW_ON_EMPTY_LIST", v))
                .transpose()?,
            auto_refresh_list: get("AUTO_REFRESH_LIST")
                .map(|v| parse_bool("AUTO_REFRESH_LIST", v))
                .transpose()?,
            log_filter: get("LOG").map(str::to_string),
            log_format: get("LOG_FORMAT")
                .map(|v| {
                    v.parse::<LogFormat>().map_err(|message| PomError::Config {
                        message: format!("{ENV_PREFIX}LOG_FORMAT: {message}"),
                    })
                })
                .transpose()?,
        })
    }
}

fn parse_u64(key: &str, value: &str) -> PomResult<u64> {
    value.parse().map_err(|_| PomError::Config {
        message: format!("{ENV_PREFIX}{key} must be a whole number of milliseconds, got [{value}]"),
    })
}

fn parse_bool(key: &str, value: &str) -> PomResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(PomError::Config {
            message: format!("{ENV_PREFIX}{key} must be a boolean, got [{value}]"),
        }),
    }
}

/// Builds a [`FrameworkConfig`] from its layers
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    overrides: PartialConfig,
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Loader with no file and no overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a YAML file as the second layer
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Programmatic overrides
    #[must_use]
    pub fn with_overrides(mut self, overrides: PartialConfig) -> Self {
        self.overrides = overrides;
        self
    }

    /// Use these variables instead of the process environment
    #[must_use]
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Resolve every layer
    pub fn load(self) -> PomResult<FrameworkConfig> {
        let mut config = FrameworkConfig::default();
        if let Some(path) = &self.file {
            let yaml = std::fs::read_to_string(path)?;
            config.apply(PartialConfig::from_yaml(&yaml)?);
            tracing::debug!(path = %path.display(), "loaded configuration file");
        }
        config.apply(self.overrides);
        let env = self.env.unwrap_or_else(|| {
            std::env::vars()
                .filter(|(k, _)| k.starts_with(ENV_PREFIX))
                .collect()
        });
        config.apply(PartialConfig::from_env(&env)?);
        if config.platform.parse::<Platform>().is_err() {
            tracing::warn!(platform = %config.platform, "unknown platform in configuration");
        }
        Ok(config)
    }
}
