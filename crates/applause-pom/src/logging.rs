//! Tracing subscriber setup for test runs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::config::FrameworkConfig;
use crate::result::{PomError, PomResult};

/// Filter used when neither `RUST_LOG` nor configuration sets one
pub const DEFAULT_FILTER: &str = "applause_pom=info";

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single line
    #[default]
    Compact,
    /// Multi-line, with source locations
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format [{other}]")),
        }
    }
}

fn filter_for(directive: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(directive.unwrap_or(DEFAULT_FILTER))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    })
}

/// Install a global subscriber
///
/// `RUST_LOG` takes precedence over `directive`. Fails if a global
/// subscriber is already set.
pub fn try_init_tracing(directive: Option<&str>, format: LogFormat) -> PomResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_for(directive))
        .with_writer(std::io::stderr);
    let result = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| PomError::Config {
        message: format!("failed to install tracing subscriber: {e}"),
    })
}

/// Install a global subscriber unless one is already set
pub fn init_tracing(directive: Option<&str>, format: LogFormat) {
    if try_init_tracing(directive, format).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Install a global subscriber from configuration
pub fn init_from_config(config: &FrameworkConfig) {
    init_tracing(Some(&config.log_filter), config.log_format);
}
