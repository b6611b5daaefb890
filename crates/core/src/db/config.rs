use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::db::cache::DEFAULT_CACHE_CAPACITY;

/// Logging options for frontends embedding the facade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Serializable configuration for a facade session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnidisConfig {
    /// Entries kept per memoized lookup (offsets, signatures, segments).
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for UnidisConfig {
    fn default() -> Self {
        Self { cache_capacity: DEFAULT_CACHE_CAPACITY, logging: LoggingConfig::default() }
    }
}

/// Load a config file; `.yaml`/`.yml` are parsed as YAML, anything else as JSON.
pub fn load_config(path: impl AsRef<Path>) -> Result<UnidisConfig> {
    let path = path.as_ref();
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let config: UnidisConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&body).context("Failed to parse config YAML")?
        }
        _ => serde_json::from_str(&body).context("Failed to parse config JSON")?,
    };
    Ok(config)
}
