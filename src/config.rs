//! Configuration layer
//!
//! Tunables loaded from a TOML file, replacing hardcoded monitor and
//! assistant parameters with operator-adjustable values.
//!
//! ## Loading order
//!
//! 1. `ARCWATCH_CONFIG` environment variable (path to TOML file)
//! 2. `arcwatch.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded value is constructor-passed to the components that need it;
//! there is no process-global config.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArcWatchConfig {
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Signal synthesis tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Samples per synthesized window (one 50 Hz period)
    pub window_length: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            window_length: 2000,
        }
    }
}

/// Conversation grounding tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Most-recent turns entering the grounded prompt
    pub retention_window: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            retention_window: crate::conversation::DEFAULT_RETENTION_WINDOW,
        }
    }
}

/// Model gateway tunables. The API key itself comes from the
/// `ARCWATCH_API_KEY` environment variable, never from the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: usize,
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-haiku-20241022".to_string(),
            max_tokens: 1024,
            timeout_secs: 30,
        }
    }
}

/// Monitor scheduling tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between scheduler-driven monitor ticks
    pub tick_interval_secs: u64,
    /// Seconds after a scenario change during which prediction mode stays on
    pub prediction_window_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 2,
            prediction_window_secs: 20,
        }
    }
}

impl ArcWatchConfig {
    /// Load using the documented resolution order.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("ARCWATCH_CONFIG") {
            tracing::info!(path = %path, "Loading config from ARCWATCH_CONFIG");
            return Self::load_from_file(&path);
        }

        let local = Path::new("arcwatch.toml");
        if local.exists() {
            tracing::info!("Loading config from ./arcwatch.toml");
            return Self::load_from_file("arcwatch.toml");
        }

        tracing::info!("No config file found, using built-in defaults");
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a specific TOML file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signal.window_length == 0 {
            return Err(ConfigError::Invalid(
                "signal.window_length must be positive".to_string(),
            ));
        }
        if self.conversation.retention_window == 0 {
            return Err(ConfigError::Invalid(
                "conversation.retention_window must be positive".to_string(),
            ));
        }
        if self.gateway.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "gateway.timeout_secs must be positive".to_string(),
            ));
        }
        if self.gateway.max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "gateway.max_tokens must be positive".to_string(),
            ));
        }
        if self.monitor.tick_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "monitor.tick_interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
