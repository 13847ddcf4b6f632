//! Config schema for the session tooling.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WsSessionConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// In-memory session store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// When false the store behaves like a host with sessions turned off.
    pub enabled: bool,

    /// Values present in the session before the first `start()`.
    pub seed: HashMap<String, serde_json::Value>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: HashMap::new(),
        }
    }
}

/// Log output defaults; CLI flags and `RUST_LOG` take precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}
