use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Registered dialect name, e.g. `postgres` or `sqlite3`.
    pub dialect: String,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dialect: "postgres".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when neither `RUST_LOG` nor `env_filter` is set.
    pub level: String,
    /// Emit JSON lines instead of plain text.
    pub json: bool,
    /// Full filter directive, e.g. `gosling_db=debug,info`.
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            env_filter: None,
        }
    }
}
