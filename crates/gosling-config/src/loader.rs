use std::path::{Path, PathBuf};

use gosling_common::{Error, Result};
use tracing::{debug, info};

use crate::model::AppConfig;

/// Environment variable that overrides the configured dialect name.
pub const DIALECT_ENV: &str = "GOSLING_DIALECT";

/// Reads `AppConfig` from YAML or TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// `<config dir>/gosling/config.yml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gosling").join("config.yml"))
    }

    /// Parse the file at `path`. The format is chosen by extension.
    pub fn load(path: &Path) -> Result<AppConfig> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        let config = Self::parse(path, &contents)?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields defaults.
    pub fn load_or_default(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        Self::load(path)
    }

    pub fn parse(path: &Path, contents: &str) -> Result<AppConfig> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yml" | "yaml" => serde_yaml::from_str(contents)
                .map_err(|e| Error::Config(format!("YAML parse error: {e}"))),
            "toml" => {
                toml::from_str(contents).map_err(|e| Error::Config(format!("TOML parse error: {e}")))
            }
            other => Err(Error::Config(format!(
                "unsupported config extension: {other}"
            ))),
        }
    }

    /// Apply `GOSLING_DIALECT` from the process environment.
    pub fn apply_env_overrides(config: &mut AppConfig) {
        Self::apply_overrides_from(config, |key| std::env::var(key).ok());
    }

    pub fn apply_overrides_from<F>(config: &mut AppConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dialect) = lookup(DIALECT_ENV).filter(|v| !v.trim().is_empty()) {
            debug!("{DIALECT_ENV} overrides dialect with {dialect}");
            config.dialect = dialect.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(name: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_yaml() {
        let (_dir, path) = write_config(
            "config.yml",
            "dialect: sqlite3\nlogging:\n  level: debug\n  json: true\n",
        );
        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.dialect, "sqlite3");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn loads_toml_with_defaults_for_missing_fields() {
        let (_dir, path) = write_config("config.toml", "dialect = \"redshift\"\n");
        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.dialect, "redshift");
        assert_eq!(config.logging, crate::LoggingConfig::default());
    }

    #[test]
    fn empty_yaml_mapping_is_all_defaults() {
        let (_dir, path) = write_config("config.yaml", "{}\n");
        assert_eq!(ConfigLoader::load(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn rejects_unknown_extension() {
        let (_dir, path) = write_config("config.json", "{}");
        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config extension: json"));
    }

    #[test]
    fn reports_parse_errors_as_config_errors() {
        let (_dir, path) = write_config("config.toml", "dialect = [");
        assert!(matches!(ConfigLoader::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load_or_default(&dir.path().join("absent.yml")).unwrap();
        assert_eq!(config.dialect, "postgres");
    }

    #[test]
    fn env_override_replaces_dialect() {
        let mut config = AppConfig::default();
        ConfigLoader::apply_overrides_from(&mut config, |key| {
            (key == DIALECT_ENV).then(|| " tidb ".to_string())
        });
        assert_eq!(config.dialect, "tidb");
    }

    #[test]
    fn blank_env_override_is_ignored() {
        let mut config = AppConfig::default();
        ConfigLoader::apply_overrides_from(&mut config, |_| Some("  ".to_string()));
        assert_eq!(config.dialect, "postgres");
    }
}
