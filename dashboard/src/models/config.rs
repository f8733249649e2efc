use crate::error::DashboardError;
use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use getset::Getters;
use request_coordinator::CoordinatorConfig;
use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;
use simplelog::LevelFilter;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_CONFIG_PATH: &str = "cashly.yaml";
const ENV_PREFIX: &str = "CASHLY_";

#[serde_inline_default]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[get = "pub"]
pub struct Config {
    #[serde_inline_default("http://localhost:3000/api".to_string())]
    api_base_url: String,
    #[serde_inline_default("info".to_string())]
    log_level: String,
    /// Wallet shown by the summary widgets
    #[serde_inline_default(1)]
    wallet_id: i64,
    /// Pause between replayed keystrokes of the search command
    #[serde_inline_default(120)]
    keystroke_interval_ms: u64,
    #[serde(default)]
    coordinator: CoordinatorConfig,
}

impl Config {
    /// Load the configuration from defaults, then the YAML file at `path` if
    /// it exists, then `CASHLY_` environment variables
    /// (`CASHLY_COORDINATOR__DEBOUNCE_DELAY_MS=500`).
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, DashboardError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| DashboardError::LogLevel(self.log_level.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new("cashly-config").unwrap();
        let config = Config::load(&dir.path().join("missing.yaml")).unwrap();

        assert_eq!(config.api_base_url(), "http://localhost:3000/api");
        assert_eq!(*config.wallet_id(), 1);
        assert_eq!(config.coordinator(), &CoordinatorConfig::default());
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let dir = TempDir::new("cashly-config").unwrap();
        let path = dir.path().join("cashly.yaml");
        fs::write(
            &path,
            "apiBaseUrl: https://cashly.example/api\n\
             log_level: debug\n\
             wallet_id: 42\n\
             coordinator:\n  debounce_delay_ms: 500\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(*config.wallet_id(), 42);
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
        assert_eq!(config.coordinator().debounce_delay_ms, 500);
        assert!(config.coordinator().enabled);
        // Unknown keys are ignored
        assert_eq!(config.api_base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn test_unknown_log_level() {
        let dir = TempDir::new("cashly-config").unwrap();
        let path = dir.path().join("cashly.yaml");
        fs::write(&path, "log_level: chatty\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(matches!(
            config.level_filter(),
            Err(DashboardError::LogLevel(level)) if level == "chatty"
        ));
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let dir = TempDir::new("cashly-config").unwrap();
        let path = dir.path().join("cashly.yaml");
        fs::write(&path, "wallet_id: several\n").unwrap();

        assert!(matches!(Config::load(&path), Err(DashboardError::Config(_))));
    }
}
