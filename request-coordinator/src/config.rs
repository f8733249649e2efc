use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay applied to debounced calls when the caller does not pick one.
pub const DEFAULT_DEBOUNCE_DELAY_MS: u64 = 300;

/// Configuration for the request coordinator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Whether deduplication and debouncing are enabled.
    /// When disabled every operation runs directly.
    pub enabled: bool,
    /// Default debounce window in milliseconds
    pub debounce_delay_ms: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_delay_ms: DEFAULT_DEBOUNCE_DELAY_MS,
        }
    }
}

impl CoordinatorConfig {
    pub fn new(debounce_delay: Duration) -> Self {
        Self {
            enabled: true,
            debounce_delay_ms: u64::try_from(debounce_delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// A configuration that turns the coordinator into a pass-through
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delay_is_300ms() {
        let config = CoordinatorConfig::default();
        assert!(config.enabled);
        assert_eq!(config.debounce_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: CoordinatorConfig = serde_json::from_str(r#"{ "enabled": false }"#).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.debounce_delay_ms, DEFAULT_DEBOUNCE_DELAY_MS);
    }

    #[test]
    fn test_huge_delay_saturates() {
        let config = CoordinatorConfig::new(Duration::MAX);
        assert_eq!(config.debounce_delay_ms, u64::MAX);
        assert_eq!(
            CoordinatorConfig::new(Duration::from_millis(750)).debounce_delay_ms,
            750
        );
    }
}
