use crate::attributes::RuleSet;
use crate::error::{Result, TargetingError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for adtarget, stored in `<data-dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TargetingConfig {
    /// Seed rules for pickers that have no campaign of their own to seed from
    #[serde(default)]
    pub default_rules: RuleSet,

    /// List blocked schedules that are still assigned (display only)
    #[serde(default = "default_show_blocked")]
    pub show_blocked_schedules: bool,
}

fn default_show_blocked() -> bool {
    true
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            default_rules: RuleSet::default(),
            show_blocked_schedules: default_show_blocked(),
        }
    }
}

impl TargetingConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(TargetingError::Io)?;
        let config: TargetingConfig =
            serde_json::from_str(&content).map_err(TargetingError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(TargetingError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(TargetingError::Serialization)?;
        fs::write(config_path, content).map_err(TargetingError::Io)?;
        Ok(())
    }

    /// Parse and set a boolean flag by its CLI key.
    pub fn set_flag(&mut self, key: &str, value: &str) -> Result<()> {
        let parsed = match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => true,
            "false" | "no" | "off" | "0" => false,
            _ => {
                return Err(TargetingError::Api(format!(
                    "Invalid value for {}: {}",
                    key, value
                )))
            }
        };
        match key {
            "show-blocked-schedules" => self.show_blocked_schedules = parsed,
            other => return Err(TargetingError::Api(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }
}
