use crate::bookmark::StoreKind;
use crate::error::{LaunchError, Result};
use crate::settings::{MemorySettings, SettingValue};
use crate::table::ReorderDiscipline;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

pub const COLUMNS_KEY: &str = "columns";
pub const ITEM_LIMIT_KEY: &str = "item-limit";
pub const STATUS_REFRESH_KEY: &str = "status-refresh-secs";
pub const DISCIPLINE_KEY: &str = "discipline";

/// Launcher configuration, stored in `<config-dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LaunchConfig {
    /// Grid width in tiles
    #[serde(default = "default_columns")]
    pub columns: usize,

    /// Maximum visible tiles; negative means unlimited
    #[serde(default = "default_item_limit")]
    pub item_limit: i64,

    /// Seconds between background status refreshes
    #[serde(default = "default_status_refresh")]
    pub status_refresh_secs: u64,

    /// Stores users may not edit
    #[serde(default)]
    pub read_only_stores: Vec<StoreKind>,

    #[serde(default)]
    pub discipline: ReorderDiscipline,
}

fn default_columns() -> usize {
    2
}

fn default_item_limit() -> i64 {
    -1
}

fn default_status_refresh() -> u64 {
    30
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            item_limit: default_item_limit(),
            status_refresh_secs: default_status_refresh(),
            read_only_stores: Vec::new(),
            discipline: ReorderDiscipline::default(),
        }
    }
}

impl LaunchConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(LaunchError::Io)?;
        let config: LaunchConfig =
            serde_json::from_str(&content).map_err(LaunchError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(LaunchError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(LaunchError::Serialization)?;
        fs::write(config_path, content).map_err(LaunchError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            COLUMNS_KEY => Some(self.columns.to_string()),
            ITEM_LIMIT_KEY => Some(self.item_limit.to_string()),
            STATUS_REFRESH_KEY => Some(self.status_refresh_secs.to_string()),
            DISCIPLINE_KEY => Some(self.discipline.to_string()),
            "read-only-stores" => Some(
                self.read_only_stores
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            COLUMNS_KEY => {
                let columns: usize = value
                    .parse()
                    .map_err(|_| format!("Invalid column count: {}", value))?;
                if columns == 0 {
                    return Err("Column count must be at least 1".to_string());
                }
                self.columns = columns;
            }
            ITEM_LIMIT_KEY => {
                self.item_limit = value
                    .parse()
                    .map_err(|_| format!("Invalid item limit: {}", value))?;
            }
            STATUS_REFRESH_KEY => {
                self.status_refresh_secs = value
                    .parse()
                    .map_err(|_| format!("Invalid refresh interval: {}", value))?;
            }
            DISCIPLINE_KEY => {
                self.discipline = value.parse().map_err(|e: LaunchError| e.to_string())?;
            }
            "read-only-stores" => {
                self.read_only_stores = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| s.parse::<StoreKind>().map_err(|e| e.to_string()))
                    .collect::<std::result::Result<_, _>>()?;
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    /// Settings seeded from this config: one policy flag per store kind plus
    /// the grid tunables.
    pub fn to_settings(&self) -> MemorySettings {
        let mut settings = MemorySettings::new()
            .with(COLUMNS_KEY, SettingValue::Int(self.columns as i64))
            .with(ITEM_LIMIT_KEY, SettingValue::Int(self.item_limit))
            .with(
                STATUS_REFRESH_KEY,
                SettingValue::Int(self.status_refresh_secs as i64),
            )
            .with(DISCIPLINE_KEY, SettingValue::Str(self.discipline.to_string()));
        for kind in StoreKind::ALL {
            let modifiable = !self.read_only_stores.contains(&kind);
            settings = settings.with(&kind.policy_key(), SettingValue::Bool(modifiable));
        }
        settings
    }
}
