use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::calibration::CalibrationWindow;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "lowercase")]
pub struct Settings {
    #[serde(alias = "MONITOR")]
    pub monitor: MonitorSettings,
    #[serde(alias = "CALIBRATION")]
    pub calibration: CalibrationSettings,
    #[serde(alias = "STORE")]
    pub store: StoreSettings,
    #[serde(alias = "FEED")]
    pub feed: FeedSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub struct MonitorSettings {
    #[serde(alias = "DEBUG")]
    pub debug: bool,
    #[serde(alias = "CHANNEL_CAPACITY")]
    pub channel_capacity: usize,
}

/// Raw-unit range mapped onto the 0-5 V reference scale. Deployment
/// configuration, not user-mutable at runtime.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub struct CalibrationSettings {
    #[serde(alias = "MIN")]
    pub min: f64,
    #[serde(alias = "MAX")]
    pub max: f64,
}

impl CalibrationSettings {
    pub fn window(&self) -> CalibrationWindow {
        CalibrationWindow { min: self.min, max: self.max }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub struct StoreSettings {
    #[serde(alias = "DATABASE_URL")]
    pub database_url: String,
}

/// Mock feed pacing, used with `--mock`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub struct FeedSettings {
    #[serde(alias = "INTERVAL_MS")]
    pub interval_ms: u64,
    #[serde(alias = "MAX_LEVEL")]
    pub max_level: u32,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            debug: false,
            channel_capacity: 100,
        }
    }
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self { min: 2900.0, max: 3100.0 }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: "n/a".to_string(),
        }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_level: 50,
        }
    }
}

impl Settings {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // 1. Load defaults
        let default_settings = Settings::default();
        builder = builder.add_source(config::Config::try_from(&default_settings)?);

        // 2. Load from file if specified
        if let Some(path) = config_path {
            if path.exists() {
                builder = builder.add_source(File::from(path));
            } else {
                warn!("Configuration file not found: {:?}", path);
            }
        } else {
            // Standard search path
            if let Some(home) = dirs::home_dir() {
                let toml_path = home.join(".noisewatch").join("settings.toml");
                let yaml_path = home.join(".noisewatch").join("settings.yaml");

                if toml_path.exists() {
                    builder = builder.add_source(File::from(toml_path));
                } else if yaml_path.exists() {
                    builder = builder.add_source(File::from(yaml_path));
                }
            }
        }

        // 3. Environment variables
        builder = builder.add_source(
            Environment::with_prefix("NOISEWATCH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        // Detect unknown sections
        if let Ok(table) = config.clone().try_deserialize::<serde_json::Value>() {
            if let Some(map) = table.as_object() {
                let known_sections = ["monitor", "calibration", "store", "feed"];
                for key in map.keys() {
                    let lower_key = key.to_lowercase();
                    if !known_sections.contains(&lower_key.as_str()) {
                        warn!("Unknown configuration section: {}", key);
                    }
                }
            }
        }

        config.try_deserialize()
    }

    pub fn dump(&self, format: &str) -> Result<String, Box<dyn std::error::Error>> {
        match format.to_lowercase().as_str() {
            "toml" => Ok(toml::to_string_pretty(self)?),
            "yaml" | "yml" => Ok(serde_yaml::to_string(self)?),
            _ => Err("Unsupported format".into()),
        }
    }
}
