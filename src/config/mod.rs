use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Environment variable that overrides the configured detector key
pub const DETECTOR_KEY_ENV: &str = "SLIDEMASK_DETECTOR_KEY";

/// Connection settings for the suggestion service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorSettings {
    /// POST endpoint; detection is disabled while empty
    pub endpoint: String,
    /// Bearer key sent with each request
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl DetectorSettings {
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }

    /// Key to send, preferring the environment override
    pub fn effective_key(&self) -> Option<String> {
        std::env::var(DETECTOR_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.is_empty()))
    }
}

/// Target raster widths for page renders
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    pub windowed_width: u32,
    pub fullscreen_width: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            windowed_width: 1600,
            fullscreen_width: 2560,
        }
    }
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfigData {
    #[serde(default)]
    pub detector: DetectorSettings,

    #[serde(default)]
    pub render: RenderSettings,

    /// Folder the open dialog starts in
    #[serde(default)]
    pub last_open_dir: Option<PathBuf>,

    /// Folder the save dialog starts in
    #[serde(default)]
    pub last_export_dir: Option<PathBuf>,
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Parse config JSON, returning defaults plus a reset reason on failure
fn parse_config(json: &str) -> (AppConfigData, Option<String>) {
    match serde_json::from_str(json) {
        Ok(data) => (data, None),
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Configuration file was corrupted: {}", e)),
            )
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let config_path = crate::paths::config_file();

    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => {
                let parsed = parse_config(&json);
                if parsed.1.is_none() {
                    info!("Loaded config from {:?}", config_path);
                }
                parsed
            }
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    AppConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (AppConfigData::default(), None)
    };

    config.data = data;
    config.config_path = config_path;
    config.dirty = false;

    if let Some(reason) = reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    if events.read().count() == 0 || !config.dirty {
        return;
    }

    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
    config.dirty = false;
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                save_config_system.run_if(on_message::<SaveConfigRequest>),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert!(!data.detector.is_configured());
        assert_eq!(data.detector.timeout_secs, 30);
        assert_eq!(data.render.windowed_width, 1600);
        assert!(data.last_open_dir.is_none());
        assert!(data.last_export_dir.is_none());
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            detector: DetectorSettings {
                endpoint: "https://detect.example/v1".to_string(),
                api_key: Some("secret".to_string()),
                timeout_secs: 12,
            },
            render: RenderSettings {
                windowed_width: 1200,
                fullscreen_width: 3000,
            },
            last_open_dir: Some(PathBuf::from("/slides")),
            last_export_dir: None,
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let (data, reason) = parse_config(r#"{"detector": {"endpoint": "http://localhost:9000"}}"#);
        assert!(reason.is_none());
        assert!(data.detector.is_configured());
        assert_eq!(data.detector.timeout_secs, 30);
        assert_eq!(data.render, RenderSettings::default());
    }

    #[test]
    fn test_corrupt_config_resets() {
        let (data, reason) = parse_config("{ not json");
        assert_eq!(data, AppConfigData::default());
        assert!(reason.unwrap().contains("corrupted"));
    }

    #[test]
    fn test_blank_endpoint_is_not_configured() {
        let settings = DetectorSettings {
            endpoint: "   ".to_string(),
            ..default()
        };
        assert!(!settings.is_configured());
    }
}
