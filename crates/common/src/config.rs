//! Application configuration.
//!
//! Two settings are surfaced to the host: the capture library install path
//! and whether the companion monitor should be launched after a capture stops.
//! Both round-trip through a JSON file so a resolved install path survives
//! restarts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::GpacapResult;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Capture library settings.
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Capture settings exposed as `gpa.BinaryLocation` / `gpa.RunGPAAfterCapture`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Directory containing the capture framework binaries.
    pub library_path: Option<PathBuf>,

    /// Launch the companion monitor once a capture session stops.
    pub run_monitor_after_capture: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "gpacap=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> GpacapResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to `path`, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> GpacapResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Host-side settings consulted and updated by the capture runtime.
pub trait SettingsStore {
    /// Configured capture library directory, if any.
    fn library_path(&self) -> Option<PathBuf>;

    /// Persist a resolved capture library directory.
    fn set_library_path(&mut self, path: &Path) -> GpacapResult<()>;

    /// Whether the companion monitor is launched after a capture stops.
    fn run_monitor_after_capture(&self) -> bool;

    fn set_run_monitor_after_capture(&mut self, enabled: bool) -> GpacapResult<()>;
}

impl SettingsStore for CaptureConfig {
    fn library_path(&self) -> Option<PathBuf> {
        self.library_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
    }

    fn set_library_path(&mut self, path: &Path) -> GpacapResult<()> {
        self.library_path = Some(path.to_path_buf());
        Ok(())
    }

    fn run_monitor_after_capture(&self) -> bool {
        self.run_monitor_after_capture
    }

    fn set_run_monitor_after_capture(&mut self, enabled: bool) -> GpacapResult<()> {
        self.run_monitor_after_capture = enabled;
        Ok(())
    }
}

/// File-backed settings store. Every update is written through immediately.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: AppConfig,
}

impl ConfigStore {
    /// Open the store at the standard config location.
    pub fn open_default() -> Self {
        Self::open(config_file_path())
    }

    /// Open the store at `path`, loading whatever is there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = AppConfig::load_from(&path);
        Self { path, config }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Write the current configuration back to disk.
    pub fn save(&self) -> GpacapResult<()> {
        self.config.save_to(&self.path)
    }
}

impl SettingsStore for ConfigStore {
    fn library_path(&self) -> Option<PathBuf> {
        self.config.capture.library_path()
    }

    fn set_library_path(&mut self, path: &Path) -> GpacapResult<()> {
        self.config.capture.set_library_path(path)?;
        self.save()
    }

    fn run_monitor_after_capture(&self) -> bool {
        self.config.capture.run_monitor_after_capture
    }

    fn set_run_monitor_after_capture(&mut self, enabled: bool) -> GpacapResult<()> {
        self.config.capture.set_run_monitor_after_capture(enabled)?;
        self.save()
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .unwrap_or_else(|_| std::env::temp_dir().to_string_lossy().into_owned());
            PathBuf::from(home).join(".config")
        });
    base.join("gpacap").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.json"));
        assert!(config.capture.library_path.is_none());
        assert!(!config.capture.run_monitor_after_capture);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unparsable_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let config = AppConfig::load_from(&path);
        assert!(config.capture.library_path.is_none());
    }

    #[test]
    fn test_store_writes_library_path_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut store = ConfigStore::open(&path);
        store
            .set_library_path(Path::new("/opt/gpa/bin/Release"))
            .unwrap();

        let reopened = ConfigStore::open(&path);
        assert_eq!(
            reopened.library_path(),
            Some(PathBuf::from("/opt/gpa/bin/Release"))
        );
    }

    #[test]
    fn test_empty_library_path_is_unset() {
        let capture = CaptureConfig {
            library_path: Some(PathBuf::new()),
            run_monitor_after_capture: false,
        };
        assert!(capture.library_path().is_none());
    }
}
