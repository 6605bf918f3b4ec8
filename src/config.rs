//! Resizer configuration persistence
//!
//! Stores user preferences in `~/.config/image-resizer/config.yaml`

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Width applied when nothing has been stored yet
pub const DEFAULT_IMAGE_WIDTH: u32 = 300;

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizerConfig {
    /// Pixel width applied to every recognized image
    #[serde(default = "default_image_width")]
    pub image_width: u32,

    /// Poll and re-scan delays
    #[serde(default)]
    pub sync: SyncTiming,

    /// When a rewritten surface gets written back
    #[serde(default)]
    pub write_policy: WritePolicy,
}

fn default_image_width() -> u32 {
    DEFAULT_IMAGE_WIDTH
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            image_width: default_image_width(),
            sync: SyncTiming::default(),
            write_policy: WritePolicy::default(),
        }
    }
}

/// Delays (in milliseconds) used by the change detector and event bridge.
///
/// Each re-scan delay is sized to the expected upload latency of the signal
/// that triggers it: drag-and-drop uploads take the longest to land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncTiming {
    pub poll_interval_ms: u64,
    pub input_delay_ms: u64,
    pub paste_delay_ms: u64,
    pub file_input_delay_ms: u64,
    pub drop_delay_ms: u64,
}

impl Default for SyncTiming {
    fn default() -> Self {
        Self {
            poll_interval_ms: 800,
            input_delay_ms: 500,
            paste_delay_ms: 500,
            file_input_delay_ms: 1000,
            drop_delay_ms: 1500,
        }
    }
}

impl SyncTiming {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn input_delay(&self) -> Duration {
        Duration::from_millis(self.input_delay_ms)
    }

    pub fn paste_delay(&self) -> Duration {
        Duration::from_millis(self.paste_delay_ms)
    }

    pub fn file_input_delay(&self) -> Duration {
        Duration::from_millis(self.file_input_delay_ms)
    }

    pub fn drop_delay(&self) -> Duration {
        Duration::from_millis(self.drop_delay_ms)
    }
}

/// Which transformer results get written back to the surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Write only when a Markdown reference was converted; width-only
    /// rewrites of existing tags are computed but dropped
    MarkdownOnly,
    /// Write whenever the rewritten text differs from the surface
    #[default]
    AnyChange,
}

impl ResizerConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::debug!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ResizerConfig::default();
        assert_eq!(config.image_width, 300);
        assert_eq!(config.write_policy, WritePolicy::AnyChange);
        assert_eq!(config.sync.poll_interval_ms, 800);
        assert_eq!(config.sync.drop_delay_ms, 1500);
    }

    #[test]
    fn test_delays_ordered_by_upload_latency() {
        let timing = SyncTiming::default();
        assert!(timing.paste_delay() <= timing.file_input_delay());
        assert!(timing.input_delay() <= timing.file_input_delay());
        assert!(timing.file_input_delay() < timing.drop_delay());
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let timing = SyncTiming {
            poll_interval_ms: 0,
            ..SyncTiming::default()
        };
        assert_eq!(timing.poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: ResizerConfig = serde_yaml::from_str("image_width: 640\n").unwrap();
        assert_eq!(config.image_width, 640);
        assert_eq!(config.sync, SyncTiming::default());

        let config: ResizerConfig =
            serde_yaml::from_str("sync:\n  drop_delay_ms: 2000\nwrite_policy: markdown_only\n")
                .unwrap();
        assert_eq!(config.image_width, DEFAULT_IMAGE_WIDTH);
        assert_eq!(config.sync.drop_delay_ms, 2000);
        assert_eq!(config.sync.paste_delay_ms, 500);
        assert_eq!(config.write_policy, WritePolicy::MarkdownOnly);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.yaml");

        let config = ResizerConfig {
            image_width: 512,
            ..ResizerConfig::default()
        };
        config.save_to(&path).expect("save should succeed");

        assert_eq!(ResizerConfig::load_from(&path), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = ResizerConfig::load_from(&dir.path().join("absent.yaml"));
        assert_eq!(config, ResizerConfig::default());
    }

    #[test]
    fn test_garbage_file_gives_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "image_width: [not, a, number]").unwrap();

        assert_eq!(ResizerConfig::load_from(&path), ResizerConfig::default());
    }
}
