use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Metadata key used when the config does not name one.
pub const DEFAULT_NAMESPACE: &str = "glass-player-v1";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub version: u32,
    pub storage: StorageConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Config> {
        toml::from_str(contents).with_context(|| "Failed to parse config TOML")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            storage: StorageConfig::default(),
            playback: PlaybackConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub in_memory: bool,
    pub path: Option<PathBuf>,
    /// key under which the library snapshot is stored
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            in_memory: true,
            path: None,
            namespace: default_namespace(),
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Volume applied to the media element at startup, in [0, 1].
    pub default_volume: f64,
    /// Period of the scrub coalescing tick.
    pub frame_interval_ms: u64,
}

impl PlaybackConfig {
    pub fn volume(&self) -> f64 {
        if self.default_volume.is_finite() {
            self.default_volume.clamp(0.0, 1.0)
        } else {
            PlaybackConfig::default().default_volume
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_volume: 0.8,
            frame_interval_ms: 16,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter string, e.g. `"info"` or `"glassdeck=debug"`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_config_toml() -> anyhow::Result<()> {
        let toml_str = r#"
version = 1

[storage]
in_memory = false
path = "/tmp/glassdeck.db"
namespace = "my-player"

[playback]
default_volume = 0.5
frame_interval_ms = 33

[logging]
level = "debug"
"#;

        let cfg = Config::parse(toml_str)?;

        assert_eq!(cfg.version, 1);
        assert!(!cfg.storage.in_memory);
        assert_eq!(cfg.storage.path, Some(PathBuf::from("/tmp/glassdeck.db")));
        assert_eq!(cfg.storage.namespace, "my-player");
        assert_eq!(cfg.playback.volume(), 0.5);
        assert_eq!(cfg.playback.frame_interval_ms, 33);
        assert_eq!(cfg.logging.level, "debug");

        Ok(())
    }

    #[test]
    fn test_parse_minimal_config_uses_defaults() -> anyhow::Result<()> {
        let toml_str = r#"
version = 1

[storage]
in_memory = true
"#;

        let cfg = Config::parse(toml_str)?;

        assert!(cfg.storage.in_memory);
        assert_eq!(cfg.storage.path, None);
        assert_eq!(cfg.storage.namespace, DEFAULT_NAMESPACE);
        assert_eq!(cfg.playback.volume(), 0.8);
        assert_eq!(cfg.playback.frame_interval_ms, 16);
        assert_eq!(cfg.logging.level, "info");

        Ok(())
    }

    #[test]
    fn test_volume_is_clamped() {
        let cfg = PlaybackConfig {
            default_volume: 3.0,
            ..Default::default()
        };
        assert_eq!(cfg.volume(), 1.0);

        let cfg = PlaybackConfig {
            default_volume: f64::NAN,
            ..Default::default()
        };
        assert_eq!(cfg.volume(), 0.8);
    }

    #[test]
    fn test_load_from_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "version = 2\n[storage]\nin_memory = true\n")?;

        let cfg = Config::load(&path)?;
        assert_eq!(cfg.version, 2);

        assert!(Config::load(dir.path().join("missing.toml")).is_err());

        Ok(())
    }
}
