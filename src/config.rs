use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    styles::VhsParams,
};

/// Main configuration for Retro-Tape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tape pipeline parameters
    pub vhs: VhsParams,

    /// Batch processing settings
    pub processing: ProcessingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.vhs.validate()?;
        self.processing.validate()?;
        Ok(())
    }
}

/// Batch processing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of worker threads
    pub threads: usize,

    /// Base seed for the noise stages; `None` draws from OS entropy
    pub seed: Option<u64>,

    /// Log progress every this many frames (0 disables)
    pub progress_interval: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
            seed: None,
            progress_interval: 100,
        }
    }
}

impl ProcessingConfig {
    fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "processing.threads".to_string(),
                value: self.threads.to_string()
            }.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::TapeSpeed;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.vhs.tape_speed = TapeSpeed::Lp;
        original_config.processing.seed = Some(1234);

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[vhs]\ntape_speed = \"ep\"\nvideo_noise = 0.0\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.vhs.tape_speed, TapeSpeed::Ep);
        assert_eq!(config.vhs.video_noise, 0.0);
        assert_eq!(config.vhs.color_bleeding, 5.0);
        assert_eq!(config.processing.progress_interval, 100);
    }

    #[test]
    fn test_unknown_tape_speed_fails_to_load() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.toml");
        std::fs::write(&file_path, "[vhs]\ntape_speed = \"SLP\"\n").unwrap();
        assert!(Config::from_file(&file_path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.user_message().contains("not found"));
    }

    #[test]
    fn test_invalid_thread_count() {
        let mut config = Config::default();
        config.processing.threads = 0;
        assert!(config.validate().is_err());
    }
}
