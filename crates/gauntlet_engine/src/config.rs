//! Configuration system

pub use serde::{Deserialize, Serialize};

/// Configuration trait
///
/// File format is picked by extension; TOML for hand-edited config,
/// RON for tool-written config.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Core engine behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Log level filter (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    /// Fixed simulation step in seconds
    pub fixed_timestep: f32,
    /// Most fixed steps allowed per frame before backlog is discarded
    pub max_steps_per_tick: u32,
    /// Base directory asset paths resolve against
    pub assets_dir: String,
}

impl EngineConfig {
    /// Engine configuration with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_tick: 5,
            assets_dir: "resources".to_string(),
        }
    }

    /// Set the log level filter
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the fixed simulation step
    pub fn with_fixed_timestep(mut self, step: f32) -> Self {
        self.fixed_timestep = step;
        self
    }

    /// Set the assets base directory
    pub fn with_assets_dir(mut self, dir: impl Into<String>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.fixed_timestep <= 0.0 {
            return Err("Fixed timestep must be positive".to_string());
        }
        if self.max_steps_per_tick == 0 {
            return Err("Max steps per tick must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::new()
            .with_log_level("debug")
            .with_fixed_timestep(1.0 / 120.0);

        let text = toml::to_string_pretty(&config).unwrap();
        let restored: EngineConfig = toml::from_str(&text).unwrap();
        assert_eq!(restored.log_level, "debug");
        assert!((restored.fixed_timestep - 1.0 / 120.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let config = EngineConfig::default();
        assert!(matches!(
            config.save_to_file("engine.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_invalid_timestep_rejected() {
        let config = EngineConfig::new().with_fixed_timestep(0.0);
        assert!(config.validate().is_err());
    }
}
