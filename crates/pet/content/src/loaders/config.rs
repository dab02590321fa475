//! Simulation configuration loader.

use std::path::Path;

use pet_core::SimConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for simulation tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<SimConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SimConfig> {
        let config: SimConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms must be positive");
        }
        if config.experience_per_level == 0 {
            anyhow::bail!("experience_per_level must be positive");
        }
        for (key, value) in [
            ("decay_step", config.decay_step),
            ("health_penalty", config.health_penalty),
            ("health_recovery", config.health_recovery),
        ] {
            if value < 0 {
                anyhow::bail!("{} must not be negative, got {}", key, value);
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("tick_interval_ms = 250\nhealth_penalty = 3\n").unwrap();

        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.health_penalty, 3);
        assert_eq!(config.neglect_window_secs, SimConfig::DEFAULT_NEGLECT_WINDOW_SECS);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = ConfigLoader::parse(include_str!("../../data/config.toml")).unwrap();

        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(ConfigLoader::parse("tick_interval_ms = 0").is_err());
    }

    #[test]
    fn zero_experience_per_level_is_rejected() {
        assert!(ConfigLoader::parse("experience_per_level = 0").is_err());
    }

    #[test]
    fn negative_rates_are_rejected() {
        for line in ["decay_step = -1", "health_penalty = -5", "health_recovery = -1"] {
            let error = ConfigLoader::parse(line).unwrap_err();
            assert!(error.to_string().contains("must not be negative"), "{line}");
        }
        assert!(ConfigLoader::parse("decay_step = 0
health_recovery = 0").is_ok());
    }
}
