use sensors::OutputScale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use topology::DiscoveryConfig;
use tracking::TrackingConfig;

use crate::plant::PlantConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub collectors: OutputScale,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub run: RunConfig,
    pub plant: PlantConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub tick_ms: u64,
    pub ticks: u32,
    /// Argument passed to the dispatcher on the first tick, e.g. "break 60 30".
    pub command: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            tick_ms: 1000,
            ticks: 600,
            command: String::new(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        // Try external file first
        let config = if Path::new("config.toml").exists() {
            let config_content = fs::read_to_string("config.toml")?;
            let config: Config = toml::from_str(&config_content)?;
            log::info!("Loaded configuration from file");
            config
        } else {
            // Fallback to embedded defaults
            let config: Config = toml::from_str(include_str!("../config.toml.example"))?;
            log::warn!("Using embedded default configuration");
            config
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.tracking.validate()?;
        tracking::config::validate_scale(&self.collectors)?;
        if self.run.tick_ms == 0 {
            anyhow::bail!("run.tick_ms must be > 0");
        }
        Ok(())
    }
}

// Helper functions for easy access
impl Config {
    pub fn get_tick(&self) -> Duration {
        Duration::from_millis(self.run.tick_ms)
    }

    pub fn get_ticks(&self) -> u32 {
        self.run.ticks
    }

    pub fn get_command(&self) -> &str {
        &self.run.command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_example_parses_and_validates() {
        let config: Config = toml::from_str(include_str!("../config.toml.example")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.tracking, TrackingConfig::default());
        assert_eq!(config.collectors, OutputScale::default());
        assert_eq!(config.discovery, DiscoveryConfig::default());
        assert_eq!(config.get_tick(), Duration::from_millis(1000));
        assert_eq!(config.plant.rotors.len(), 5);
    }

    #[test]
    fn omitted_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [tracking]
            reverse_cooldown_ms = 2500.0

            [plant]
            home = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.tracking.reverse_cooldown_ms, 2500.0);
        assert_eq!(config.tracking.global_reset_ms, 30000.0);
        assert_eq!(config.run.ticks, 600);
        assert!(config.plant.panels.is_empty());
    }

    #[test]
    fn invalid_tracking_values_are_rejected() {
        let config: Config = toml::from_str(
            r#"
            [tracking]
            velocity = 0.0

            [plant]
            home = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
