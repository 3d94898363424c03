use sensors::OutputScale;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Tuning constants shared by every controller.
///
/// Defaults are the build-time constants; a config file may override them at
/// startup but nothing reloads them afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Minimum time between two reversals of one axis.
    pub reverse_cooldown_ms: f64,
    /// How long a base axis may run after reversing before everything resets.
    pub global_reset_ms: f64,
    /// Relative output considered good enough to stop searching.
    pub min_relative_output: f32,
    /// Below this output a limited actuator sweeps to its farther stop.
    pub limit_change_output: f32,
    /// Angular velocity magnitude, rad/s.
    pub velocity: f32,
    /// Torque and brake torque for driven joints.
    pub torque: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        TrackingConfig {
            reverse_cooldown_ms: 5000.0,
            global_reset_ms: 30000.0,
            min_relative_output: 0.99,
            limit_change_output: 0.0,
            velocity: 0.01,
            torque: 33_600_000.0,
        }
    }
}

impl TrackingConfig {
    /// Cooldown after a child or elevation axis has already settled once.
    pub fn short_cooldown_ms(&self) -> f64 {
        0.2 * self.reverse_cooldown_ms
    }

    /// Output strictly above the threshold: nothing left to gain on this axis.
    pub fn is_saturated(&self, relative_output: f32) -> bool {
        relative_output > self.min_relative_output
    }

    /// Branching children count as settled from the threshold itself upwards.
    pub fn reaches_threshold(&self, relative_output: f32) -> bool {
        relative_output >= self.min_relative_output
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("reverse_cooldown_ms", self.reverse_cooldown_ms)?;
        positive("global_reset_ms", self.global_reset_ms)?;
        positive("velocity", self.velocity as f64)?;
        unit("min_relative_output", self.min_relative_output)?;
        unit("limit_change_output", self.limit_change_output)?;
        if self.torque < 0.0 {
            return Err(ConfigError::NegativeTorque(self.torque as f64));
        }
        Ok(())
    }
}

pub fn validate_scale(scale: &OutputScale) -> Result<(), ConfigError> {
    positive("large_unit_max", scale.large_unit_max as f64)?;
    positive("small_unit_max", scale.small_unit_max as f64)
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange {
            field,
            value: value as f64,
        })
    }
}
