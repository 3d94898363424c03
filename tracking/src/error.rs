use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be > 0 (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must lie in [0, 1] (got {value})")]
    OutOfUnitRange { field: &'static str, value: f64 },

    #[error("torque must not be negative (got {0})")]
    NegativeTorque(f64),
}
