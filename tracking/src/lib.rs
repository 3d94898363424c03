// Output-feedback tracking: one hill-climbing state machine per classified
// assembly, fanned out by the registry once per tick.

mod axis;
pub mod branching;
pub mod config;
pub mod controller;
pub mod dual_parallel;
pub mod error;
pub mod gimbal;
pub mod registry;
pub mod single_axis;
pub mod states;

pub use axis::{Cooldown, ResetTimer};
pub use config::TrackingConfig;
pub use controller::{Controller, Drive};
pub use error::ConfigError;
pub use registry::Registry;
pub use states::{SearchStage, SingleAxisState};
