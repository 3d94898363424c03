use motion::{Actuator, BodyId};
use sensors::Collector;
use serde::{Deserialize, Serialize};

/// Enumerates the actuators and collectors on the structure.
///
/// Queried only while classifying. Handles returned here must stay valid for
/// the lifetime of the controllers built from them.
pub trait Discovery {
    type Actuator: Actuator + Clone;
    type Collector: Collector + Clone;

    /// Body the controller itself is mounted on. Classification candidates
    /// are the actuators sitting on this body.
    fn home_body(&self) -> BodyId;

    fn find_actuators(&self, predicate: &dyn Fn(&Self::Actuator) -> bool) -> Vec<Self::Actuator>;

    fn find_collectors(&self, predicate: &dyn Fn(&Self::Collector) -> bool)
        -> Vec<Self::Collector>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Actuators and collectors whose name contains this marker are ignored.
    pub exclude_marker: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            exclude_marker: "[TXC SolarExclude]".to_string(),
        }
    }
}

impl DiscoveryConfig {
    pub fn excludes(&self, name: &str) -> bool {
        !self.exclude_marker.is_empty() && name.contains(&self.exclude_marker)
    }
}
