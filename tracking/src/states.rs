// State enums reported by the controllers.

/// - Tracking: the actuator is moving, hill-climbing on output
/// - Stopped: output is saturated, absent or the joint is locked
/// - LimitRealign: a limited actuator sweeping to its farther stop
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum SingleAxisState {
    Tracking,
    Stopped,
    LimitRealign,
}

impl SingleAxisState {
    /// Check if the actuator is being driven by the controller
    pub fn is_active(&self) -> bool {
        matches!(self, SingleAxisState::Tracking | SingleAxisState::LimitRealign)
    }
}

/// Which axis of a two-stage controller (branching, gimbal) is searching.
/// - Idle: nothing is moving
/// - Panel: the child / elevation axes are moving
/// - Base: the base axis is moving, children wait
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum SearchStage {
    Idle,
    Panel,
    Base,
}

impl SearchStage {
    pub fn is_active(&self) -> bool {
        !matches!(self, SearchStage::Idle)
    }
}
