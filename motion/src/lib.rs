// Rotary joints as seen by the tracking controllers.
// The controllers only ever talk to the `Actuator` trait; `SimRotor` is the
// in-memory joint used by the simulated plant and the tests.

mod sim;

pub use sim::SimRotor;

use std::fmt;

/// Stable identity of a rotary joint on the structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActuatorId(pub u32);

/// Identity of a rigid body (a set of parts welded together).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

impl fmt::Display for ActuatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// Travel limits in radians. An infinite bound means that side is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub lower: f32,
    pub upper: f32,
}

impl Limits {
    pub const UNBOUNDED: Limits = Limits {
        lower: f32::NEG_INFINITY,
        upper: f32::INFINITY,
    };

    pub fn new(lower: f32, upper: f32) -> Self {
        Limits { lower, upper }
    }

    /// True when at least one side has a physical stop.
    pub fn is_limited(&self) -> bool {
        self.lower.is_finite() || self.upper.is_finite()
    }

    pub fn clamp(&self, angle: f32) -> f32 {
        angle.max(self.lower).min(self.upper)
    }

    /// Distance in radians to the closer of the two stops.
    pub fn distance_to_nearest(&self, angle: f32) -> f32 {
        (angle - self.lower).min(self.upper - angle)
    }

    /// Sign of the direction pointing *away* from the farther stop, i.e. the
    /// direction the joint should take once it has swept to that farther stop.
    /// A joint sitting exactly at the midpoint counts as positive.
    pub fn return_sign(&self, angle: f32) -> f32 {
        let offset = 2.0 * angle - self.upper - self.lower;
        if offset < 0.0 {
            -1.0
        } else {
            1.0
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits::UNBOUNDED
    }
}

/// Capability surface of a rotary joint.
///
/// A joint is mounted on `base_body` and drives `top_body` (if anything is
/// attached). Velocity is signed, in radians per second.
pub trait Actuator {
    fn id(&self) -> ActuatorId;
    fn name(&self) -> &str;

    fn base_body(&self) -> BodyId;
    fn top_body(&self) -> Option<BodyId>;

    fn angle(&self) -> f32;
    fn limits(&self) -> Limits;

    fn velocity(&self) -> f32;
    fn set_velocity(&mut self, velocity: f32);

    fn torque(&self) -> f32;
    fn set_torque(&mut self, torque: f32);
    fn set_brake_torque(&mut self, torque: f32);

    /// Set externally when the joint is mechanically jammed.
    fn safety_locked(&self) -> bool;

    /// Power the joint on.
    fn enable(&mut self);

    /// One-shot direction flip. Travel limits are left untouched.
    fn reverse(&mut self);

    fn is_moving(&self) -> bool {
        self.velocity() != 0.0
    }
}
