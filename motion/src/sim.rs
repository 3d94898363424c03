use std::cell::RefCell;
use std::rc::Rc;

use crate::{Actuator, ActuatorId, BodyId, Limits};

#[derive(Debug)]
struct RotorState {
    angle: f32,
    limits: Limits,
    velocity: f32,
    torque: f32,
    brake_torque: f32,
    locked: bool,
    enabled: bool,
}

/// In-memory rotary joint.
///
/// Cloning yields another handle to the same joint, so the plant can integrate
/// motion while a controller commands it.
#[derive(Debug, Clone)]
pub struct SimRotor {
    id: ActuatorId,
    name: Rc<str>,
    base: BodyId,
    top: Option<BodyId>,
    state: Rc<RefCell<RotorState>>,
}

impl SimRotor {
    pub fn new(id: ActuatorId, name: &str, base: BodyId, top: Option<BodyId>) -> Self {
        SimRotor {
            id,
            name: Rc::from(name),
            base,
            top,
            state: Rc::new(RefCell::new(RotorState {
                angle: 0.0,
                limits: Limits::UNBOUNDED,
                velocity: 0.0,
                torque: 0.0,
                brake_torque: 0.0,
                locked: false,
                enabled: false,
            })),
        }
    }

    pub fn with_limits(self, limits: Limits) -> Self {
        {
            let mut s = self.state.borrow_mut();
            s.limits = limits;
            s.angle = limits.clamp(s.angle);
        }
        self
    }

    pub fn set_angle(&self, angle: f32) {
        let mut s = self.state.borrow_mut();
        s.angle = s.limits.clamp(angle);
    }

    pub fn set_locked(&self, locked: bool) {
        self.state.borrow_mut().locked = locked;
    }

    pub fn brake_torque(&self) -> f32 {
        self.state.borrow().brake_torque
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    /// Integrate the commanded velocity over `dt` seconds.
    /// A locked, disabled or torque-less joint does not drive itself.
    pub fn step(&self, dt: f32) {
        let mut s = self.state.borrow_mut();
        if s.locked || !s.enabled || s.torque <= 0.0 {
            return;
        }
        let next = s.angle + s.velocity * dt;
        s.angle = s.limits.clamp(next);
    }
}

impl Actuator for SimRotor {
    fn id(&self) -> ActuatorId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn base_body(&self) -> BodyId {
        self.base
    }

    fn top_body(&self) -> Option<BodyId> {
        self.top
    }

    fn angle(&self) -> f32 {
        self.state.borrow().angle
    }

    fn limits(&self) -> Limits {
        self.state.borrow().limits
    }

    fn velocity(&self) -> f32 {
        self.state.borrow().velocity
    }

    fn set_velocity(&mut self, velocity: f32) {
        self.state.borrow_mut().velocity = velocity;
    }

    fn torque(&self) -> f32 {
        self.state.borrow().torque
    }

    fn set_torque(&mut self, torque: f32) {
        self.state.borrow_mut().torque = torque;
    }

    fn set_brake_torque(&mut self, torque: f32) {
        self.state.borrow_mut().brake_torque = torque;
    }

    fn safety_locked(&self) -> bool {
        self.state.borrow().locked
    }

    fn enable(&mut self) {
        self.state.borrow_mut().enabled = true;
    }

    fn reverse(&mut self) {
        let mut s = self.state.borrow_mut();
        s.velocity = -s.velocity;
        log::debug!("{} reversed, velocity now {:.3}", self.name, s.velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotor() -> SimRotor {
        SimRotor::new(ActuatorId(1), "Rotor", BodyId(0), Some(BodyId(1)))
    }

    #[test]
    fn clones_share_the_same_joint() {
        let a = rotor();
        let mut b = a.clone();
        b.set_velocity(0.5);
        assert_eq!(a.velocity(), 0.5);
    }

    #[test]
    fn reverse_flips_velocity_and_keeps_limits() {
        let mut r = rotor().with_limits(Limits::new(-1.0, 1.0));
        r.set_velocity(0.01);
        r.reverse();
        assert_eq!(r.velocity(), -0.01);
        assert_eq!(r.limits(), Limits::new(-1.0, 1.0));
    }

    #[test]
    fn step_clamps_at_limits() {
        let mut r = rotor().with_limits(Limits::new(-0.5, 0.5));
        r.enable();
        r.set_torque(1.0);
        r.set_velocity(1.0);
        r.step(2.0);
        assert_eq!(r.angle(), 0.5);
    }

    #[test]
    fn locked_or_free_spinning_joint_does_not_move() {
        let mut r = rotor();
        r.enable();
        r.set_velocity(1.0);
        r.step(1.0);
        assert_eq!(r.angle(), 0.0);

        r.set_torque(1.0);
        r.set_locked(true);
        r.step(1.0);
        assert_eq!(r.angle(), 0.0);
        assert!(r.safety_locked());
    }

    #[test]
    fn return_sign_points_back_from_farther_stop() {
        let limits = Limits::new(-1.0, 1.0);
        // Near the upper stop the farther stop is the lower one; after the sweep
        // the joint heads back up.
        assert_eq!(limits.return_sign(0.9), 1.0);
        assert_eq!(limits.return_sign(-0.9), -1.0);
        assert_eq!(limits.return_sign(0.0), 1.0);
        assert!(limits.is_limited());
        assert!(!Limits::UNBOUNDED.is_limited());
    }
}
