use motion::Actuator;

/// Count-down timer gating reversals on one axis.
///
/// Decrements only while non-negative, so once elapsed it rests at a negative
/// "ready" value until re-armed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    remaining_ms: f64,
}

impl Cooldown {
    pub fn armed(ms: f64) -> Self {
        Cooldown { remaining_ms: ms }
    }

    pub fn arm(&mut self, ms: f64) {
        self.remaining_ms = ms;
    }

    pub fn tick(&mut self, dt_ms: f64) {
        if self.remaining_ms >= 0.0 {
            self.remaining_ms -= dt_ms;
        }
    }

    pub fn is_elapsed(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms
    }
}

/// Damping timer armed on a base-axis reversal. When it runs out the owning
/// controller performs one full stop and starts over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResetTimer {
    Idle,
    Pending(f64),
    Expired,
}

impl ResetTimer {
    pub fn tick(&mut self, dt_ms: f64) {
        if let ResetTimer::Pending(remaining) = *self {
            let left = remaining - dt_ms;
            *self = if left <= 0.0 {
                ResetTimer::Expired
            } else {
                ResetTimer::Pending(left)
            };
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, ResetTimer::Expired)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ResetTimer::Pending(_))
    }

    /// Status value: remaining time, 0 when idle, -1 once expired.
    pub fn as_ms(&self) -> f64 {
        match self {
            ResetTimer::Idle => 0.0,
            ResetTimer::Pending(ms) => *ms,
            ResetTimer::Expired => -1.0,
        }
    }
}

/// One tracked actuator with its remembered direction and reversal state.
#[derive(Debug, Clone)]
pub(crate) struct Axis<A> {
    pub(crate) actuator: A,
    pub(crate) sign: f32,
    pub(crate) cooldown: Cooldown,
    pub(crate) reversed: bool,
}

impl<A: Actuator> Axis<A> {
    /// Take ownership of a driven joint: powered, still, full torque.
    pub(crate) fn wire(mut actuator: A, torque: f32, cooldown_ms: f64) -> Self {
        actuator.enable();
        actuator.set_velocity(0.0);
        actuator.set_torque(torque);
        actuator.set_brake_torque(torque);
        Axis {
            actuator,
            sign: 1.0,
            cooldown: Cooldown::armed(cooldown_ms),
            reversed: false,
        }
    }

    pub(crate) fn is_moving(&self) -> bool {
        self.actuator.is_moving()
    }

    pub(crate) fn is_locked(&self) -> bool {
        self.actuator.safety_locked()
    }

    pub(crate) fn is_limited(&self) -> bool {
        self.actuator.limits().is_limited()
    }

    pub(crate) fn start(&mut self, velocity: f32, cooldown_ms: f64) {
        self.actuator.set_velocity(self.sign * velocity);
        self.cooldown.arm(cooldown_ms);
    }

    /// Stop, remembering the direction it was moving in.
    pub(crate) fn halt(&mut self) {
        let velocity = self.actuator.velocity();
        if velocity != 0.0 {
            self.sign = velocity.signum();
            self.actuator.set_velocity(0.0);
        }
    }

    pub(crate) fn reverse(&mut self, cooldown_ms: f64) {
        log::debug!("reversing {}", self.actuator.name());
        self.actuator.reverse();
        self.cooldown.arm(cooldown_ms);
    }
}

/// Leave a roll companion free-spinning: powered, still, no torque.
pub(crate) fn release<A: Actuator>(actuator: &mut A) {
    actuator.set_velocity(0.0);
    actuator.set_torque(0.0);
    actuator.set_brake_torque(0.0);
}

/// "P: 0.412 + 0.012" style output line.
pub(crate) fn output_delta(current: f32, last: f32) -> String {
    let delta = current - last;
    format!(
        "{:.3}{}{:.3}",
        current,
        if delta < 0.0 { " - " } else { " + " },
        delta.abs()
    )
}

pub(crate) fn limited_prefix(limited: bool) -> &'static str {
    if limited {
        "Limited "
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion::{ActuatorId, BodyId, SimRotor};

    #[test]
    fn cooldown_rests_below_zero() {
        let mut c = Cooldown::armed(1000.0);
        c.tick(600.0);
        assert!(!c.is_elapsed());
        c.tick(600.0);
        assert!(c.is_elapsed());
        assert_eq!(c.remaining_ms(), -200.0);
        c.tick(600.0);
        assert_eq!(c.remaining_ms(), -200.0);
    }

    #[test]
    fn reset_timer_expires_once_run_out() {
        let mut t = ResetTimer::Pending(1000.0);
        t.tick(1000.0);
        assert!(t.is_expired());
        assert_eq!(t.as_ms(), -1.0);

        let mut idle = ResetTimer::Idle;
        idle.tick(50_000.0);
        assert_eq!(idle, ResetTimer::Idle);
    }

    #[test]
    fn halt_remembers_direction() {
        let rotor = SimRotor::new(ActuatorId(1), "R", BodyId(0), Some(BodyId(1)));
        let mut axis = Axis::wire(rotor.clone(), 10.0, 5000.0);
        assert!(rotor.is_enabled());
        axis.sign = -1.0;
        axis.start(0.01, 5000.0);
        assert_eq!(rotor.velocity(), -0.01);
        axis.reverse(5000.0);
        axis.halt();
        assert_eq!(axis.sign, 1.0);
        assert!(!axis.is_moving());
    }

    #[test]
    fn output_delta_shows_sign() {
        assert_eq!(output_delta(0.35, 0.40), "0.350 - 0.050");
        assert_eq!(output_delta(0.40, 0.30), "0.400 + 0.100");
    }
}
