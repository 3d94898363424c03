use motion::Actuator;
use sensors::{Collector, CollectorCluster};

use crate::axis::{limited_prefix, output_delta, release, Axis};
use crate::TrackingConfig;

/// O-layout: a driven actuator and a free-spinning companion sharing both
/// ends, turning one collector cluster.
#[derive(Debug, Clone)]
pub struct DualParallel<A, C> {
    primary: Axis<A>,
    roll: A,
    cluster: CollectorCluster<C>,
    config: TrackingConfig,
    limited: bool,
    last_output: f32,
}

impl<A: Actuator, C: Collector> DualParallel<A, C> {
    pub fn new(primary: A, mut roll: A, cluster: CollectorCluster<C>, config: TrackingConfig) -> Self {
        let primary = Axis::wire(primary, config.torque, config.reverse_cooldown_ms);
        roll.enable();
        release(&mut roll);
        let limited = primary.is_limited() || roll.limits().is_limited();
        let last_output = cluster.relative_output();
        DualParallel {
            primary,
            roll,
            cluster,
            config,
            limited,
            last_output,
        }
    }

    pub fn primary(&self) -> &A {
        &self.primary.actuator
    }

    pub fn roll(&self) -> &A {
        &self.roll
    }

    pub fn last_output(&self) -> f32 {
        self.last_output
    }

    pub fn cooldown_ms(&self) -> f64 {
        self.primary.cooldown.remaining_ms()
    }

    pub fn advance(&mut self, dt_ms: f64, out: &mut String) {
        let current = self.cluster.relative_output();
        self.primary.cooldown.tick(dt_ms);
        out.push_str(&format!(
            "{}OPanel {} ({:.0})\n  P: {}\n\n",
            limited_prefix(self.limited),
            self.primary.actuator.name(),
            self.primary.cooldown.remaining_ms(),
            output_delta(current, self.last_output)
        ));

        if self.config.is_saturated(current)
            || self.config.is_saturated(self.last_output)
            || current == 0.0
            || self.primary.is_locked()
            || self.roll.safety_locked()
        {
            self.primary.halt();
            self.last_output = current;
            return;
        }

        if !self.primary.is_moving() {
            // Companion may have been grabbed while the pair sat still.
            release(&mut self.roll);
            self.primary.actuator.set_torque(self.config.torque);
            self.primary.actuator.set_brake_torque(self.config.torque);
            self.primary
                .start(self.config.velocity, self.config.reverse_cooldown_ms);
        } else if current < self.last_output && self.primary.cooldown.is_elapsed() {
            self.primary.reverse(self.config.reverse_cooldown_ms);
        }
        self.last_output = current;
    }

    pub fn stop(&mut self, out: &mut String) {
        self.primary.actuator.set_velocity(0.0);
        self.roll.set_velocity(0.0);
        out.push_str(&format!(
            "{}OPanel {} stopped.\n\n",
            limited_prefix(self.limited),
            self.primary.actuator.name()
        ));
    }
}
