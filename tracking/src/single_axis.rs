use motion::Actuator;
use sensors::{Collector, CollectorCluster};

use crate::axis::{limited_prefix, output_delta, Axis};
use crate::{SingleAxisState, TrackingConfig};

/// I-layout: one actuator turning one collector cluster.
#[derive(Debug, Clone)]
pub struct SingleAxis<A, C> {
    axis: Axis<A>,
    cluster: CollectorCluster<C>,
    config: TrackingConfig,
    limited: bool,
    realigning: bool,
    last_output: f32,
}

impl<A: Actuator, C: Collector> SingleAxis<A, C> {
    pub fn new(actuator: A, cluster: CollectorCluster<C>, config: TrackingConfig) -> Self {
        let axis = Axis::wire(actuator, config.torque, config.reverse_cooldown_ms);
        let last_output = cluster.relative_output();
        SingleAxis {
            limited: axis.is_limited(),
            axis,
            cluster,
            config,
            realigning: false,
            last_output,
        }
    }

    pub fn actuator(&self) -> &A {
        &self.axis.actuator
    }

    pub fn is_limited(&self) -> bool {
        self.limited
    }

    pub fn last_output(&self) -> f32 {
        self.last_output
    }

    pub fn cooldown_ms(&self) -> f64 {
        self.axis.cooldown.remaining_ms()
    }

    pub fn direction(&self) -> f32 {
        self.axis.sign
    }

    pub fn state(&self) -> SingleAxisState {
        if self.realigning {
            SingleAxisState::LimitRealign
        } else if self.axis.is_moving() {
            SingleAxisState::Tracking
        } else {
            SingleAxisState::Stopped
        }
    }

    pub fn advance(&mut self, dt_ms: f64, out: &mut String) {
        let current = self.cluster.relative_output();
        self.axis.cooldown.tick(dt_ms);
        out.push_str(&format!(
            "{}IPanel {} ({:.0})\n  P: {}\n\n",
            limited_prefix(self.limited),
            self.axis.actuator.name(),
            self.axis.cooldown.remaining_ms(),
            output_delta(current, self.last_output)
        ));

        if self.realigning || (self.limited && current < self.config.limit_change_output) {
            self.realign(current);
            self.last_output = current;
            return;
        }

        if self.config.is_saturated(current)
            || self.config.is_saturated(self.last_output)
            || current == 0.0
            || self.axis.is_locked()
        {
            self.axis.halt();
            self.last_output = current;
            return;
        }

        if !self.axis.is_moving() {
            self.axis
                .start(self.config.velocity, self.config.reverse_cooldown_ms);
        } else if current < self.last_output && self.axis.cooldown.is_elapsed() {
            self.axis.reverse(self.config.reverse_cooldown_ms);
        }
        self.last_output = current;
    }

    /// Sweep to the farther stop, park there, and hand back to tracking once
    /// output returns.
    fn realign(&mut self, current: f32) {
        let actuator = &mut self.axis.actuator;
        if !self.realigning {
            let sign = actuator.limits().return_sign(actuator.angle());
            self.axis.sign = sign;
            actuator.set_velocity(-sign * self.config.velocity);
            self.realigning = true;
            log::debug!("{} realigning towards its farther limit", actuator.name());
            return;
        }

        if actuator.limits().distance_to_nearest(actuator.angle()) < 0.1 {
            actuator.set_velocity(0.0);
        }
        if current > self.config.limit_change_output {
            self.realigning = false;
            log::debug!("{} leaves limit realign", actuator.name());
        }
    }

    pub fn stop(&mut self, out: &mut String) {
        self.axis.actuator.set_velocity(0.0);
        out.push_str(&format!(
            "{}IPanel {} stopped.\n\n",
            limited_prefix(self.limited),
            self.axis.actuator.name()
        ));
    }
}
