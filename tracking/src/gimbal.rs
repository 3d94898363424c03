use motion::Actuator;
use sensors::{Collector, CollectorCluster};

use crate::axis::{limited_prefix, output_delta, release, Axis};
use crate::{ResetTimer, SearchStage, TrackingConfig};

/// U-layout: an azimuth base carrying an elevation actuator and a
/// free-spinning roll companion that share one collector body.
///
/// Elevation searches first. After it has reversed once and output still
/// drops, it stops and the azimuth base searches with the same
/// reverse-once-then-reset pattern as the branching layout.
#[derive(Debug, Clone)]
pub struct Gimbal<A, C> {
    base: Axis<A>,
    panel: Axis<A>,
    roll: A,
    cluster: CollectorCluster<C>,
    reset: ResetTimer,
    config: TrackingConfig,
    limited: bool,
    last_output: f32,
}

impl<A: Actuator, C: Collector> Gimbal<A, C> {
    pub fn new(
        base: A,
        panel: A,
        mut roll: A,
        cluster: CollectorCluster<C>,
        config: TrackingConfig,
    ) -> Self {
        let base = Axis::wire(base, config.torque, config.reverse_cooldown_ms);
        let panel = Axis::wire(panel, config.torque, config.reverse_cooldown_ms);
        roll.enable();
        release(&mut roll);
        let limited = base.is_limited() || panel.is_limited() || roll.limits().is_limited();
        let last_output = cluster.relative_output();
        Gimbal {
            base,
            panel,
            roll,
            cluster,
            reset: ResetTimer::Idle,
            config,
            limited,
            last_output,
        }
    }

    pub fn base(&self) -> &A {
        &self.base.actuator
    }

    pub fn panel(&self) -> &A {
        &self.panel.actuator
    }

    pub fn roll(&self) -> &A {
        &self.roll
    }

    pub fn last_output(&self) -> f32 {
        self.last_output
    }

    pub fn reset_timer(&self) -> ResetTimer {
        self.reset
    }

    pub fn is_base_reversed(&self) -> bool {
        self.base.reversed
    }

    pub fn is_panel_reversed(&self) -> bool {
        self.panel.reversed
    }

    pub fn stage(&self) -> SearchStage {
        if self.base.is_moving() {
            SearchStage::Base
        } else if self.panel.is_moving() {
            SearchStage::Panel
        } else {
            SearchStage::Idle
        }
    }

    pub fn advance(&mut self, dt_ms: f64, out: &mut String) {
        let current = self.cluster.relative_output();
        self.base.cooldown.tick(dt_ms);
        self.panel.cooldown.tick(dt_ms);
        self.reset.tick(dt_ms);
        out.push_str(&format!(
            "{}UPanel {} ({:.0})\n  P: {}\n\n",
            limited_prefix(self.limited),
            self.base.actuator.name(),
            self.reset.as_ms(),
            output_delta(current, self.last_output)
        ));

        if self.config.is_saturated(current)
            || self.config.is_saturated(self.last_output)
            || current == 0.0
            || self.reset.is_expired()
            || self.base.is_locked()
            || self.panel.is_locked()
        {
            self.base.halt();
            self.panel.halt();
            self.base.reversed = false;
            self.panel.reversed = false;
            self.reset = ResetTimer::Idle;
            self.last_output = current;
            return;
        }

        let dropped = current < self.last_output;
        if !self.panel.is_moving() && !self.base.is_moving() {
            release(&mut self.roll);
            self.panel
                .start(self.config.velocity, self.config.reverse_cooldown_ms);
        } else if (dropped && self.panel.cooldown.is_elapsed()) || self.base.is_moving() {
            if !self.panel.reversed {
                self.panel.reverse(self.config.reverse_cooldown_ms);
                self.panel.reversed = true;
            } else {
                self.panel.halt();
                self.drive_base(dropped);
            }
        }
        self.last_output = current;
    }

    fn drive_base(&mut self, dropped: bool) {
        if !self.base.is_moving() {
            self.base
                .start(self.config.velocity, self.config.reverse_cooldown_ms);
            log::debug!("{} takes over", self.base.actuator.name());
        } else if dropped && self.base.cooldown.is_elapsed() {
            if !self.base.reversed {
                self.base.reverse(self.config.reverse_cooldown_ms);
                self.reset = ResetTimer::Pending(self.config.global_reset_ms);
                self.base.reversed = true;
            } else {
                self.base.halt();
                self.base.reversed = false;
                self.panel.reversed = false;
            }
        }
    }

    pub fn stop(&mut self, out: &mut String) {
        self.base.actuator.set_velocity(0.0);
        self.panel.actuator.set_velocity(0.0);
        self.roll.set_velocity(0.0);
        out.push_str(&format!(
            "{}UPanel {} stopped.\n\n",
            limited_prefix(self.limited),
            self.base.actuator.name()
        ));
    }
}
