use motion::Actuator;
use sensors::{Collector, CollectorCluster};

use crate::axis::{limited_prefix, output_delta, Axis};
use crate::{ResetTimer, SearchStage, TrackingConfig};

/// One child actuator of a branching assembly with its own collectors.
#[derive(Debug, Clone)]
pub struct Child<A, C> {
    axis: Axis<A>,
    cluster: CollectorCluster<C>,
    current: f32,
    last: f32,
    /// Already at its local optimum; idles until the base axis has moved.
    close: bool,
}

impl<A: Actuator, C: Collector> Child<A, C> {
    fn new(actuator: A, cluster: CollectorCluster<C>, config: &TrackingConfig) -> Self {
        let last = cluster.relative_output();
        Child {
            axis: Axis::wire(actuator, config.torque, config.reverse_cooldown_ms),
            cluster,
            current: 0.0,
            last,
            close: false,
        }
    }

    pub fn actuator(&self) -> &A {
        &self.axis.actuator
    }

    pub fn is_reversed(&self) -> bool {
        self.axis.reversed
    }

    pub fn is_close(&self) -> bool {
        self.close
    }

    pub fn last_output(&self) -> f32 {
        self.last
    }

    fn delta(&self) -> f32 {
        self.current - self.last
    }
}

/// T-layout: a base actuator carrying independent child actuators, each with
/// its own collectors. Children search first; once all of them settle the
/// base axis takes over, judged by the summed output change of all children.
#[derive(Debug, Clone)]
pub struct Branching<A, C> {
    base: Axis<A>,
    children: Vec<Child<A, C>>,
    reset: ResetTimer,
    config: TrackingConfig,
    limited: bool,
}

impl<A: Actuator, C: Collector> Branching<A, C> {
    pub fn new(base: A, children: Vec<(A, CollectorCluster<C>)>, config: TrackingConfig) -> Self {
        let base = Axis::wire(base, config.torque, config.reverse_cooldown_ms);
        let children: Vec<_> = children
            .into_iter()
            .map(|(actuator, cluster)| Child::new(actuator, cluster, &config))
            .collect();
        let limited = base.is_limited() || children.iter().any(|c| c.axis.is_limited());
        Branching {
            base,
            children,
            reset: ResetTimer::Idle,
            config,
            limited,
        }
    }

    pub fn base(&self) -> &A {
        &self.base.actuator
    }

    pub fn children(&self) -> &[Child<A, C>] {
        &self.children
    }

    pub fn is_base_reversed(&self) -> bool {
        self.base.reversed
    }

    pub fn reset_timer(&self) -> ResetTimer {
        self.reset
    }

    pub fn stage(&self) -> SearchStage {
        if self.base.is_moving() {
            SearchStage::Base
        } else if self.children.iter().any(|c| c.axis.is_moving()) {
            SearchStage::Panel
        } else {
            SearchStage::Idle
        }
    }

    pub fn advance(&mut self, dt_ms: f64, out: &mut String) {
        self.reset.tick(dt_ms);
        self.base.cooldown.tick(dt_ms);
        out.push_str(&format!(
            "{}TPanel {} ({:.0} - {})\n",
            limited_prefix(self.limited),
            self.base.actuator.name(),
            self.reset.as_ms(),
            self.base.reversed
        ));
        for (i, child) in self.children.iter_mut().enumerate() {
            child.axis.cooldown.tick(dt_ms);
            child.current = child.cluster.relative_output();
            out.push_str(&format!(
                "  C{} ({}): {}({})\n",
                i,
                child.axis.actuator.name(),
                output_delta(child.current, child.last),
                child.axis.reversed
            ));
        }
        out.push('\n');

        if self.should_stop() {
            self.stop_all();
            return;
        }

        if !self.base.is_moving()
            && !self.base.reversed
            && !self
                .children
                .iter()
                .any(|c| c.axis.is_moving() || c.axis.reversed)
        {
            for child in &mut self.children {
                child
                    .axis
                    .start(self.config.velocity, self.config.reverse_cooldown_ms);
            }
        } else {
            self.settle_children();
            self.drive_base();
        }

        for child in &mut self.children {
            child.last = child.current;
        }
    }

    /// Nothing left to gain, a joint is jammed, or the post-reversal reset ran out.
    fn should_stop(&self) -> bool {
        let settled = self.children.iter().all(|c| {
            self.config.reaches_threshold(c.current)
                || self.config.reaches_threshold(c.last)
                || c.current == 0.0
        });
        settled
            || self.reset.is_expired()
            || self.base.is_locked()
            || self.children.iter().any(|c| c.axis.is_locked())
    }

    fn stop_all(&mut self) {
        self.base.halt();
        self.base.reversed = false;
        for child in &mut self.children {
            child.axis.halt();
            child.axis.reversed = false;
            child.close = false;
            child.last = child.current;
        }
        self.reset = ResetTimer::Idle;
    }

    /// Each child reverses at most once, then stops and waits for the base.
    fn settle_children(&mut self) {
        let full = self.config.reverse_cooldown_ms;
        let short = self.config.short_cooldown_ms();
        for child in &mut self.children {
            let worse = child.current < child.last || (child.current == 0.0 && child.last == 0.0);
            if !worse || !child.axis.cooldown.is_elapsed() {
                continue;
            }
            if !child.axis.reversed {
                child.axis.reverse(if child.close { short } else { full });
                child.axis.reversed = true;
            } else {
                child.axis.halt();
                child.axis.cooldown.arm(short);
                child.axis.reversed = false;
                child.close = true;
                log::debug!("{} settled", child.axis.actuator.name());
            }
        }
    }

    fn drive_base(&mut self) {
        if !self.base.is_moving() {
            if self.children.iter().all(|c| c.close || c.current == 0.0) {
                for child in &mut self.children {
                    child.axis.halt();
                }
                self.base
                    .start(self.config.velocity, self.config.reverse_cooldown_ms);
                log::debug!("{} takes over", self.base.actuator.name());
            }
            return;
        }

        if !self.base.cooldown.is_elapsed() {
            return;
        }
        let delta: f32 = self.children.iter().map(Child::delta).sum();
        if delta >= 0.0 {
            return;
        }
        if !self.base.reversed {
            self.base.reverse(self.config.reverse_cooldown_ms);
            self.reset = ResetTimer::Pending(self.config.global_reset_ms);
            self.base.reversed = true;
        } else {
            self.base.halt();
            self.base.reversed = false;
            for child in &mut self.children {
                child.axis.reversed = false;
                child.close = false;
            }
        }
    }

    pub fn stop(&mut self, out: &mut String) {
        self.base.actuator.set_velocity(0.0);
        for child in &mut self.children {
            child.axis.actuator.set_velocity(0.0);
        }
        out.push_str(&format!(
            "{}TPanel {} stopped.\n\n",
            limited_prefix(self.limited),
            self.base.actuator.name()
        ));
    }
}
