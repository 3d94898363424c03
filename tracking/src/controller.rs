use std::time::Duration;

use motion::Actuator;
use sensors::{Collector, CollectorCluster, OutputScale};
use topology::{Assembly, Layout};

use crate::branching::Branching;
use crate::dual_parallel::DualParallel;
use crate::gimbal::Gimbal;
use crate::single_axis::SingleAxis;
use crate::TrackingConfig;

/// What the dispatcher wants from the controllers on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drive {
    Advance(Duration),
    Stop,
}

/// One tracking controller per classified assembly.
#[derive(Debug, Clone)]
pub enum Controller<A, C> {
    SingleAxis(SingleAxis<A, C>),
    DualParallel(DualParallel<A, C>),
    Branching(Branching<A, C>),
    Gimbal(Gimbal<A, C>),
}

impl<A: Actuator, C: Collector> Controller<A, C> {
    /// Take ownership of the assembly's actuators and put them in their
    /// resting configuration.
    pub fn wire(assembly: Assembly<A, C>, config: TrackingConfig, scale: OutputScale) -> Self {
        let cluster = |collectors: Vec<C>| CollectorCluster::new(collectors, scale);
        match assembly {
            Assembly::SingleAxis {
                actuator,
                collectors,
            } => Controller::SingleAxis(SingleAxis::new(actuator, cluster(collectors), config)),
            Assembly::DualParallel {
                primary,
                roll,
                collectors,
                ..
            } => Controller::DualParallel(DualParallel::new(
                primary,
                roll,
                cluster(collectors),
                config,
            )),
            Assembly::Branching { base, branches } => {
                let children = branches
                    .into_iter()
                    .map(|b| (b.actuator, cluster(b.collectors)))
                    .collect();
                Controller::Branching(Branching::new(base, children, config))
            }
            Assembly::Gimbal {
                base,
                panel,
                roll,
                collectors,
            } => Controller::Gimbal(Gimbal::new(base, panel, roll, cluster(collectors), config)),
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            Controller::SingleAxis(_) => Layout::SingleAxis,
            Controller::DualParallel(_) => Layout::DualParallel,
            Controller::Branching(_) => Layout::Branching,
            Controller::Gimbal(_) => Layout::Gimbal,
        }
    }

    /// The actuator the controller is named after.
    pub fn base(&self) -> &A {
        match self {
            Controller::SingleAxis(c) => c.actuator(),
            Controller::DualParallel(c) => c.primary(),
            Controller::Branching(c) => c.base(),
            Controller::Gimbal(c) => c.base(),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Controller::SingleAxis(c) => c.state().is_active(),
            Controller::DualParallel(c) => c.primary().is_moving(),
            Controller::Branching(c) => c.stage().is_active(),
            Controller::Gimbal(c) => c.stage().is_active(),
        }
    }

    pub fn advance(&mut self, dt: Duration, out: &mut String) {
        let dt_ms = dt.as_secs_f64() * 1000.0;
        match self {
            Controller::SingleAxis(c) => c.advance(dt_ms, out),
            Controller::DualParallel(c) => c.advance(dt_ms, out),
            Controller::Branching(c) => c.advance(dt_ms, out),
            Controller::Gimbal(c) => c.advance(dt_ms, out),
        }
    }

    pub fn stop(&mut self, out: &mut String) {
        match self {
            Controller::SingleAxis(c) => c.stop(out),
            Controller::DualParallel(c) => c.stop(out),
            Controller::Branching(c) => c.stop(out),
            Controller::Gimbal(c) => c.stop(out),
        }
    }
}
