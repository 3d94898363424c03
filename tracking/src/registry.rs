use std::collections::HashSet;
use std::time::Duration;

use motion::{Actuator, ActuatorId};
use sensors::{Collector, OutputScale};
use topology::{AssemblyKey, Classifier, Discovery};

use crate::{Controller, Drive, TrackingConfig};

/// All controllers of the current generation.
///
/// Rebuilt from scratch by `initialize`; ticks fan out to every controller in
/// discovery order.
#[derive(Debug)]
pub struct Registry<A, C> {
    classifier: Classifier,
    config: TrackingConfig,
    scale: OutputScale,
    controllers: Vec<Controller<A, C>>,
    keys: HashSet<AssemblyKey>,
    claimed: HashSet<ActuatorId>,
}

impl<A: Actuator + Clone, C: Collector + Clone> Registry<A, C> {
    pub fn new(classifier: Classifier, config: TrackingConfig, scale: OutputScale) -> Self {
        Registry {
            classifier,
            config,
            scale,
            controllers: Vec::new(),
            keys: HashSet::new(),
            claimed: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn controllers(&self) -> &[Controller<A, C>] {
        &self.controllers
    }

    /// Controllers currently driving at least one joint.
    pub fn active(&self) -> usize {
        self.controllers.iter().filter(|c| c.is_active()).count()
    }

    /// Drop the previous generation and classify every candidate actuator on
    /// the home body. Returns the number of controllers created.
    pub fn initialize<D>(&mut self, discovery: &D) -> usize
    where
        D: Discovery<Actuator = A, Collector = C>,
    {
        self.controllers.clear();
        self.keys.clear();
        self.claimed.clear();

        let home = discovery.home_body();
        let filter = self.classifier.config().clone();
        let candidates = discovery.find_actuators(&|a: &A| {
            a.base_body() == home && a.top_body().is_some() && !filter.excludes(a.name())
        });

        for candidate in candidates {
            if self.claimed.contains(&candidate.id()) {
                continue;
            }
            let Some(assembly) = self.classifier.classify(discovery, &candidate) else {
                continue;
            };
            let key = assembly.key();
            if self.keys.contains(&key) {
                continue;
            }
            let ids = assembly.actuator_ids();
            if ids.iter().any(|id| self.claimed.contains(id)) {
                log::warn!(
                    "{} overlaps an assembly already tracked, skipping",
                    candidate.name()
                );
                continue;
            }

            log::debug!("{} wired as {}", candidate.name(), assembly.layout());
            self.keys.insert(key);
            self.claimed.extend(ids);
            self.controllers
                .push(Controller::wire(assembly, self.config, self.scale));
        }

        log::info!("{} Panels created.", self.controllers.len());
        self.controllers.len()
    }

    pub fn advance(&mut self, dt: Duration) -> String {
        let mut out = String::new();
        for controller in &mut self.controllers {
            controller.advance(dt, &mut out);
        }
        out
    }

    pub fn stop_all(&mut self) -> String {
        let mut out = String::new();
        for controller in &mut self.controllers {
            controller.stop(&mut out);
        }
        out
    }

    pub fn drive(&mut self, drive: Drive) -> String {
        match drive {
            Drive::Advance(dt) => self.advance(dt),
            Drive::Stop => self.stop_all(),
        }
    }
}
