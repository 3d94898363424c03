use motion::{Actuator, ActuatorId, BodyId, Limits, SimRotor};
use sensors::{CollectorId, SimPanel, SizeClass};

use crate::Discovery;

/// In-memory mechanical graph: rigid bodies joined by rotors, with panels
/// welded onto bodies. Serves as the discovery provider for the simulated
/// plant and the tests.
#[derive(Debug, Clone)]
pub struct Structure {
    home: BodyId,
    rotors: Vec<SimRotor>,
    panels: Vec<SimPanel>,
}

impl Structure {
    pub fn new(home: BodyId) -> Self {
        Structure {
            home,
            rotors: Vec::new(),
            panels: Vec::new(),
        }
    }

    pub fn add_rotor(&mut self, name: &str, base: BodyId, top: Option<BodyId>) -> SimRotor {
        self.add_limited_rotor(name, base, top, Limits::UNBOUNDED)
    }

    pub fn add_limited_rotor(
        &mut self,
        name: &str,
        base: BodyId,
        top: Option<BodyId>,
        limits: Limits,
    ) -> SimRotor {
        let id = ActuatorId(self.rotors.len() as u32 + 1);
        let rotor = SimRotor::new(id, name, base, top).with_limits(limits);
        self.rotors.push(rotor.clone());
        rotor
    }

    pub fn add_panel(&mut self, name: &str, body: BodyId, size: SizeClass) -> SimPanel {
        let id = CollectorId(self.panels.len() as u32 + 1);
        let panel = SimPanel::new(id, name, body, size);
        self.panels.push(panel.clone());
        panel
    }

    pub fn rotors(&self) -> &[SimRotor] {
        &self.rotors
    }

    pub fn panels(&self) -> &[SimPanel] {
        &self.panels
    }

    pub fn rotor(&self, id: ActuatorId) -> Option<&SimRotor> {
        self.rotors.iter().find(|r| r.id() == id)
    }

    /// The rotor whose output side drives `body`, preferring one that carries
    /// torque (a free-spinning roll companion only follows).
    pub fn driver_of(&self, body: BodyId) -> Option<&SimRotor> {
        let mut drivers = self.rotors.iter().filter(|r| r.top_body() == Some(body));
        let first = drivers.next()?;
        if first.torque() > 0.0 {
            return Some(first);
        }
        drivers.find(|r| r.torque() > 0.0).or(Some(first))
    }

    /// Advance every joint by `dt` seconds.
    pub fn step(&self, dt: f32) {
        for rotor in &self.rotors {
            rotor.step(dt);
        }
    }
}

impl Discovery for Structure {
    type Actuator = SimRotor;
    type Collector = SimPanel;

    fn home_body(&self) -> BodyId {
        self.home
    }

    fn find_actuators(&self, predicate: &dyn Fn(&SimRotor) -> bool) -> Vec<SimRotor> {
        self.rotors.iter().filter(|r| predicate(r)).cloned().collect()
    }

    fn find_collectors(&self, predicate: &dyn Fn(&SimPanel) -> bool) -> Vec<SimPanel> {
        self.panels.iter().filter(|p| predicate(p)).cloned().collect()
    }
}
