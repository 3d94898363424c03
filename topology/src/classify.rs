use std::fmt;

use motion::{Actuator, ActuatorId, BodyId};
use sensors::Collector;

use crate::{Discovery, DiscoveryConfig};

/// The four supported kinematic layouts, named after their shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// I: one actuator carrying collectors.
    SingleAxis,
    /// O: two actuators side by side driving the same body.
    DualParallel,
    /// T: a base actuator carrying several independent child actuators.
    Branching,
    /// U: a base actuator carrying an elevation/roll pair on a shared body.
    Gimbal,
}

impl Layout {
    pub fn shape(&self) -> char {
        match self {
            Layout::SingleAxis => 'I',
            Layout::DualParallel => 'O',
            Layout::Branching => 'T',
            Layout::Gimbal => 'U',
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Panel", self.shape())
    }
}

/// Structural identity of an assembly, used to collapse repeated discoveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssemblyKey {
    Rooted(ActuatorId),
    /// Unordered actuator pair plus the body both of them drive.
    Paired {
        low: ActuatorId,
        high: ActuatorId,
        output: BodyId,
    },
}

impl AssemblyKey {
    pub fn paired(a: ActuatorId, b: ActuatorId, output: BodyId) -> Self {
        AssemblyKey::Paired {
            low: a.min(b),
            high: a.max(b),
            output,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Branch<A, C> {
    pub actuator: A,
    pub collectors: Vec<C>,
}

/// A classified group of actuators and collectors, ready to be wired into a
/// controller. Classification never touches the hardware.
#[derive(Debug, Clone)]
pub enum Assembly<A, C> {
    SingleAxis {
        actuator: A,
        collectors: Vec<C>,
    },
    DualParallel {
        primary: A,
        roll: A,
        output: BodyId,
        collectors: Vec<C>,
    },
    Branching {
        base: A,
        branches: Vec<Branch<A, C>>,
    },
    Gimbal {
        base: A,
        panel: A,
        roll: A,
        collectors: Vec<C>,
    },
}

impl<A: Actuator, C: Collector> Assembly<A, C> {
    pub fn layout(&self) -> Layout {
        match self {
            Assembly::SingleAxis { .. } => Layout::SingleAxis,
            Assembly::DualParallel { .. } => Layout::DualParallel,
            Assembly::Branching { .. } => Layout::Branching,
            Assembly::Gimbal { .. } => Layout::Gimbal,
        }
    }

    pub fn key(&self) -> AssemblyKey {
        match self {
            Assembly::SingleAxis { actuator, .. } => AssemblyKey::Rooted(actuator.id()),
            Assembly::DualParallel {
                primary,
                roll,
                output,
                ..
            } => AssemblyKey::paired(primary.id(), roll.id(), *output),
            Assembly::Branching { base, .. } | Assembly::Gimbal { base, .. } => {
                AssemblyKey::Rooted(base.id())
            }
        }
    }

    /// Every actuator the assembly would take ownership of.
    pub fn actuator_ids(&self) -> Vec<ActuatorId> {
        match self {
            Assembly::SingleAxis { actuator, .. } => vec![actuator.id()],
            Assembly::DualParallel { primary, roll, .. } => vec![primary.id(), roll.id()],
            Assembly::Branching { base, branches } => std::iter::once(base.id())
                .chain(branches.iter().map(|b| b.actuator.id()))
                .collect(),
            Assembly::Gimbal {
                base, panel, roll, ..
            } => vec![base.id(), panel.id(), roll.id()],
        }
    }
}

/// Maps a candidate actuator onto one of the supported layouts.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: DiscoveryConfig,
}

type Found<D> = Assembly<<D as Discovery>::Actuator, <D as Discovery>::Collector>;

impl Classifier {
    pub fn new(config: DiscoveryConfig) -> Self {
        Classifier { config }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Try every layout in precedence order; the first match wins.
    pub fn classify<D: Discovery>(&self, discovery: &D, candidate: &D::Actuator) -> Option<Found<D>> {
        if self.config.excludes(candidate.name()) {
            return None;
        }
        let found = self
            .single_axis(discovery, candidate)
            .or_else(|| self.dual_parallel(discovery, candidate))
            .or_else(|| self.branching(discovery, candidate))
            .or_else(|| self.gimbal(discovery, candidate));

        match &found {
            Some(assembly) => log::debug!(
                "{} classified as {}",
                candidate.name(),
                assembly.layout()
            ),
            None => log::debug!("{} matches no layout", candidate.name()),
        }
        found
    }

    fn collectors_on<D: Discovery>(&self, discovery: &D, body: BodyId) -> Vec<D::Collector> {
        discovery.find_collectors(&|c: &D::Collector| {
            c.body() == body && !self.config.excludes(c.name())
        })
    }

    /// Actuators mounted on `body` that drive something.
    fn driving_on<D: Discovery>(&self, discovery: &D, body: BodyId) -> Vec<D::Actuator> {
        discovery.find_actuators(&|a: &D::Actuator| {
            a.base_body() == body && a.top_body().is_some() && !self.config.excludes(a.name())
        })
    }

    /// Actuators sharing both the base body and the output body of `r`.
    fn co_based<D: Discovery>(&self, discovery: &D, r: &D::Actuator, top: BodyId) -> Vec<D::Actuator> {
        let (id, base) = (r.id(), r.base_body());
        discovery.find_actuators(&|a: &D::Actuator| {
            a.id() != id
                && a.base_body() == base
                && a.top_body() == Some(top)
                && !self.config.excludes(a.name())
        })
    }

    fn single_axis<D: Discovery>(&self, discovery: &D, r: &D::Actuator) -> Option<Found<D>> {
        let top = r.top_body()?;
        let downstream = discovery.find_actuators(&|a: &D::Actuator| {
            a.base_body() == top && !self.config.excludes(a.name())
        });
        if !downstream.is_empty() || !self.co_based(discovery, r, top).is_empty() {
            return None;
        }
        let collectors = self.collectors_on(discovery, top);
        if collectors.is_empty() {
            return None;
        }
        Some(Assembly::SingleAxis {
            actuator: r.clone(),
            collectors,
        })
    }

    fn dual_parallel<D: Discovery>(&self, discovery: &D, r: &D::Actuator) -> Option<Found<D>> {
        let top = r.top_body()?;
        let downstream = discovery.find_actuators(&|a: &D::Actuator| {
            a.base_body() == top && !self.config.excludes(a.name())
        });
        if !downstream.is_empty() {
            return None;
        }
        let mut companions = self.co_based(discovery, r, top);
        if companions.len() != 1 {
            return None;
        }
        let collectors = self.collectors_on(discovery, top);
        if collectors.is_empty() {
            return None;
        }
        Some(Assembly::DualParallel {
            primary: r.clone(),
            roll: companions.remove(0),
            output: top,
            collectors,
        })
    }

    fn branching<D: Discovery>(&self, discovery: &D, r: &D::Actuator) -> Option<Found<D>> {
        let top = r.top_body()?;
        let children = self.driving_on(discovery, top);
        if children.is_empty() {
            return None;
        }
        let shared_output = children.iter().enumerate().any(|(i, a)| {
            children[i + 1..]
                .iter()
                .any(|b| a.top_body() == b.top_body())
        });
        if shared_output {
            return None;
        }

        let branches: Vec<_> = children
            .into_iter()
            .filter_map(|actuator| {
                let collectors = self.collectors_on(discovery, actuator.top_body()?);
                if collectors.is_empty() {
                    None
                } else {
                    Some(Branch {
                        actuator,
                        collectors,
                    })
                }
            })
            .collect();
        if branches.is_empty() {
            return None;
        }
        Some(Assembly::Branching {
            base: r.clone(),
            branches,
        })
    }

    fn gimbal<D: Discovery>(&self, discovery: &D, r: &D::Actuator) -> Option<Found<D>> {
        let top = r.top_body()?;
        let mut children = self.driving_on(discovery, top);
        if children.len() != 2 || children[0].top_body() != children[1].top_body() {
            return None;
        }
        let collectors = self.collectors_on(discovery, children[0].top_body()?);
        if collectors.is_empty() {
            return None;
        }
        let roll = children.remove(1);
        let panel = children.remove(0);
        Some(Assembly::Gimbal {
            base: r.clone(),
            panel,
            roll,
            collectors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Structure;
    use sensors::SizeClass;

    const HOME: BodyId = BodyId(0);

    fn layout_of(s: &Structure, name: &str) -> Option<Layout> {
        let r = s.rotors().iter().find(|r| r.name() == name).unwrap();
        Classifier::default().classify(s, r).map(|a| a.layout())
    }

    #[test]
    fn lone_rotor_with_panels_is_single_axis() {
        let mut s = Structure::new(HOME);
        s.add_rotor("Rotor", HOME, Some(BodyId(1)));
        s.add_panel("Solar", BodyId(1), SizeClass::Large);
        assert_eq!(layout_of(&s, "Rotor"), Some(Layout::SingleAxis));
    }

    #[test]
    fn rotor_without_collectors_is_rejected() {
        let mut s = Structure::new(HOME);
        s.add_rotor("Rotor", HOME, Some(BodyId(1)));
        assert_eq!(layout_of(&s, "Rotor"), None);
    }

    #[test]
    fn twin_rotors_form_one_dual_parallel_from_either_side() {
        let mut s = Structure::new(HOME);
        let a = s.add_rotor("A", HOME, Some(BodyId(1)));
        let b = s.add_rotor("B", HOME, Some(BodyId(1)));
        s.add_panel("Solar", BodyId(1), SizeClass::Small);

        let c = Classifier::default();
        let from_a = c.classify(&s, &a).unwrap();
        let from_b = c.classify(&s, &b).unwrap();
        assert_eq!(from_a.layout(), Layout::DualParallel);
        assert_eq!(from_a.key(), from_b.key());
    }

    #[test]
    fn distinct_child_outputs_form_branching() {
        let mut s = Structure::new(HOME);
        s.add_rotor("Base", HOME, Some(BodyId(1)));
        s.add_rotor("Left", BodyId(1), Some(BodyId(2)));
        s.add_rotor("Right", BodyId(1), Some(BodyId(3)));
        s.add_rotor("Bare", BodyId(1), Some(BodyId(4)));
        s.add_panel("L", BodyId(2), SizeClass::Large);
        s.add_panel("R", BodyId(3), SizeClass::Large);

        let base = s.rotors()[0].clone();
        match Classifier::default().classify(&s, &base) {
            Some(Assembly::Branching { branches, .. }) => {
                let names: Vec<_> = branches.iter().map(|b| b.actuator.name()).collect();
                assert_eq!(names, vec!["Left", "Right"]);
            }
            other => panic!("expected branching, got {:?}", other.map(|a| a.layout())),
        }
    }

    #[test]
    fn shared_child_output_forms_gimbal() {
        let mut s = Structure::new(HOME);
        s.add_rotor("Azimuth", HOME, Some(BodyId(1)));
        s.add_rotor("Elevation", BodyId(1), Some(BodyId(2)));
        s.add_rotor("Roll", BodyId(1), Some(BodyId(2)));
        s.add_panel("Solar", BodyId(2), SizeClass::Large);

        let base = s.rotors()[0].clone();
        match Classifier::default().classify(&s, &base) {
            Some(Assembly::Gimbal { panel, roll, .. }) => {
                assert_eq!(panel.name(), "Elevation");
                assert_eq!(roll.name(), "Roll");
            }
            other => panic!("expected gimbal, got {:?}", other.map(|a| a.layout())),
        }
    }

    #[test]
    fn excluded_parts_are_invisible() {
        let mut s = Structure::new(HOME);
        s.add_rotor("Rotor", HOME, Some(BodyId(1)));
        s.add_rotor("Spare [TXC SolarExclude]", HOME, Some(BodyId(1)));
        s.add_panel("Solar [TXC SolarExclude]", BodyId(1), SizeClass::Large);
        s.add_panel("Solar", BodyId(1), SizeClass::Large);

        let rotor = s.rotors()[0].clone();
        match Classifier::default().classify(&s, &rotor) {
            Some(Assembly::SingleAxis { collectors, .. }) => assert_eq!(collectors.len(), 1),
            other => panic!("expected single axis, got {:?}", other.map(|a| a.layout())),
        }
        assert_eq!(layout_of(&s, "Spare [TXC SolarExclude]"), None);
    }

    #[test]
    fn three_rotors_sharing_an_output_match_nothing() {
        let mut s = Structure::new(HOME);
        s.add_rotor("A", HOME, Some(BodyId(1)));
        s.add_rotor("B", HOME, Some(BodyId(1)));
        s.add_rotor("C", HOME, Some(BodyId(1)));
        s.add_panel("Solar", BodyId(1), SizeClass::Large);
        assert_eq!(layout_of(&s, "A"), None);
    }

    #[test]
    fn assembly_lists_every_owned_actuator() {
        let mut s = Structure::new(HOME);
        s.add_rotor("Azimuth", HOME, Some(BodyId(1)));
        s.add_rotor("Elevation", BodyId(1), Some(BodyId(2)));
        s.add_rotor("Roll", BodyId(1), Some(BodyId(2)));
        s.add_panel("Solar", BodyId(2), SizeClass::Large);
        let base = s.rotors()[0].clone();
        let assembly = Classifier::default().classify(&s, &base).unwrap();
        assert_eq!(
            assembly.actuator_ids(),
            vec![ActuatorId(1), ActuatorId(2), ActuatorId(3)]
        );
        assert_eq!(assembly.key(), AssemblyKey::Rooted(ActuatorId(1)));
    }
}
