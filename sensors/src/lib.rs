pub mod sensors {
    use std::cell::Cell;
    use std::rc::Rc;

    use motion::BodyId;
    use serde::{Deserialize, Serialize};

    /// Stable identity of a power collector.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CollectorId(pub u32);

    /// Physical size of a collector; decides its theoretical output per unit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum SizeClass {
        Large,
        Small,
    }

    /// Theoretical maximum output of one installed unit, per size class.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct OutputScale {
        pub large_unit_max: f32,
        pub small_unit_max: f32,
    }

    impl Default for OutputScale {
        fn default() -> Self {
            OutputScale {
                large_unit_max: 0.12,
                small_unit_max: 0.03,
            }
        }
    }

    impl OutputScale {
        pub fn unit_max(&self, size: SizeClass) -> f32 {
            match size {
                SizeClass::Large => self.large_unit_max,
                SizeClass::Small => self.small_unit_max,
            }
        }
    }

    /// A power collector whose instantaneous output is the tracking signal.
    pub trait Collector {
        fn id(&self) -> CollectorId;
        fn name(&self) -> &str;
        fn body(&self) -> BodyId;
        fn size_class(&self) -> SizeClass;
        /// Current raw output in output-per-installed-unit terms.
        fn max_output(&self) -> f32;
    }

    /// Collectors rigidly attached downstream of one actuator.
    #[derive(Debug, Clone)]
    pub struct CollectorCluster<C> {
        members: Vec<C>,
        scale: OutputScale,
    }

    impl<C: Collector> CollectorCluster<C> {
        pub fn new(members: Vec<C>, scale: OutputScale) -> Self {
            CollectorCluster { members, scale }
        }

        pub fn len(&self) -> usize {
            self.members.len()
        }

        pub fn is_empty(&self) -> bool {
            self.members.is_empty()
        }

        pub fn members(&self) -> &[C] {
            &self.members
        }

        /// Best normalized output over the cluster. Usually in [0, 1], though
        /// sensor noise can push it slightly above 1. An empty cluster reads 0.
        pub fn relative_output(&self) -> f32 {
            self.members.iter().fold(0.0_f32, |best, c| {
                best.max(c.max_output() / self.scale.unit_max(c.size_class()))
            })
        }
    }

    /// In-memory collector with a settable raw output. Clones share the reading.
    #[derive(Debug, Clone)]
    pub struct SimPanel {
        id: CollectorId,
        name: Rc<str>,
        body: BodyId,
        size: SizeClass,
        output: Rc<Cell<f32>>,
    }

    impl SimPanel {
        pub fn new(id: CollectorId, name: &str, body: BodyId, size: SizeClass) -> Self {
            SimPanel {
                id,
                name: Rc::from(name),
                body,
                size,
                output: Rc::new(Cell::new(0.0)),
            }
        }

        pub fn set_output(&self, raw: f32) {
            self.output.set(raw);
        }

        /// Set the raw output so the panel reads `relative` against `scale`.
        pub fn set_relative(&self, relative: f32, scale: &OutputScale) {
            self.output.set(relative * scale.unit_max(self.size));
        }
    }

    impl Collector for SimPanel {
        fn id(&self) -> CollectorId {
            self.id
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn body(&self) -> BodyId {
            self.body
        }

        fn size_class(&self) -> SizeClass {
            self.size
        }

        fn max_output(&self) -> f32 {
            self.output.get()
        }
    }
}

pub use sensors::{Collector, CollectorCluster, CollectorId, OutputScale, SimPanel, SizeClass};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use motion::BodyId;

    fn panel(id: u32, size: SizeClass) -> SimPanel {
        SimPanel::new(CollectorId(id), "Solar Panel", BodyId(1), size)
    }

    #[test]
    fn relative_output_takes_best_member() {
        let large = panel(1, SizeClass::Large);
        let small = panel(2, SizeClass::Small);
        large.set_output(0.06);
        small.set_output(0.024);
        let cluster = CollectorCluster::new(vec![large, small], OutputScale::default());
        assert_relative_eq!(cluster.relative_output(), 0.8, epsilon = 1e-6);
    }

    #[test]
    fn empty_cluster_reads_zero() {
        let cluster: CollectorCluster<SimPanel> = CollectorCluster::new(vec![], OutputScale::default());
        assert!(cluster.is_empty());
        assert_eq!(cluster.relative_output(), 0.0);
    }

    #[test]
    fn noisy_reading_may_exceed_one() {
        let p = panel(1, SizeClass::Small);
        p.set_output(0.0303);
        let cluster = CollectorCluster::new(vec![p], OutputScale::default());
        assert!(cluster.relative_output() > 1.0);
    }

    #[test]
    fn set_relative_round_trips_through_scale() {
        let scale = OutputScale::default();
        let p = panel(1, SizeClass::Large);
        p.set_relative(0.4, &scale);
        assert_relative_eq!(p.max_output(), 0.048, epsilon = 1e-6);
    }
}
