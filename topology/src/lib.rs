// Mechanical graph inspection: which actuators and collectors exist, and which
// kinematic layout a candidate actuator forms.

pub mod classify;
pub mod discovery;
pub mod structure;

pub use classify::{Assembly, AssemblyKey, Branch, Classifier, Layout};
pub use discovery::{Discovery, DiscoveryConfig};
pub use structure::Structure;
