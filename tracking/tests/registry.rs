use std::time::Duration;

use motion::{Actuator, BodyId, Limits, SimRotor};
use sensors::{OutputScale, SimPanel, SizeClass};
use topology::{Classifier, DiscoveryConfig, Layout, Structure};
use tracking::{Controller, Drive, Registry, TrackingConfig};

const HOME: BodyId = BodyId(0);

fn registry() -> Registry<SimRotor, SimPanel> {
    Registry::new(
        Classifier::default(),
        TrackingConfig::default(),
        OutputScale::default(),
    )
}

fn layouts(r: &Registry<SimRotor, SimPanel>) -> Vec<Layout> {
    r.controllers().iter().map(|c| c.layout()).collect()
}

/// One assembly of every shape on a single home body.
fn farm() -> Structure {
    let mut s = Structure::new(HOME);
    let scale = OutputScale::default();

    s.add_rotor("I", HOME, Some(BodyId(1)));
    s.add_panel("I panel", BodyId(1), SizeClass::Large)
        .set_relative(0.5, &scale);

    s.add_rotor("O left", HOME, Some(BodyId(2)));
    s.add_rotor("O right", HOME, Some(BodyId(2)));
    s.add_panel("O panel", BodyId(2), SizeClass::Small)
        .set_relative(0.5, &scale);

    s.add_rotor("T base", HOME, Some(BodyId(3)));
    s.add_rotor("T left", BodyId(3), Some(BodyId(4)));
    s.add_rotor("T right", BodyId(3), Some(BodyId(5)));
    s.add_panel("T left panel", BodyId(4), SizeClass::Large)
        .set_relative(0.5, &scale);
    s.add_panel("T right panel", BodyId(5), SizeClass::Large)
        .set_relative(0.5, &scale);

    s.add_rotor("U base", HOME, Some(BodyId(6)));
    s.add_rotor("U elevation", BodyId(6), Some(BodyId(7)));
    s.add_rotor("U roll", BodyId(6), Some(BodyId(7)));
    s.add_panel("U panel", BodyId(7), SizeClass::Large)
        .set_relative(0.5, &scale);
    s
}

#[test]
fn classifies_every_shape_once() {
    let s = farm();
    let mut r = registry();
    assert_eq!(r.initialize(&s), 4);
    assert_eq!(
        layouts(&r),
        vec![
            Layout::SingleAxis,
            Layout::DualParallel,
            Layout::Branching,
            Layout::Gimbal
        ]
    );
}

#[test]
fn dual_parallel_found_from_both_sides_collapses() {
    let mut s = Structure::new(HOME);
    let a = s.add_rotor("A", HOME, Some(BodyId(1)));
    let b = s.add_rotor("B", HOME, Some(BodyId(1)));
    s.add_panel("P", BodyId(1), SizeClass::Large);

    let classifier = Classifier::default();
    let from_a = classifier.classify(&s, &a).unwrap();
    let from_b = classifier.classify(&s, &b).unwrap();
    assert_eq!(from_a.layout(), Layout::DualParallel);
    assert_eq!(from_a.key(), from_b.key());

    let mut r = registry();
    assert_eq!(r.initialize(&s), 1);
    assert_eq!(r.controllers()[0].layout(), Layout::DualParallel);
}

#[test]
fn structure_without_collectors_yields_nothing() {
    let mut s = Structure::new(HOME);
    s.add_rotor("A", HOME, Some(BodyId(1)));
    s.add_rotor("B", HOME, Some(BodyId(2)));
    let mut r = registry();
    assert_eq!(r.initialize(&s), 0);
    assert!(r.is_empty());
}

#[test]
fn excluded_marker_is_configurable() {
    let mut s = Structure::new(HOME);
    s.add_rotor("Tracker #skip", HOME, Some(BodyId(1)));
    s.add_panel("P", BodyId(1), SizeClass::Large);

    let classifier = Classifier::new(DiscoveryConfig {
        exclude_marker: "#skip".to_string(),
    });
    let mut r: Registry<SimRotor, SimPanel> =
        Registry::new(classifier, TrackingConfig::default(), OutputScale::default());
    assert_eq!(r.initialize(&s), 0);
}

#[test]
fn reinitializing_starts_a_fresh_generation() {
    let mut s = Structure::new(HOME);
    let rotor = s.add_rotor("Rotor", HOME, Some(BodyId(1)));
    let panel = s.add_panel("P", BodyId(1), SizeClass::Large);
    let scale = OutputScale::default();
    panel.set_relative(0.3, &scale);

    let mut r = registry();
    r.initialize(&s);
    panel.set_relative(0.5, &scale);
    r.advance(Duration::from_millis(1000));
    assert_eq!(rotor.velocity(), 0.01);

    panel.set_relative(0.6, &scale);
    assert_eq!(r.initialize(&s), 1);
    assert_eq!(rotor.velocity(), 0.0);
    match &r.controllers()[0] {
        Controller::SingleAxis(c) => {
            assert!((c.last_output() - 0.6).abs() < 1e-6);
            assert_eq!(c.cooldown_ms(), 5000.0);
        }
        other => panic!("unexpected {:?}", other.layout()),
    }
}

#[test]
fn stop_all_zeroes_every_actuator() {
    let s = farm();
    let mut r = registry();
    r.initialize(&s);
    assert_eq!(r.active(), 0);
    r.drive(Drive::Advance(Duration::from_millis(1000)));
    assert!(s.rotors().iter().any(|rotor| rotor.is_moving()));
    assert_eq!(r.active(), 4);

    let report = r.drive(Drive::Stop);
    assert!(s.rotors().iter().all(|rotor| !rotor.is_moving()));
    assert_eq!(r.active(), 0);
    assert!(report.contains("IPanel I stopped."));
    assert!(report.contains("UPanel U base stopped."));
}

#[test]
fn two_quick_ticks_never_reverse_twice() {
    let mut s = Structure::new(HOME);
    let rotor = s.add_rotor("Rotor", HOME, Some(BodyId(1)));
    let panel = s.add_panel("P", BodyId(1), SizeClass::Large);
    let scale = OutputScale::default();
    panel.set_relative(0.5, &scale);

    let mut r = registry();
    r.initialize(&s);
    r.advance(Duration::from_millis(1000));
    panel.set_relative(0.45, &scale);
    r.advance(Duration::from_millis(6000));
    assert_eq!(rotor.velocity(), -0.01);

    panel.set_relative(0.40, &scale);
    r.advance(Duration::from_millis(2000));
    panel.set_relative(0.35, &scale);
    r.advance(Duration::from_millis(2000));
    assert_eq!(rotor.velocity(), -0.01);
}

#[test]
fn limited_assemblies_are_reported() {
    let mut s = Structure::new(HOME);
    s.add_limited_rotor("Hinge", HOME, Some(BodyId(1)), Limits::new(-1.5, 1.5));
    s.add_panel("P", BodyId(1), SizeClass::Large)
        .set_relative(0.5, &OutputScale::default());
    let mut r = registry();
    r.initialize(&s);
    let report = r.advance(Duration::from_millis(500));
    assert!(report.starts_with("Limited IPanel Hinge"));
}

#[test]
fn gimbal_roll_torque_forced_to_zero() {
    let s = farm();
    let roll = s
        .rotors()
        .iter()
        .find(|r| r.name() == "U roll")
        .cloned()
        .unwrap();
    let mut r = registry();
    r.initialize(&s);
    assert_eq!(roll.torque(), 0.0);
    r.advance(Duration::from_millis(1000));
    assert_eq!(roll.torque(), 0.0);
    assert_eq!(roll.velocity(), 0.0);
}
