use std::time::Duration;

use motion::{Actuator, BodyId, Limits};
use sensors::{Collector, OutputScale, SizeClass};
use serde::{Deserialize, Serialize};
use topology::{Discovery, Structure};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotorEntry {
    pub name: String,
    pub base: u32,
    pub top: Option<u32>,
    pub lower: Option<f32>,
    pub upper: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelEntry {
    pub name: String,
    pub body: u32,
    pub size: SizeClass,
}

/// Mechanical layout and sun path of the simulated site. Angles in radians,
/// rates in radians per second.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    pub home: u32,
    pub sun_azimuth: f32,
    pub sun_elevation: f32,
    pub azimuth_rate: f32,
    pub elevation_rate: f32,
    pub rotors: Vec<RotorEntry>,
    pub panels: Vec<PanelEntry>,
}

/// Simulated site: the rigid-body structure plus a sun sweeping across the sky.
pub struct Plant {
    structure: Structure,
    scale: OutputScale,
    sun_azimuth: f32,
    sun_elevation: f32,
    azimuth_rate: f32,
    elevation_rate: f32,
}

impl Plant {
    pub fn build(config: &PlantConfig, scale: OutputScale) -> anyhow::Result<Self> {
        let mut structure = Structure::new(BodyId(config.home));
        for entry in &config.rotors {
            let limits = Limits::new(
                entry.lower.unwrap_or(f32::NEG_INFINITY),
                entry.upper.unwrap_or(f32::INFINITY),
            );
            if limits.lower >= limits.upper {
                anyhow::bail!(
                    "rotor '{}': lower limit {} is not below upper limit {}",
                    entry.name,
                    limits.lower,
                    limits.upper
                );
            }
            structure.add_limited_rotor(
                &entry.name,
                BodyId(entry.base),
                entry.top.map(BodyId),
                limits,
            );
        }
        for entry in &config.panels {
            structure.add_panel(&entry.name, BodyId(entry.body), entry.size);
        }
        log::info!(
            "Plant built: {} rotors, {} panels",
            structure.rotors().len(),
            structure.panels().len()
        );

        let plant = Plant {
            structure,
            scale,
            sun_azimuth: config.sun_azimuth,
            sun_elevation: config.sun_elevation,
            azimuth_rate: config.azimuth_rate,
            elevation_rate: config.elevation_rate,
        };
        plant.illuminate();
        Ok(plant)
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn sun(&self) -> (f32, f32) {
        (self.sun_azimuth, self.sun_elevation)
    }

    /// Move every joint and the sun by `dt`, then refresh the panel readings.
    pub fn advance(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();
        self.structure.step(secs);
        self.sun_azimuth += self.azimuth_rate * secs;
        self.sun_elevation += self.elevation_rate * secs;
        self.illuminate();
    }

    fn illuminate(&self) {
        for panel in self.structure.panels() {
            panel.set_relative(self.exposure(panel.body()), &self.scale);
        }
    }

    /// Fraction of full output reaching a panel on `body`. The driving joint
    /// nearest the home body swings in azimuth, the next one in elevation.
    /// Axes a panel lacks stay at angle zero.
    pub fn exposure(&self, body: BodyId) -> f32 {
        let home = self.structure.home_body();
        let mut chain = Vec::new();
        let mut current = body;
        while current != home && chain.len() < self.structure.rotors().len() {
            let Some(driver) = self.structure.driver_of(current) else {
                break;
            };
            chain.push(driver.angle());
            current = driver.base_body();
        }
        chain.reverse();

        let azimuth = chain.first().copied().unwrap_or(0.0);
        let elevation = chain.get(1).copied().unwrap_or(0.0);
        let factor = (azimuth - self.sun_azimuth).cos() * (elevation - self.sun_elevation).cos();
        factor.max(0.0)
    }
}
