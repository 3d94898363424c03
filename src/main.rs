use std::time::{Duration, Instant};

use chrono::Local;
use log::*;
use sensors::Collector;
use topology::Classifier;
use tracking::Registry;
use tracing_subscriber::EnvFilter;

mod config;
mod dispatch;
mod plant;

use config::Config;
use dispatch::Dispatcher;
use plant::Plant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Tracker starting at {}", Local::now().format("%d/%m/%Y %H:%M:%S"));

    let config = Config::load()?;
    let mut plant = Plant::build(&config.plant, config.collectors)?;
    let mut registry = Registry::new(
        Classifier::new(config.discovery.clone()),
        config.tracking,
        config.collectors,
    );
    let mut dispatcher = Dispatcher::new();

    // CLI arguments win over the configured command
    let cli: Vec<String> = std::env::args().skip(1).collect();
    let command = if cli.is_empty() {
        config.get_command().to_string()
    } else {
        cli.join(" ")
    };

    // ======== Discovery ========
    let report = dispatcher.handle("init", Duration::ZERO, &mut registry, plant.structure());
    info!("{}", report.trim_end());
    if registry.is_empty() {
        warn!("No trackable assemblies found, check [plant] in the configuration");
    }

    // ======== Tracking loop ========
    let tick = config.get_tick();
    let started = Instant::now();
    for n in 0..config.get_ticks() {
        plant.advance(tick);
        let argument = if n == 0 { command.as_str() } else { "" };
        let report = dispatcher.handle(argument, tick, &mut registry, plant.structure());
        debug!("Tick {}:\n{}", n, report.trim_end());

        if n % 60 == 0 {
            let (azimuth, elevation) = plant.sun();
            let best = plant
                .structure()
                .panels()
                .iter()
                .map(|p| p.max_output() / config.collectors.unit_max(p.size_class()))
                .fold(0.0_f32, f32::max);
            info!(
                "Tick {}: sun az {:.3} el {:.3}, best relative output {:.3}, {}/{} active, mode {:?}",
                n,
                azimuth,
                elevation,
                best,
                registry.active(),
                registry.len(),
                dispatcher.mode()
            );
        }
    }

    let report = dispatcher.handle("stop", Duration::ZERO, &mut registry, plant.structure());
    debug!("{}", report.trim_end());
    info!(
        "Simulated {} ticks in {:?}",
        config.get_ticks(),
        started.elapsed()
    );
    Ok(())
}
