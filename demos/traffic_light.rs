//! Traffic Light Demo
//!
//! Runs one traffic light and a handful of vehicles that wait for green
//! before crossing.
//!
//! Key concepts:
//! - Background toggle loop publishing phases into a handoff queue
//! - Blocking waits for a target phase
//! - Clean shutdown that releases every waiter
//!
//! Run with: cargo run --example traffic_light [config.json]
//! Set RUST_LOG=phaselight=debug to see every phase change.

use phaselight::config::CycleConfig;
use phaselight::{Phase, TrafficLight};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light Demo ===\n");

    let config = match std::env::args().nth(1) {
        Some(path) => CycleConfig::load(path)?,
        None => CycleConfig::default(),
    };
    println!(
        "Cycle: {}-{} ms, precision {:?}, order {:?}\n",
        config.min_cycle_ms, config.max_cycle_ms, config.precision, config.order
    );

    let light = Arc::new(TrafficLight::with_config(Phase::Red, config)?);
    light.simulate()?;
    let started = Instant::now();

    let vehicles: Vec<_> = (1..=3)
        .map(|vehicle| {
            let light = Arc::clone(&light);
            thread::spawn(move || {
                println!("Vehicle #{vehicle} is waiting at a {} light", light.current_phase());
                match light.wait_for_green() {
                    Ok(()) => println!(
                        "Vehicle #{vehicle} crosses after {:.1}s",
                        started.elapsed().as_secs_f64()
                    ),
                    Err(err) => println!("Vehicle #{vehicle} gave up: {err}"),
                }
            })
        })
        .collect();

    for vehicle in vehicles {
        let _ = vehicle.join();
    }

    light.shutdown()?;

    println!("\nTransitions:");
    for transition in light.history().transitions() {
        println!(
            "  #{} {} -> {} at {}",
            transition.sequence,
            transition.from,
            transition.to,
            transition.timestamp.format("%H:%M:%S%.3f")
        );
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
