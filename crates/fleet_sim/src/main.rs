//! fleet_sim - headless fleet navigation simulator.
//!
//! Loads a scenario (`fleet_sim.ron`, or the path given as the first
//! argument), runs it to completion and prints what every ship did.
//! `fleet_sim --init [path]` writes the default scenario instead.

mod config;
mod fleet;
mod sim;

use anyhow::Result;
use config::SimConfig;
use sim::FleetSim;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1).peekable();
    if args.peek().map(String::as_str) == Some("--init") {
        args.next();
        let path = config::config_path(args.next());
        SimConfig::default().save(&path);
        log::info!("Wrote default scenario to {:?}", path);
        return Ok(());
    }

    let path = config::config_path(args.next());
    let config = SimConfig::load(&path);
    log::info!(
        "Running {:.1}s at {} game hour(s) per second",
        config.duration_seconds,
        config.hours_per_second
    );

    let mut sim = FleetSim::from_config(&config)?;
    let report = sim.run();
    println!("{report}");
    Ok(())
}
