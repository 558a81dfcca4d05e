use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trafico::Scenario;

#[derive(Debug, Parser)]
#[command(author, version, about = "headless traffic simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/crossing.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses the scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the time-compression factor (1..=6)
    #[arg(long)]
    time_scale: Option<u8>,

    /// Write collision statistics to this file as JSON
    #[arg(long)]
    stats_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut scenario = Scenario::load(&cli.scenario)?;
    if let Some(factor) = cli.time_scale {
        scenario.time_scale = factor;
    }
    let ticks = cli.ticks.unwrap_or(scenario.ticks);
    let mut sim = scenario.build()?;
    let dt = sim.tick_seconds();

    info!(
        scenario = %scenario.name,
        ticks,
        time_scale = scenario.time_scale,
        dt_s = dt,
        "starting simulation"
    );

    let mut spawned = 0;
    let mut exited = 0;
    for _ in 0..ticks {
        let summary = sim.step(dt);
        spawned += summary.spawned;
        exited += summary.exited;
    }

    info!(
        elapsed_s = sim.elapsed(),
        spawned,
        exited,
        active = sim.agents().len(),
        collisions = sim.stats().total(),
        "simulation finished"
    );

    if sim.stats().is_empty() {
        println!("no collisions recorded");
    } else {
        println!("collisions by tag pair:");
        for ((tag_a, tag_b), count) in sim.stats().iter() {
            println!("  {tag_a} / {tag_b}: {count:.1}");
        }
    }

    if let Some(path) = cli.stats_json {
        let rows = sim.stats().rows();
        let json = serde_json::to_string_pretty(&rows)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write stats to {}", path.display()))?;
        println!("stats written to {}", path.display());
    }

    Ok(())
}
