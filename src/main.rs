use nbody_engine::{
    DerivedField, Ensemble, Execution, Scenario, Scheme, Simulation, SimulationConfig, TextSink,
};

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "All-pairs N-body gravity simulation", long_about = None)]
struct Args {
    /// YAML run configuration. Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of bodies to simulate.
    #[arg(short = 'n', long)]
    bodies: Option<usize>,

    /// Simulation duration.
    #[arg(short, long)]
    end_time: Option<f64>,

    /// Integration timestep.
    #[arg(short, long)]
    timestep: Option<f64>,

    #[arg(short, long, value_enum)]
    integrator: Option<Scheme>,

    #[arg(long, value_enum)]
    execution: Option<Execution>,

    #[arg(long, value_enum)]
    scenario: Option<Scenario>,

    /// Scalar written next to each position in the snapshot files.
    #[arg(short, long, value_enum)]
    field: Option<DerivedField>,

    /// Seed for the initial-condition generator.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory for snapshot files.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

// load here to keep main clean
fn load_config(args: Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(bodies) = args.bodies {
        config.bodies = bodies;
    }
    if let Some(end_time) = args.end_time {
        config.end_time = end_time;
    }
    if let Some(timestep) = args.timestep {
        config.timestep = timestep;
    }
    if let Some(integrator) = args.integrator {
        config.integrator = integrator;
    }
    if let Some(execution) = args.execution {
        config.execution = execution;
    }
    if let Some(scenario) = args.scenario {
        config.scenario = scenario;
    }
    if let Some(field) = args.field {
        config.field = field;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config(Args::parse())?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let bodies = config.scenario.generate(&mut rng, config.bodies)?;
    let ensemble = Ensemble::from_bodies(&bodies, config.clock())?.with_kernel(config.kernel())?;
    let mut sim = Simulation::new(ensemble, config.integrator)
        .with_field(config.field)
        .with_snapshot_interval(config.snapshot_interval)?;
    log::info!("setup done: {} bodies ({:?})", bodies.len(), config.scenario);

    let mut sink = TextSink::new(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    let start = Instant::now();
    let summary = sim.run(&mut sink)?;
    let elapsed = start.elapsed();

    log::info!(
        "{} steps, {} snapshots in {}, simulated time {}",
        summary.steps,
        summary.snapshots,
        sink.directory().display(),
        summary.elapsed_time,
    );
    log::info!("run duration (ms): {}", elapsed.as_secs_f64() * 1e3);
    Ok(())
}
