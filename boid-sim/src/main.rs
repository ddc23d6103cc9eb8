use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use boid_sim::{load_config, validate, Overrides, Scene, Simulation};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boid flocking simulation", long_about = None)]
struct Args {
    /// JSON simulation config; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Fixed time step in seconds
    #[arg(long)]
    dt: Option<f32>,

    /// Seed for spawn positions and tie-breaks
    #[arg(short, long)]
    seed: Option<u64>,

    /// Boids per flock
    #[arg(short, long)]
    boids: Option<usize>,

    /// Write one JSON frame per tick to this file ('-' for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log a summary of every flock each N ticks (0 disables)
    #[arg(long, default_value_t = 60)]
    summary_every: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut config = load_config(args.config.as_deref())?;
    Overrides {
        ticks: args.ticks,
        dt: args.dt,
        seed: args.seed,
        boids: args.boids,
    }
    .apply(&mut config);
    validate(&config).context("Invalid simulation config")?;

    log::info!("Boid simulation starting...");
    log::info!("Arena: {:?}", config.bounds);
    log::info!(
        "Ticks: {} x {:.4}s, seed {}, {} flock(s)",
        config.ticks,
        config.dt,
        config.seed,
        config.flocks.len()
    );

    let scene = Scene::from_config(&config).context("Failed to build scene")?;
    let mut simulation = Simulation::new(scene, config.dt);

    let stats = match args.output.as_deref() {
        Some(path) if path == Path::new("-") => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            simulation.run(config.ticks, Some(&mut out), args.summary_every)?
        }
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut out = BufWriter::new(file);
            simulation.run(config.ticks, Some(&mut out), args.summary_every)?
        }
        None => simulation.run::<io::Sink>(config.ticks, None, args.summary_every)?,
    };

    log::info!(
        "Finished {} ticks ({:.2}s simulated), {} frames written",
        stats.ticks,
        stats.time,
        stats.frames_written
    );

    Ok(())
}
