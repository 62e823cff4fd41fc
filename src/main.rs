//! Outbreak Viz - headless runner
//!
//! Plays one simulation for a fixed number of frames and prints the
//! stacked status chart and frame metrics.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;

use outbreak_viz::chart::{StatusCounts, TextChart};
use outbreak_viz::core::error::{Result, VizError};
use outbreak_viz::core::presets;
use outbreak_viz::engine::ReferenceEngine;
use outbreak_viz::render::NullScene;
use outbreak_viz::{SimulationConfig, Stage};

#[derive(Parser, Debug)]
#[command(name = "outbreak-viz")]
#[command(about = "Play an epidemic simulation headlessly and chart it")]
struct Args {
    /// Config file (.json or .toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in preset, used when no config file is given
    #[arg(long, default_value = "particle_shopper")]
    preset: String,

    /// Display frames to run
    #[arg(long, default_value_t = 300)]
    frames: u32,

    /// Ticks stepped per frame
    #[arg(long, default_value_t = 1)]
    speed: u32,

    /// Chart width in samples
    #[arg(long, default_value_t = 72)]
    chart_width: usize,

    /// Chart height in rows
    #[arg(long, default_value_t = 12)]
    chart_rows: usize,

    /// Override the initial seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print preset names and exit
    #[arg(long)]
    list_presets: bool,
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => presets::by_name(&args.preset).ok_or_else(|| {
            VizError::invalid_config(
                "preset",
                format!("unknown preset '{}', try --list-presets", args.preset),
            )
        })?,
    };
    if args.seed.is_some() {
        config.initial_seed = args.seed;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if args.list_presets {
        for name in presets::PRESET_NAMES {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = load_config(&args)?;
    tracing::info!(name = %config.name, frames = args.frames, speed = args.speed, "Starting headless run");

    let chart = Rc::new(RefCell::new(TextChart::new(args.chart_width, args.chart_rows)));
    let mut stage = Stage::new();
    let id = stage.spawn(ReferenceEngine, config, Box::new(NullScene), Box::new(chart.clone()))?;
    stage.set_speed(id, args.speed)?;
    stage.play(id)?;

    for _ in 0..args.frames {
        let summary = stage.run_frame();
        if let Some((_, error)) = summary.failed.into_iter().next() {
            return Err(error);
        }
    }

    let Some(simulation) = stage.get(id) else {
        return Err(VizError::SimulationNotFound(id));
    };
    let counts = StatusCounts::tally(&simulation.state().people);
    let metrics = simulation.metrics();

    println!("{}", chart.borrow().render());
    println!();
    println!("=== {} @ tick {} ===", simulation.name(), simulation.tick());
    println!(
        "susceptible {}  exposed {}  infectious {}  recovered {}",
        counts.susceptible, counts.exposed, counts.infectious, counts.recovered
    );
    println!(
        "frames {}  chart samples {}  presentation failures {}",
        metrics.frames, metrics.chart_samples, metrics.presentation_failures
    );
    println!(
        "avg frame {:.3} ms  max frame {:.3} ms  avg ticks/frame {:.1}",
        metrics.avg_frame_time_ms(),
        metrics.max_frame_time_ms(),
        metrics.avg_ticks_per_frame()
    );

    stage.remove(id)?;
    Ok(())
}
