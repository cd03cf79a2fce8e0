use clap::Parser;
use shoal::constants::FIXED_TIMESTEP;
use shoal::{SimulationConfig, SimulationState};
use std::{fs, path::PathBuf, time::Instant};

/// Runs the flock headless and logs how the population fares.
#[derive(Debug, Parser)]
#[command(name = "shoal", version)]
struct Args {
    /// JSON configuration; omitted fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of ticks to run.
    #[arg(long, default_value_t = 2_000)]
    ticks: u64,
    /// Length of one tick.
    #[arg(long, default_value_t = FIXED_TIMESTEP)]
    dt: f32,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    boids: Option<usize>,
    #[arg(long)]
    predators: Option<usize>,
    /// Log a status line every N ticks (0 disables).
    #[arg(long, default_value_t = 250)]
    report_every: u64,
}

fn load_config(args: &Args) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }
    if let Some(boids) = args.boids {
        config.num_boids = boids;
    }
    if let Some(predators) = args.predators {
        config.num_predators = predators;
    }
    Ok(config)
}

// --- Main Function ---
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;
    let mut simulation_state = SimulationState::new(config)?;

    let started = Instant::now();
    let mut last_report_time = Instant::now();
    let mut ticks_since_last_report = 0u64;

    for _ in 0..args.ticks {
        let report = simulation_state.step(args.dt);
        ticks_since_last_report += 1;

        if args.report_every > 0 && report.tick % args.report_every == 0 {
            let elapsed_secs = last_report_time.elapsed().as_secs_f64();
            let ticks_per_sec = if elapsed_secs > 0.0 {
                ticks_since_last_report as f64 / elapsed_secs
            } else {
                0.0
            };
            log::info!(
                "Tick {} - boids: {}, predators: {}, caught: {} - {:.1} ticks/s",
                report.tick,
                report.boids_remaining,
                simulation_state.predators().len(),
                simulation_state.total_caught(),
                ticks_per_sec
            );
            last_report_time = Instant::now();
            ticks_since_last_report = 0;
        }

        if report.boids_remaining == 0 {
            log::info!("Flock wiped out at tick {}", report.tick);
            break;
        }
    }

    println!(
        "{} ticks in {:.2}s: {} boids left, {} caught over {} catch events",
        simulation_state.tick(),
        started.elapsed().as_secs_f64(),
        simulation_state.boids().len(),
        simulation_state.total_caught(),
        simulation_state.catch_history().len()
    );
    Ok(())
}
