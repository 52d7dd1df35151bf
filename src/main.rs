use anyhow::{Context, Result};
use clap::Parser;
use nalgebra::Isometry3;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use swimmer_control::control_strategies::flailing::FlailingDriver;
use swimmer_control::graphics::Graphics;
use swimmer_control::physics::PhysicsWorld;
use swimmer_control::simulation::Simulation;
use swimmer_control::simulator_thread::run_synced_to_graphics;
use swimmer_control::swimmer::spawn::{make_multibody, make_swimmer};
use swimmer_control::{Character, ReferenceTrajectorySwimmer, SimulationSettings, Stroke, SwimmerConfig};

/// Simulate a swimmer whose joints track reference trajectories.
#[derive(Parser, Debug)]
#[clap(name = "swimmer", version)]
struct Args {
    /// Swimming stroke: crawl or fly.
    #[clap(long, default_value = "crawl")]
    stroke: Stroke,

    /// Seconds per full shoulder rotation.
    #[clap(long, default_value = "2.0")]
    shoulder_period: f32,

    /// Sinusoids per joint trajectory.
    #[clap(long, default_value = "2")]
    basis_count: usize,

    /// Simulation ticks per second.
    #[clap(long, default_value = "60")]
    hz: f32,

    /// Comma-separated control vector. Defaults to all zeros.
    #[clap(long, value_delimiter = ',', allow_hyphen_values = true, conflicts_with = "random")]
    params: Option<Vec<f32>>,

    /// Drive the swimmer with random control vectors instead.
    #[clap(long)]
    random: bool,

    /// Random values are drawn from [-scale, scale].
    #[clap(long, default_value = "1.0")]
    scale: f32,

    /// Seed for --random.
    #[clap(long)]
    seed: Option<u64>,

    /// Draw a new random vector every this many simulated seconds.
    #[clap(long)]
    reshuffle_every: Option<f32>,

    /// Run without a window.
    #[clap(long)]
    headless: bool,

    /// Ticks to run when headless.
    #[clap(long, default_value = "600")]
    steps: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(Args::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = SwimmerConfig {
        stroke: args.stroke,
        shoulder_period: args.shoulder_period,
        basis_count: args.basis_count,
        ..Default::default()
    };
    config.validate()?;
    let settings = SimulationSettings::new(args.hz)?;

    let mut physics = PhysicsWorld::with_timestep(settings.time_step());
    let mut graphics = if args.headless { None } else { Some(Graphics::init()) };

    let index = match graphics.as_mut() {
        Some(graphics) => make_swimmer(&mut physics, graphics, &config, Isometry3::identity()),
        None => make_multibody(&mut physics, &config, Isometry3::identity()),
    };
    let head = index.head;

    let mut character = ReferenceTrajectorySwimmer::new(config, index)?;
    let dims = character.num_control_dimensions();
    let params = args.params.unwrap_or_else(|| vec![0.0; dims]);
    character
        .set_control_params(&params)
        .context("rejected --params")?;
    info!(dims, stroke = %config.stroke, "swimmer ready");

    let mut simulation = Simulation::new(physics, Box::new(character), settings);
    if args.random {
        let driver = FlailingDriver::new(args.seed, args.scale, args.reshuffle_every)
            .context("rejected --scale")?;
        simulation = simulation.with_driver(driver);
    }

    match graphics {
        Some(mut graphics) => {
            graphics.enable_trace(head, Isometry3::identity());
            run_synced_to_graphics(&mut graphics, simulation);
            info!(frames = graphics.frames_drawn(), "window closed");
        }
        None => {
            let torques = simulation.run_headless(args.steps)?;
            let mean_abs = torques.iter().map(|t| t.abs()).sum::<f32>() / torques.len().max(1) as f32;
            info!(
                steps = torques.len(),
                runtime = simulation.runtime(),
                mean_abs_torque = mean_abs,
                "headless run finished"
            );
        }
    }

    Ok(())
}
