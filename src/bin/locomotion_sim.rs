use anyhow::Result;
use clap::Parser;
use gait_controller::body_config::BodyConfig;
use gait_controller::ground::{GroundQuery, HeightMap};
use gait_controller::motion_controller::body_motion::BodyPose;
use gait_controller::motion_controller::gait::GaitType;
use gait_controller::motion_controller::{LocomotionController, PerLegOutput, StepEvent};
use gait_controller::{configuration, utilities};
use nalgebra::Vector3;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::*;

/// Run the locomotion controller headless and print every tick as a json line
#[derive(Parser)]
#[command(author, version)]
struct Args {
    /// Sets path to body config file (.toml or .yaml)
    /// If unset uses the bundled hexapod.
    #[arg(long)]
    body_config: Option<PathBuf>,
    /// Use the bundled quadruped instead of the hexapod
    #[arg(long, conflicts_with = "body_config")]
    quadruped: bool,
    /// Sets path to controller settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Gait to start with
    #[arg(short, long)]
    gait: Option<GaitType>,
    /// Gait to switch to half way through the run
    #[arg(long)]
    switch_gait: Option<GaitType>,
    /// Forward command in [-1, 1]
    #[arg(short, long, default_value_t = 1.0, allow_hyphen_values = true)]
    forward: f32,
    /// Turn command in [-1, 1], positive turns left
    #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
    turn: f32,
    /// Body height offset applied as posture
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    lift_body: f32,
    #[arg(long, default_value_t = 250)]
    ticks: usize,
    /// Tick duration in seconds
    #[arg(long, default_value_t = 0.02)]
    dt: f32,
    /// Height map (.yaml or .json) the feet adapt to
    #[arg(long)]
    height_map: Option<PathBuf>,
    /// Sets the level of verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct TickRecord<'a> {
    tick: usize,
    time: f32,
    gait: GaitType,
    pose: &'a BodyPose,
    legs: &'a [PerLegOutput],
    step_events: &'a [StepEvent],
}

fn main() -> Result<()> {
    let args: Args = Args::parse();
    utilities::setup_tracing(args.verbose);
    info!("Started locomotion simulation");

    let body_config = match (&args.body_config, args.quadruped) {
        (Some(path), _) => BodyConfig::load(path)?,
        (None, true) => BodyConfig::quadruped(),
        (None, false) => BodyConfig::hexapod(),
    };
    let mut settings = configuration::get_configuration(&args.config)?;
    if args.gait.is_some() {
        settings.initial_gait = args.gait;
    }
    let ground = args
        .height_map
        .as_ref()
        .map(|path| HeightMap::load(path))
        .transpose()?;

    let mut controller = LocomotionController::new(body_config, settings)?;
    if args.lift_body != 0.0 {
        controller.set_body_posture_euler(Vector3::new(0.0, 0.0, args.lift_body), Vector3::zeros());
    }

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut time = 0.0;
    for tick in 0..args.ticks {
        if tick == args.ticks / 2 {
            if let Some(gait) = args.switch_gait {
                controller.change_gait(gait)?;
            }
        }
        let mut outputs = controller.tick(args.dt, args.forward, args.turn);
        if let Some(ground) = &ground {
            outputs = controller.adapt_to_ground(ground as &dyn GroundQuery);
        }
        time += args.dt;
        let record = TickRecord {
            tick,
            time,
            gait: controller.current_gait(),
            pose: controller.pose(),
            legs: &outputs,
            step_events: controller.step_events(),
        };
        serde_json::to_writer(&mut writer, &record)?;
        writeln!(writer)?;
    }
    info!(
        "Finished {} ticks at {:?}",
        args.ticks,
        controller.pose().position
    );
    Ok(())
}
