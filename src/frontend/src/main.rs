// hexdrop: headless driver, logs each draw

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::mpsc::channel;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use physics::config::SimConfig;
use physics::time_manager::TimeModel;
use physics::world::World;
use protocol::pr_model::PrModel;
use protocol::record::Recorder;
use protocol::user_event::{UpdateInfo, UserEvent};
use protocol::Message;

mod frame_log;

#[derive(Parser)]
#[command(name = "hexdrop")]
#[command(version, about = "Drop an elastic hexahedron onto a ground plane")]
struct Cli {
	/// Simulation config (TOML). Defaults apply to missing keys.
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Step the solver on its own thread and consume snapshots here.
	#[arg(long)]
	threaded: bool,

	/// Pace draws to wall-clock time.
	#[arg(long)]
	realtime: bool,

	/// Write every drawn frame to this file.
	#[arg(short, long)]
	record: Option<PathBuf>,

	/// Override the run duration in simulated seconds.
	#[arg(long)]
	duration: Option<f64>,
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let cli = Cli::parse();
	if let Err(e) = run(cli) {
		error!("{e}");
		std::process::exit(1);
	}
}

fn load_config(cli: &Cli) -> Result<SimConfig, Box<dyn std::error::Error>> {
	let mut config = match &cli.config {
		Some(path) => {
			info!(path = %path.display(), "loading config");
			SimConfig::load(path)?
		}
		None => SimConfig::default(),
	};
	if let Some(duration) = cli.duration {
		config.max_display_time = duration;
	}
	if cli.realtime {
		config.time_model = TimeModel::RtFrameLock;
	}
	config.validate()?;
	Ok(config)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
	let config = load_config(&cli)?;
	let mut recorder = match &cli.record {
		Some(path) => Some(Recorder::create(path)?),
		None => None,
	};

	let mut on_frame = |model: &PrModel, info: &UpdateInfo| {
		frame_log::report(model, info);
		match recorder.as_mut() {
			Some(recorder) => recorder
				.write_msg(&Message::WorldUpdate(model.clone(), *info)),
			None => Ok(()),
		}
	};

	let frames = if cli.threaded {
		let world = World::new(&config);
		let (tx, rx) = channel();
		let (_ctx, crx) = channel();
		let handle = std::thread::spawn(move || world.run_thread(tx, crx));
		for event in rx.iter() {
			let UserEvent::Update(model, info) = event;
			on_frame(&model, &info)?;
		}
		handle
			.join()
			.map_err(|_| "simulation thread panicked")??
	} else {
		let mut world = World::new(&config);
		let mut failure = None;
		let frames = world.run(|model, info| match on_frame(model, info) {
			Ok(()) => ControlFlow::Continue(()),
			Err(e) => {
				failure = Some(e);
				ControlFlow::Break(())
			}
		});
		if let Some(e) = failure {
			return Err(e.into());
		}
		frames
	};

	if let Some(recorder) = recorder {
		info!(frames = recorder.frames(), "recording written");
		recorder.finish()?;
	}
	info!(frames, "done");
	Ok(())
}
