use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

const TIME_EPS: f64 = 1e-6;

/// Fixed-step simulation time and draw/stop gating.
///
/// Times are derived from step and draw counters, so the draw schedule
/// only ever moves in whole multiples of the refresh interval. Comparisons
/// ignore rounding below a millionth of a step.
#[derive(Debug, Clone)]
pub struct Clock {
	step_size: f64,
	refresh_interval: f64,
	max_display_time: f64,
	steps: u64,
	draws: u64,
}

impl Clock {
	/// The clock draws on every step until `reset` sets a refresh interval.
	pub fn new(step_size: f64, max_display_time: f64) -> Self {
		Self {
			step_size,
			refresh_interval: 0.0,
			max_display_time,
			steps: 0,
			draws: 0,
		}
	}

	pub fn from_config(config: &SimConfig) -> Self {
		let mut clock = Self::new(config.step_size, config.max_display_time);
		clock.reset(config.refresh_interval);
		clock
	}

	pub fn reset(&mut self, refresh_interval: f64) {
		self.refresh_interval = refresh_interval;
		self.steps = 0;
		self.draws = 0;
	}

	pub fn step_size(&self) -> f64 {
		self.step_size
	}

	pub fn refresh_interval(&self) -> f64 {
		self.refresh_interval
	}

	pub fn simulation_time(&self) -> f64 {
		self.steps as f64 * self.step_size
	}

	pub fn next_display_time(&self) -> f64 {
		(self.draws + 1) as f64 * self.refresh_interval
	}

	pub fn advance_simulation_time(&mut self) {
		self.steps += 1;
	}

	pub fn advance_display_time(&mut self) {
		self.draws += 1;
	}

	fn reached(&self, t: f64) -> bool {
		self.simulation_time() + self.step_size * TIME_EPS >= t
	}

	pub fn is_time_to_draw(&self) -> bool {
		self.reached(self.next_display_time())
	}

	pub fn is_time_to_stop(&self) -> bool {
		self.reached(self.max_display_time)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeModel {
	/// Step as fast as possible.
	#[default]
	VideoRender,
	/// Hold each draw until wall-clock time catches up with simulation time.
	RtFrameLock,
}

/// Wall-clock pacing for draws.
///
/// Pacing is measured from an anchor pairing a wall instant with the
/// simulation time drawn at that instant. Resuming after a pause drops the
/// anchor, so neither paused wall time nor simulation time stepped while
/// paused is charged against the wall clock.
pub struct Pacer {
	model: TimeModel,
	anchor: Option<(Instant, f64)>,
	paused: bool,
}

impl Pacer {
	pub fn new(model: TimeModel) -> Self {
		Self {
			model,
			anchor: None,
			paused: false,
		}
	}

	pub fn model(&self) -> TimeModel {
		self.model
	}

	/// Turns the wall clock on or off.
	pub fn set(&mut self, on: bool) {
		if on == !self.paused {
			return;
		}
		self.paused = !on;
		if on {
			self.anchor = None;
		}
	}

	/// Returns how long the call slept.
	pub fn wait_until(&mut self, simulation_time: f64) -> Duration {
		if self.model == TimeModel::VideoRender || self.paused {
			return Duration::ZERO;
		}
		let (wall, sim) =
			*self.anchor.get_or_insert_with(|| (Instant::now(), simulation_time));
		let target =
			wall + Duration::from_secs_f64((simulation_time - sim).max(0.0));
		let now = Instant::now();
		if target <= now {
			return Duration::ZERO;
		}
		let dt = target - now;
		std::thread::sleep(dt);
		dt
	}
}
