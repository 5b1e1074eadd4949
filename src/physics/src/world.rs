use std::ops::ControlFlow;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use tracing::{debug, info};

use crate::config::SimConfig;
use crate::controller_message::ControllerMessage;
use crate::error::{PhysicsError, PhysicsResult};
use crate::solver::Solver;
use crate::time_manager::{Clock, Pacer};
use protocol::pr_model::PrModel;
use protocol::user_event::{UpdateInfo, UserEvent};

const PAUSE_POLL: Duration = Duration::from_millis(10);

/// Solver and clock driven at a fixed step, publishing a copy of the
/// surface whenever a draw is due.
pub struct World {
	solver: Solver,
	clock: Clock,
	pacer: Pacer,
	// display copy, refreshed only between completed steps
	display: PrModel,
	frame: u64,
}

impl World {
	pub fn new(config: &SimConfig) -> Self {
		let solver = Solver::new(config);
		let display = solver.pr_model();
		Self {
			solver,
			clock: Clock::from_config(config),
			pacer: Pacer::new(config.time_model),
			display,
			frame: 0,
		}
	}

	pub fn solver(&self) -> &Solver {
		&self.solver
	}

	pub fn clock(&self) -> &Clock {
		&self.clock
	}

	pub fn frames(&self) -> u64 {
		self.frame
	}

	fn refresh_display(&mut self) -> UpdateInfo {
		let simulation_time = self.clock.simulation_time();
		self.pacer.wait_until(simulation_time);
		self.solver.copy_vertices_into(&mut self.display);
		let info = UpdateInfo {
			frame: self.frame,
			simulation_time,
		};
		debug!(frame = info.frame, time = simulation_time, "draw");
		info
	}

	fn finish_draw(&mut self) {
		self.clock.advance_display_time();
		self.frame += 1;
	}

	fn tick(&mut self) {
		self.solver.compute_next_state();
		self.clock.advance_simulation_time();
	}

	/// Runs on the calling thread until the clock says stop or `on_draw`
	/// breaks. Returns the number of draws.
	pub fn run<F>(&mut self, mut on_draw: F) -> u64
	where
		F: FnMut(&PrModel, &UpdateInfo) -> ControlFlow<()>,
	{
		let start_frame = self.frame;
		while !self.clock.is_time_to_stop() {
			if self.clock.is_time_to_draw() {
				let info = self.refresh_display();
				let flow = on_draw(&self.display, &info);
				self.finish_draw();
				if flow.is_break() {
					info!(frame = info.frame, "stopped by consumer");
					break;
				}
			}
			self.tick();
		}
		self.frame - start_frame
	}

	/// Runs the loop on the current thread, sending an owned snapshot per
	/// draw through `tx`. The receiver never shares memory with the live
	/// particle state.
	pub fn run_thread(
		mut self,
		tx: Sender<UserEvent>,
		rx: Receiver<ControllerMessage>,
	) -> PhysicsResult<u64> {
		let mut paused = false;
		let mut forward = false;
		loop {
			for msg in rx.try_iter() {
				match msg {
					ControllerMessage::TogglePause => {
						paused = !paused;
						forward = false;
						self.pacer.set(!paused);
						info!(paused, "toggle pause");
					}
					ControllerMessage::FrameForward => {
						if paused {
							forward = true;
						}
					}
					ControllerMessage::Stop => {
						info!(frames = self.frame, "stop requested");
						return Ok(self.frame);
					}
				}
			}
			if self.clock.is_time_to_stop() {
				break;
			}
			if paused && !forward {
				std::thread::sleep(PAUSE_POLL);
				continue;
			}
			if self.clock.is_time_to_draw() {
				let info = self.refresh_display();
				let event = UserEvent::Update(self.display.clone(), info);
				if tx.send(event).is_err() {
					return Err(PhysicsError::Disconnected);
				}
				self.finish_draw();
				forward = false;
			}
			self.tick();
		}
		info!(
			frames = self.frame,
			time = self.clock.simulation_time(),
			"run finished"
		);
		Ok(self.frame)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::time_manager::TimeModel;
	use std::sync::mpsc::channel;

	fn short() -> SimConfig {
		SimConfig {
			step_size: 0.01,
			refresh_interval: 0.1,
			max_display_time: 1.0,
			drop_height: 10.0,
			..Default::default()
		}
	}

	#[test]
	fn test_run_draw_count() {
		let mut world = World::new(&short());
		let mut times = vec![];
		let frames = world.run(|_, info| {
			times.push(info.simulation_time);
			ControlFlow::Continue(())
		});
		// 0.1 .. 0.9, the stop check wins at 1.0
		assert_eq!(frames, 9);
		assert_eq!(times.len(), 9);
		for (k, t) in times.iter().enumerate() {
			assert!((t - 0.1 * (k + 1) as f64).abs() < 1e-9);
		}
		assert!(world.clock().is_time_to_stop());
	}

	#[test]
	fn test_run_break() {
		let mut world = World::new(&short());
		let frames = world.run(|_, info| {
			if info.frame == 2 {
				ControlFlow::Break(())
			} else {
				ControlFlow::Continue(())
			}
		});
		assert_eq!(frames, 3);
		assert!(!world.clock().is_time_to_stop());
	}

	#[test]
	fn test_run_thread_publishes_snapshots() {
		let world = World::new(&short());
		let (tx, rx) = channel();
		let (_ctx, crx) = channel();
		let handle = std::thread::spawn(move || world.run_thread(tx, crx));
		let events: Vec<UserEvent> = rx.iter().collect();
		let frames = handle.join().unwrap().unwrap();
		assert_eq!(frames, 9);
		assert_eq!(events.len(), 9);
		let mut last_z = f32::INFINITY;
		for (k, UserEvent::Update(model, info)) in events.iter().enumerate() {
			assert_eq!(info.frame, k as u64);
			assert_eq!(model.vertices.len(), 8);
			assert_eq!(model.indices.len(), 12);
			// still falling freely
			let z = model.lowest().unwrap();
			assert!(z < last_z);
			last_z = z;
		}
	}

	#[test]
	fn test_run_thread_stop() {
		let config = SimConfig {
			max_display_time: 1.0e6,
			..short()
		};
		let world = World::new(&config);
		let (tx, rx) = channel();
		let (ctx, crx) = channel();
		let handle = std::thread::spawn(move || world.run_thread(tx, crx));
		let first = rx.recv().unwrap();
		assert!(matches!(first, UserEvent::Update(_, UpdateInfo { frame: 0, .. })));
		ctx.send(ControllerMessage::Stop).unwrap();
		let frames = handle.join().unwrap().unwrap();
		assert!(frames >= 1);
	}

	fn frame_of(event: &UserEvent) -> u64 {
		let UserEvent::Update(_, info) = event;
		info.frame
	}

	#[test]
	fn test_run_thread_pause_forward_resume() {
		// paced so the run is still going when the controls arrive
		let config = SimConfig {
			step_size: 0.001,
			refresh_interval: 0.01,
			max_display_time: 0.5,
			time_model: TimeModel::RtFrameLock,
			..short()
		};
		let world = World::new(&config);
		let (tx, rx) = channel();
		let (ctx, crx) = channel();
		let handle = std::thread::spawn(move || world.run_thread(tx, crx));
		let settle = Duration::from_millis(100);

		let mut frames = vec![frame_of(&rx.recv().unwrap())];
		ctx.send(ControllerMessage::TogglePause).unwrap();
		std::thread::sleep(settle);
		frames.extend(rx.try_iter().map(|e| frame_of(&e)));
		let paused_at = *frames.last().unwrap();
		std::thread::sleep(settle);
		assert!(rx.try_recv().is_err(), "published while paused");

		ctx.send(ControllerMessage::FrameForward).unwrap();
		let event = rx.recv_timeout(Duration::from_secs(1)).unwrap();
		assert_eq!(frame_of(&event), paused_at + 1);
		frames.push(frame_of(&event));
		std::thread::sleep(settle);
		assert!(rx.try_recv().is_err(), "forwarded more than one frame");

		ctx.send(ControllerMessage::TogglePause).unwrap();
		frames.extend(rx.iter().map(|e| frame_of(&e)));
		let total = handle.join().unwrap().unwrap();
		// draws at 0.01 .. 0.49
		assert_eq!(total, 49);
		assert_eq!(frames, (0..49).collect::<Vec<u64>>());
	}

	#[test]
	fn test_frame_forward_ignored_while_running() {
		let world = World::new(&short());
		let (tx, rx) = channel();
		let (ctx, crx) = channel();
		ctx.send(ControllerMessage::FrameForward).unwrap();
		let frames = world.run_thread(tx, crx).unwrap();
		assert_eq!(frames, 9);
		assert_eq!(rx.try_iter().count(), 9);
	}

	#[test]
	fn test_run_thread_consumer_gone() {
		let world = World::new(&short());
		let (tx, rx) = channel();
		let (_ctx, crx) = channel();
		drop(rx);
		let result = world.run_thread(tx, crx);
		assert!(matches!(result, Err(PhysicsError::Disconnected)));
	}
}
