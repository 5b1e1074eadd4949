use std::ops::ControlFlow;
use std::time::Instant;

use physics::config::SimConfig;
use physics::world::World;

fn main() {
	let config = SimConfig {
		subdivisions: 4,
		max_display_time: 20.0,
		..Default::default()
	};
	let start = Instant::now();
	let mut world = World::new(&config);
	let frames = world.run(|_, _| ControlFlow::Continue(()));
	let time = world.clock().simulation_time();
	let duration = start.elapsed().as_secs_f64();
	println!(
		"{} particles, {} frames: {:.3}% of real time",
		world.solver().particle_count(),
		frames,
		duration / time * 100.0
	);
}
