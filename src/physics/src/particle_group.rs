use crate::particle::ParticleTemplate;
use crate::V3;

/// Particle state stored as parallel arrays indexed by particle id.
///
/// Length and order are fixed at construction.
#[derive(Clone, Debug)]
pub struct ParticleGroup {
	pos: Vec<V3>,
	vel: Vec<V3>,
	force: Vec<V3>,
	imass: Vec<f32>,
}

impl ParticleGroup {
	pub fn new(particles: &[ParticleTemplate], vel: V3) -> Self {
		let n = particles.len();
		Self {
			pos: particles.iter().map(|p| p.pos).collect(),
			vel: particles
				.iter()
				.map(|p| if p.is_pinned() { V3::zeros() } else { vel })
				.collect(),
			force: vec![V3::zeros(); n],
			imass: particles.iter().map(|p| p.imass).collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.pos.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pos.is_empty()
	}

	pub fn get_pos(&self, id: usize) -> V3 {
		self.pos[id]
	}

	pub fn get_vel(&self, id: usize) -> V3 {
		self.vel[id]
	}

	pub fn get_imass(&self, id: usize) -> f32 {
		self.imass[id]
	}

	pub fn get_force(&self, id: usize) -> V3 {
		self.force[id]
	}

	pub fn positions(&self) -> &[V3] {
		&self.pos
	}

	pub fn velocities(&self) -> &[V3] {
		&self.vel
	}

	pub fn clear_forces(&mut self) {
		self.force.fill(V3::zeros());
	}

	pub fn add_force(&mut self, id: usize, f: V3) {
		self.force[id] += f;
	}

	/// Adds `m * accel` to every particle with finite mass.
	pub fn add_weight(&mut self, accel: V3) {
		for (f, &imass) in self.force.iter_mut().zip(self.imass.iter()) {
			if imass != 0.0 {
				*f += accel / imass;
			}
		}
	}

	/// Semi-implicit Euler: velocity first, then position from the new
	/// velocity. Pinned particles never move.
	pub fn update(&mut self, dt: f32) {
		for id in 0..self.pos.len() {
			let imass = self.imass[id];
			if imass == 0.0 {
				continue;
			}
			self.vel[id] += self.force[id] * imass * dt;
			self.pos[id] += self.vel[id] * dt;
		}
	}

	pub fn kinetic_energy(&self) -> f32 {
		self.vel
			.iter()
			.zip(self.imass.iter())
			.filter(|(_, &imass)| imass != 0.0)
			.map(|(v, &imass)| 0.5 * v.norm_squared() / imass)
			.sum()
	}

	/// Potential of `m * accel` for every particle with finite mass.
	pub fn weight_potential(&self, accel: V3) -> f32 {
		self.pos
			.iter()
			.zip(self.imass.iter())
			.filter(|(_, &imass)| imass != 0.0)
			.map(|(p, &imass)| -accel.dot(p) / imass)
			.sum()
	}

	pub fn is_finite(&self) -> bool {
		self.pos
			.iter()
			.chain(self.vel.iter())
			.all(|v| v.iter().all(|x| x.is_finite()))
	}
}
