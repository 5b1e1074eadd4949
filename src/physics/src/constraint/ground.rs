use crate::config::{DEFAULT_CONTACT_DAMPING, DEFAULT_CONTACT_STIFFNESS};
use crate::constraint::Constraint;
use crate::particle_group::ParticleGroup;

/// Penalty contact with the horizontal plane `z = height`.
///
/// A particle below the plane is pushed up in proportion to its depth and
/// damped against its vertical velocity. Particles on or above the plane
/// are untouched.
#[derive(Clone, Debug)]
pub struct GroundContact {
	pub height: f32,
	pub stiffness: f32,
	pub damping: f32,
}

impl GroundContact {
	/// Starts from the `SimConfig` default coefficients.
	pub fn new(height: f32) -> Self {
		Self {
			height,
			stiffness: DEFAULT_CONTACT_STIFFNESS,
			damping: DEFAULT_CONTACT_DAMPING,
		}
	}

	pub fn with_stiffness(mut self, k: f32) -> Self {
		self.stiffness = k;
		self
	}

	pub fn with_damping(mut self, c: f32) -> Self {
		self.damping = c;
		self
	}

	pub fn depth(&self, z: f32) -> f32 {
		(self.height - z).max(0.0)
	}
}

impl Constraint for GroundContact {
	fn apply(&self, pg: &mut ParticleGroup) {
		for id in 0..pg.len() {
			let pos = pg.get_pos(id);
			if pos[2] >= self.height {
				continue;
			}
			let depth = self.height - pos[2];
			let vz = pg.get_vel(id)[2];
			let fz = self.stiffness * depth - self.damping * vz;
			pg.add_force(id, crate::V3::new(0., 0., fz));
		}
	}

	fn potential(&self, pg: &ParticleGroup) -> f32 {
		pg.positions()
			.iter()
			.map(|p| {
				let d = self.depth(p[2]);
				0.5 * self.stiffness * d * d
			})
			.sum()
	}
}
