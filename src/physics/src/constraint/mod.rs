pub mod distance;
pub mod ground;

use crate::particle_group::ParticleGroup;

/// A force element acting on the particle group.
pub trait Constraint {
	/// Adds this element's forces to the group's accumulators.
	fn apply(&self, pg: &mut ParticleGroup);

	fn potential(&self, pg: &ParticleGroup) -> f32;
}
