use tracing::{info, warn};

use crate::config::SimConfig;
use crate::constraint::distance::DistanceConstraint;
use crate::constraint::ground::GroundContact;
use crate::constraint::Constraint;
use crate::particle_group::ParticleGroup;
use crate::physical_model::PhysicalModel;
use crate::V3;
use protocol::pr_model::PrModel;

pub struct Solver {
	dt: f32,
	gravity: V3,
	pg: ParticleGroup,
	springs: Vec<DistanceConstraint>,
	ground: GroundContact,
	indices: Vec<[u32; 3]>,
	diverged: bool,
}

impl Solver {
	pub fn new(config: &SimConfig) -> Self {
		let model = PhysicalModel::from_config(config);
		Self::from_model(model, config)
	}

	/// Builds a solver around an arbitrary rest shape, taking coefficients
	/// from `config`.
	pub fn from_model(model: PhysicalModel, config: &SimConfig) -> Self {
		let pg = ParticleGroup::new(
			&model.particles,
			V3::from(config.initial_velocity),
		);
		let springs: Vec<DistanceConstraint> = model
			.constraints
			.iter()
			.map(|ct| {
				DistanceConstraint::from_template(ct)
					.with_stiffness(config.spring_stiffness)
					.with_damping(config.spring_damping)
			})
			.collect();
		let ground = GroundContact::new(config.ground_height)
			.with_stiffness(config.contact_stiffness)
			.with_damping(config.contact_damping);
		info!(
			particles = pg.len(),
			springs = springs.len(),
			triangles = model.faces.len(),
			pinned = config.pinned.len(),
			"built body"
		);
		Self {
			dt: config.step_size as f32,
			gravity: V3::new(0., 0., -config.gravity),
			pg,
			springs,
			ground,
			indices: model.faces,
			diverged: false,
		}
	}

	pub fn particle_count(&self) -> usize {
		self.pg.len()
	}

	pub fn spring_count(&self) -> usize {
		self.springs.len()
	}

	pub fn springs(&self) -> &[DistanceConstraint] {
		&self.springs
	}

	/// Positions in particle order. Length and order never change.
	pub fn get_vertices(&self) -> &[V3] {
		self.pg.positions()
	}

	pub fn get_velocities(&self) -> &[V3] {
		self.pg.velocities()
	}

	/// Surface triangles into `get_vertices`, fixed for the whole run.
	pub fn get_indices(&self) -> &[[u32; 3]] {
		&self.indices
	}

	/// Forces accumulated by the last step.
	pub fn get_force(&self, id: usize) -> V3 {
		self.pg.get_force(id)
	}

	pub fn compute_next_state(&mut self) {
		self.pg.clear_forces();
		for spring in self.springs.iter() {
			spring.apply(&mut self.pg);
		}
		self.pg.add_weight(self.gravity);
		self.ground.apply(&mut self.pg);
		self.pg.update(self.dt);

		if !self.diverged && !self.pg.is_finite() {
			self.diverged = true;
			warn!(
				dt = self.dt,
				"non-finite particle state, step size too large for the stiffness"
			);
		}
	}

	pub fn kinetic_energy(&self) -> f32 {
		self.pg.kinetic_energy()
	}

	pub fn potential_energy(&self) -> f32 {
		let springs: f32 =
			self.springs.iter().map(|s| s.potential(&self.pg)).sum();
		springs
			+ self.pg.weight_potential(self.gravity)
			+ self.ground.potential(&self.pg)
	}

	pub fn total_energy(&self) -> f32 {
		self.kinetic_energy() + self.potential_energy()
	}

	/// Owned snapshot of the current surface.
	pub fn pr_model(&self) -> PrModel {
		PrModel::new(self.get_vertices(), &self.indices)
	}

	/// Refreshes the vertices of an existing snapshot in place.
	pub fn copy_vertices_into(&self, model: &mut PrModel) {
		model.update_vertices(self.get_vertices());
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_free_fall_one_step() {
		let config = SimConfig {
			drop_height: 5.0,
			..Default::default()
		};
		let mut solver = Solver::new(&config);
		let before = solver.get_vertices().to_vec();
		solver.compute_next_state();
		let dt = config.step_size as f32;
		for v in solver.get_velocities() {
			assert!((v[2] + config.gravity * dt).abs() < 1e-6);
		}
		for (p, q) in solver.get_vertices().iter().zip(before.iter()) {
			let dz = p[2] - q[2];
			assert!((dz + config.gravity * dt * dt).abs() < 1e-5);
		}
	}

	#[test]
	fn test_snapshot_matches_vertices() {
		let solver = Solver::new(&SimConfig::default());
		let model = solver.pr_model();
		assert_eq!(model.vertices.len(), solver.particle_count());
		assert_eq!(model.indices, solver.get_indices());
		for (a, b) in model.vertices.iter().zip(solver.get_vertices()) {
			assert_eq!(V3::from(*a), *b);
		}
	}

	#[test]
	fn test_energy_at_rest() {
		let solver = Solver::new(&SimConfig::weightless());
		assert_eq!(solver.total_energy(), 0.0);
	}
}
