use crate::config::{DEFAULT_SPRING_DAMPING, DEFAULT_SPRING_STIFFNESS};
use crate::constraint::Constraint;
use crate::particle_group::ParticleGroup;

#[derive(Clone, Debug, PartialEq)]
pub struct DistanceConstraintTemplate {
	pub ps: [usize; 2],
	pub l0: f32,
}

/// Damped spring between two particles.
#[derive(Clone, Debug)]
pub struct DistanceConstraint {
	ps: [usize; 2],
	l0: f32,
	stiffness: f32,
	damping: f32,
}

impl DistanceConstraint {
	pub fn new(pg: &ParticleGroup, p1: usize, p2: usize) -> Self {
		let l0 = (pg.get_pos(p1) - pg.get_pos(p2)).magnitude();
		Self::new_with_l0(p1, p2, l0)
	}

	/// Starts from the `SimConfig` default coefficients.
	pub fn new_with_l0(p1: usize, p2: usize, l0: f32) -> Self {
		Self {
			ps: [p1, p2],
			l0,
			stiffness: DEFAULT_SPRING_STIFFNESS,
			damping: DEFAULT_SPRING_DAMPING,
		}
	}

	pub fn from_template(template: &DistanceConstraintTemplate) -> Self {
		Self::new_with_l0(template.ps[0], template.ps[1], template.l0)
	}

	pub fn with_stiffness(mut self, k: f32) -> Self {
		self.stiffness = k;
		self
	}

	pub fn with_damping(mut self, c: f32) -> Self {
		self.damping = c;
		self
	}

	pub fn particles(&self) -> [usize; 2] {
		self.ps
	}

	pub fn rest_length(&self) -> f32 {
		self.l0
	}

	pub fn stiffness(&self) -> f32 {
		self.stiffness
	}

	pub fn damping(&self) -> f32 {
		self.damping
	}
}

impl Constraint for DistanceConstraint {
	fn apply(&self, pg: &mut ParticleGroup) {
		let [id1, id2] = self.ps;
		let dp = pg.get_pos(id1) - pg.get_pos(id2);
		let l = dp.magnitude();
		// coincident particles have no direction to push along
		if !l.is_normal() {
			return;
		}
		let dir = dp / l;
		let dv = pg.get_vel(id1) - pg.get_vel(id2);
		let magnitude =
			self.stiffness * (l - self.l0) + self.damping * dv.dot(&dir);
		let f = -magnitude * dir;
		pg.add_force(id1, f);
		pg.add_force(id2, -f);
	}

	fn potential(&self, pg: &ParticleGroup) -> f32 {
		let [id1, id2] = self.ps;
		let dl = (pg.get_pos(id1) - pg.get_pos(id2)).magnitude() - self.l0;
		0.5 * self.stiffness * dl * dl
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::particle::ParticleTemplate;
	use crate::V3;

	fn pair(x: f32, v: V3) -> ParticleGroup {
		let mut pg = ParticleGroup::new(
			&[
				ParticleTemplate::new(1.0, V3::zeros()),
				ParticleTemplate::new(1.0, V3::new(x, 0., 0.)),
			],
			V3::zeros(),
		);
		if v != V3::zeros() {
			pg.add_force(1, v);
			pg.update(1.0);
			pg.clear_forces();
		}
		pg
	}

	#[test]
	fn test_rest_length_from_positions() {
		let pg = pair(2.0, V3::zeros());
		let dc = DistanceConstraint::new(&pg, 0, 1);
		assert_eq!(dc.rest_length(), 2.0);
		let mut pg = pg;
		dc.apply(&mut pg);
		assert_eq!(pg.get_force(0), V3::zeros());
		assert_eq!(pg.get_force(1), V3::zeros());
		assert_eq!(dc.potential(&pg), 0.0);
	}

	#[test]
	fn test_extension_pulls_together() {
		let mut pg = pair(1.5, V3::zeros());
		let dc = DistanceConstraint::new_with_l0(0, 1, 1.0).with_stiffness(10.0);
		dc.apply(&mut pg);
		assert_eq!(pg.get_force(0), V3::new(5., 0., 0.));
		assert_eq!(pg.get_force(1), V3::new(-5., 0., 0.));
		assert_eq!(dc.potential(&pg), 1.25);
	}

	#[test]
	fn test_compression_pushes_apart() {
		let mut pg = pair(0.5, V3::zeros());
		let dc = DistanceConstraint::new_with_l0(0, 1, 1.0).with_stiffness(10.0);
		dc.apply(&mut pg);
		assert!(pg.get_force(0)[0] < 0.0);
		assert!(pg.get_force(1)[0] > 0.0);
	}

	#[test]
	fn test_damping_along_axis_only() {
		// particle 1 moves away along x and sideways along y
		let mut pg = pair(1.0, V3::new(2., 3., 0.));
		let pos = pg.get_pos(1);
		let dc = DistanceConstraint::new_with_l0(0, 1, pos.magnitude())
			.with_stiffness(0.0)
			.with_damping(1.0);
		dc.apply(&mut pg);
		let f1 = pg.get_force(1);
		let dir = pos.normalize();
		// opposes separation speed, acts along the spring axis
		assert!(f1.dot(&dir) < 0.0);
		assert!(f1.cross(&dir).magnitude() < 1e-5);
		assert_eq!(pg.get_force(0), -f1);
	}

	#[test]
	fn test_defaults_match_config() {
		let config = crate::config::SimConfig::default();
		let dc = DistanceConstraint::new_with_l0(0, 1, 1.0);
		assert_eq!(dc.stiffness(), config.spring_stiffness);
		assert_eq!(dc.damping(), config.spring_damping);
	}

	#[test]
	fn test_coincident_particles() {
		let mut pg = pair(0.0, V3::zeros());
		let dc = DistanceConstraint::new_with_l0(0, 1, 1.0);
		dc.apply(&mut pg);
		assert_eq!(pg.get_force(0), V3::zeros());
	}
}
