use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, PhysicsResult};
use crate::time_manager::TimeModel;

pub const DEFAULT_SPRING_STIFFNESS: f32 = 2000.0;
pub const DEFAULT_SPRING_DAMPING: f32 = 5.0;
pub const DEFAULT_CONTACT_STIFFNESS: f32 = 10000.0;
pub const DEFAULT_CONTACT_DAMPING: f32 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
	/// Fixed integration step in seconds.
	pub step_size: f64,
	/// Simulated seconds between two draws.
	pub refresh_interval: f64,
	/// Simulated seconds after which the run stops.
	pub max_display_time: f64,

	/// Downward (-z) acceleration in m/s².
	pub gravity: f32,
	/// Mass of every free particle in kg.
	pub particle_mass: f32,

	pub spring_stiffness: f32,
	pub spring_damping: f32,

	/// Height of the ground plane.
	pub ground_height: f32,
	pub contact_stiffness: f32,
	pub contact_damping: f32,

	/// Edge length of the hexahedron.
	pub body_size: f32,
	/// Lattice cells per edge. 1 gives the 8-corner body.
	pub subdivisions: usize,
	/// Height of the lowest face at the start of the run.
	pub drop_height: f32,
	pub initial_velocity: [f32; 3],
	/// Particles with zero inverse mass, by index.
	pub pinned: Vec<usize>,

	pub time_model: TimeModel,
}

impl Default for SimConfig {
	fn default() -> Self {
		Self {
			step_size: 1.0 / 240.0,
			refresh_interval: 1.0 / 30.0,
			max_display_time: 10.0,
			gravity: 9.81,
			particle_mass: 1.0,
			spring_stiffness: DEFAULT_SPRING_STIFFNESS,
			spring_damping: DEFAULT_SPRING_DAMPING,
			ground_height: 0.0,
			contact_stiffness: DEFAULT_CONTACT_STIFFNESS,
			contact_damping: DEFAULT_CONTACT_DAMPING,
			body_size: 1.0,
			subdivisions: 1,
			drop_height: 1.0,
			initial_velocity: [0.0; 3],
			pinned: Vec::new(),
			time_model: TimeModel::VideoRender,
		}
	}
}

impl SimConfig {
	/// No gravity and no ground: the body only feels its own springs.
	pub fn weightless() -> Self {
		Self {
			gravity: 0.0,
			contact_stiffness: 0.0,
			contact_damping: 0.0,
			..Default::default()
		}
	}

	pub fn from_toml_str(text: &str) -> PhysicsResult<Self> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	pub fn load(path: impl AsRef<Path>) -> PhysicsResult<Self> {
		let text = std::fs::read_to_string(path)?;
		Self::from_toml_str(&text)
	}

	/// Number of particles the configured body is built from.
	pub fn particle_count(&self) -> usize {
		(self.subdivisions + 1).pow(3)
	}

	/// Checks ranges only. Whether the constants keep the integrator
	/// stable is not checked here.
	pub fn validate(&self) -> PhysicsResult<()> {
		fn positive(name: &str, v: f64) -> PhysicsResult<()> {
			if v.is_finite() && v > 0.0 {
				Ok(())
			} else {
				Err(PhysicsError::InvalidConfig(format!(
					"{} must be finite and positive, got {}",
					name, v
				)))
			}
		}
		fn non_negative(name: &str, v: f32) -> PhysicsResult<()> {
			if v.is_finite() && v >= 0.0 {
				Ok(())
			} else {
				Err(PhysicsError::InvalidConfig(format!(
					"{} must be finite and non-negative, got {}",
					name, v
				)))
			}
		}

		positive("step_size", self.step_size)?;
		positive("refresh_interval", self.refresh_interval)?;
		positive("max_display_time", self.max_display_time)?;
		positive("particle_mass", self.particle_mass as f64)?;
		positive("body_size", self.body_size as f64)?;
		non_negative("gravity", self.gravity)?;
		non_negative("spring_stiffness", self.spring_stiffness)?;
		non_negative("spring_damping", self.spring_damping)?;
		non_negative("contact_stiffness", self.contact_stiffness)?;
		non_negative("contact_damping", self.contact_damping)?;
		if !self.ground_height.is_finite() || !self.drop_height.is_finite() {
			return Err(PhysicsError::InvalidConfig(
				"ground_height and drop_height must be finite".into(),
			));
		}
		if self.initial_velocity.iter().any(|v| !v.is_finite()) {
			return Err(PhysicsError::InvalidConfig(
				"initial_velocity must be finite".into(),
			));
		}
		if self.subdivisions == 0 {
			return Err(PhysicsError::InvalidConfig(
				"subdivisions must be at least 1".into(),
			));
		}
		let count = self.particle_count();
		if let Some(id) = self.pinned.iter().find(|&&id| id >= count) {
			return Err(PhysicsError::InvalidConfig(format!(
				"pinned particle {} out of range (body has {})",
				id, count
			)));
		}
		Ok(())
	}
}
