use crate::config::SimConfig;
use crate::constraint::distance::DistanceConstraintTemplate;
use crate::particle::ParticleTemplate;
use crate::V3;

// Half of the 26-neighborhood: the first non-zero component is positive,
// so every neighboring pair is visited once. Covers cell edges, face
// diagonals and space diagonals.
const NEIGHBOR_OFFSETS: [[i64; 3]; 13] = [
	[1, -1, -1],
	[1, -1, 0],
	[1, -1, 1],
	[1, 0, -1],
	[1, 0, 0],
	[1, 0, 1],
	[1, 1, -1],
	[1, 1, 0],
	[1, 1, 1],
	[0, 1, -1],
	[0, 1, 0],
	[0, 1, 1],
	[0, 0, 1],
];

/// Rest-shape description of the body before it is handed to a solver.
#[derive(Clone, Debug, Default)]
pub struct PhysicalModel {
	pub particles: Vec<ParticleTemplate>,
	pub constraints: Vec<DistanceConstraintTemplate>,
	/// Outward-wound surface triangles.
	pub faces: Vec<[u32; 3]>,
}

struct Lattice {
	n: usize,
}

impl Lattice {
	fn id(&self, c: [usize; 3]) -> usize {
		let m = self.n + 1;
		(c[0] * m + c[1]) * m + c[2]
	}

	fn offset(&self, c: [usize; 3], d: [i64; 3]) -> Option<[usize; 3]> {
		let mut result = [0; 3];
		for axis in 0..3 {
			let v = c[axis] as i64 + d[axis];
			if v < 0 || v > self.n as i64 {
				return None;
			}
			result[axis] = v as usize;
		}
		Some(result)
	}

	fn coords(&self) -> impl Iterator<Item = [usize; 3]> {
		let m = self.n + 1;
		(0..m).flat_map(move |i| {
			(0..m).flat_map(move |j| (0..m).map(move |k| [i, j, k]))
		})
	}
}

impl PhysicalModel {
	/// Cube lattice with `n` cells per edge, its lowest corner at `origin`.
	///
	/// Particle ids run z fastest, then y, then x.
	pub fn new_block(n: usize, size: f32, origin: V3, imass: f32) -> Self {
		let lattice = Lattice { n };
		let h = size / n as f32;

		let particles: Vec<ParticleTemplate> = lattice
			.coords()
			.map(|c| {
				let pos = origin
					+ V3::new(c[0] as f32, c[1] as f32, c[2] as f32) * h;
				ParticleTemplate::new(imass, pos)
			})
			.collect();

		let mut constraints = vec![];
		for c in lattice.coords() {
			for d in NEIGHBOR_OFFSETS.iter() {
				if let Some(other) = lattice.offset(c, *d) {
					let ps = [lattice.id(c), lattice.id(other)];
					let l0 = (particles[ps[0]].pos - particles[ps[1]].pos)
						.magnitude();
					constraints.push(DistanceConstraintTemplate { ps, l0 });
				}
			}
		}

		let mut faces = vec![];
		for axis in 0..3 {
			// (u, v, axis) is right handed, so u x v points along +axis
			let u = (axis + 1) % 3;
			let v = (axis + 2) % 3;
			for side in [0, n] {
				for i in 0..n {
					for j in 0..n {
						let corner = |du: usize, dv: usize| {
							let mut c = [0; 3];
							c[axis] = side;
							c[u] = i + du;
							c[v] = j + dv;
							lattice.id(c) as u32
						};
						let p00 = corner(0, 0);
						let p10 = corner(1, 0);
						let p11 = corner(1, 1);
						let p01 = corner(0, 1);
						if side == n {
							faces.push([p00, p10, p11]);
							faces.push([p00, p11, p01]);
						} else {
							faces.push([p00, p11, p10]);
							faces.push([p00, p01, p11]);
						}
					}
				}
			}
		}

		Self {
			particles,
			constraints,
			faces,
		}
	}

	/// The configured body: centered on x = y = 0 with its lowest face at
	/// `drop_height`, listed particles pinned.
	pub fn from_config(config: &SimConfig) -> Self {
		let size = config.body_size;
		let origin = V3::new(-0.5 * size, -0.5 * size, config.drop_height);
		let mut model = Self::new_block(
			config.subdivisions,
			size,
			origin,
			1.0 / config.particle_mass,
		);
		for &id in config.pinned.iter() {
			if let Some(p) = model.particles.get_mut(id) {
				p.imass = 0.0;
			}
		}
		model
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use std::collections::HashSet;

	fn unit() -> PhysicalModel {
		PhysicalModel::new_block(1, 1.0, V3::zeros(), 1.0)
	}

	#[test]
	fn test_unit_block_connects_every_pair() {
		let model = unit();
		assert_eq!(model.particles.len(), 8);
		assert_eq!(model.constraints.len(), 28);
		let pairs: HashSet<[usize; 2]> = model
			.constraints
			.iter()
			.map(|c| [c.ps[0].min(c.ps[1]), c.ps[0].max(c.ps[1])])
			.collect();
		assert_eq!(pairs.len(), 28);

		let mut lengths: Vec<f32> =
			model.constraints.iter().map(|c| c.l0).collect();
		lengths.sort_by(|a, b| a.partial_cmp(b).unwrap());
		assert!(lengths[..12].iter().all(|l| (l - 1.0).abs() < 1e-6));
		assert!(lengths[12..24]
			.iter()
			.all(|l| (l - 2f32.sqrt()).abs() < 1e-6));
		assert!(lengths[24..].iter().all(|l| (l - 3f32.sqrt()).abs() < 1e-6));
	}

	#[test]
	fn test_subdivided_counts() {
		let model = PhysicalModel::new_block(2, 1.0, V3::zeros(), 1.0);
		assert_eq!(model.particles.len(), 27);
		// 54 edges, 72 face diagonals, 32 space diagonals
		assert_eq!(model.constraints.len(), 158);
		assert_eq!(model.faces.len(), 48);
	}

	#[test]
	fn test_faces_wind_outward() {
		for n in [1, 3] {
			let model = PhysicalModel::new_block(n, 2.0, V3::zeros(), 1.0);
			assert_eq!(model.faces.len(), 12 * n * n);
			let center = V3::new(1., 1., 1.);
			for f in model.faces.iter() {
				let [a, b, c] = f.map(|id| model.particles[id as usize].pos);
				let normal = (b - a).cross(&(c - a));
				let mid = (a + b + c) / 3.0;
				assert!(normal.dot(&(mid - center)) > 0.0, "{:?}", f);
			}
		}
	}

	#[test]
	fn test_surface_uses_only_boundary_particles() {
		let model = PhysicalModel::new_block(2, 1.0, V3::zeros(), 1.0);
		let used: HashSet<u32> = model.faces.iter().flatten().copied().collect();
		// everything but the center particle
		assert_eq!(used.len(), 26);
		assert!(!used.contains(&13));
	}

	#[test]
	fn test_from_config() {
		let config = SimConfig {
			drop_height: 2.0,
			body_size: 0.5,
			particle_mass: 4.0,
			pinned: vec![3],
			..Default::default()
		};
		let model = PhysicalModel::from_config(&config);
		let lowest = model
			.particles
			.iter()
			.map(|p| p.pos[2])
			.fold(f32::INFINITY, f32::min);
		assert_eq!(lowest, 2.0);
		assert_eq!(model.particles[0].pos, V3::new(-0.25, -0.25, 2.0));
		assert_eq!(model.particles[0].imass, 0.25);
		assert!(model.particles[3].is_pinned());
	}
}
