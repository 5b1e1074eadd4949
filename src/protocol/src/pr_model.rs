// pr_model: Physical model for rendering

use serde::{Deserialize, Serialize};

use crate::V3;

/// Owned copy of the body's surface, as handed to a renderer.
///
/// `indices` reference `vertices` by position and never change over a run,
/// so a consumer may upload them once and refresh only `vertices`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrModel {
	pub vertices: Vec<[f32; 3]>,
	pub indices: Vec<[u32; 3]>,
}

impl PrModel {
	pub fn new(vertices: &[V3], indices: &[[u32; 3]]) -> Self {
		let mut result = Self {
			vertices: Vec::with_capacity(vertices.len()),
			indices: indices.to_vec(),
		};
		result.update_vertices(vertices);
		result
	}

	/// Overwrites the vertex copy in place, reusing its allocation.
	pub fn update_vertices(&mut self, vertices: &[V3]) {
		self.vertices.clear();
		self.vertices.extend(vertices.iter().map(|v| [v[0], v[1], v[2]]));
	}

	pub fn centroid(&self) -> Option<[f32; 3]> {
		if self.vertices.is_empty() {
			return None;
		}
		let mut sum = V3::zeros();
		for v in self.vertices.iter() {
			sum += V3::from(*v);
		}
		Some((sum / self.vertices.len() as f32).into())
	}

	pub fn lowest(&self) -> Option<f32> {
		self.vertices.iter().map(|v| v[2]).reduce(f32::min)
	}
}
