use crate::V3;

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleTemplate {
	pub imass: f32,
	pub pos: V3,
}

impl ParticleTemplate {
	pub fn new(imass: f32, pos: V3) -> Self {
		Self { imass, pos }
	}

	pub fn pinned(pos: V3) -> Self {
		Self { imass: 0.0, pos }
	}

	pub fn is_pinned(&self) -> bool {
		self.imass == 0.0
	}
}
