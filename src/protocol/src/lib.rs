pub mod error;
pub mod pr_model;
pub mod record;
pub mod user_event;

use pr_model::PrModel;
use user_event::UpdateInfo;

use error::ProtocolError;
use serde::{Deserialize, Serialize};

pub type V3 = nalgebra::Vector3<f32>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Message {
	WorldUpdate(PrModel, UpdateInfo),
	Nop,
}

impl Message {
	pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
		Ok(bincode::serialize(&self)?)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
		Ok(bincode::deserialize(bytes)?)
	}
}
