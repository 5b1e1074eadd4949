use serde::{Deserialize, Serialize};

use crate::pr_model::PrModel;

#[derive(Debug)]
pub enum UserEvent {
	Update(PrModel, UpdateInfo),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateInfo {
	// index of the draw, starting at 0
	pub frame: u64,
	pub simulation_time: f64,
}
