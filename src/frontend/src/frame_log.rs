use tracing::info;

use protocol::pr_model::PrModel;
use protocol::user_event::UpdateInfo;

pub fn report(model: &PrModel, info: &UpdateInfo) {
	let lowest = model.lowest().unwrap_or(f32::NAN);
	let [cx, cy, cz] = model.centroid().unwrap_or([f32::NAN; 3]);
	info!(
		frame = info.frame,
		time = info.simulation_time,
		lowest,
		cx,
		cy,
		cz,
		"frame"
	);
}
