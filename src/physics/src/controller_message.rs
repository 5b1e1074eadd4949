#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerMessage {
	TogglePause,
	// while paused, run until the next draw
	FrameForward,
	Stop,
}
