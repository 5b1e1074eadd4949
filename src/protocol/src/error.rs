use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("codec error: {0}")]
	Codec(#[from] bincode::Error),

	#[error("frame of {0} bytes exceeds the frame limit")]
	FrameTooLarge(usize),
}
