use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhysicsError {
	/// A configuration value is out of its valid range.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("config parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// The consumer of published frames hung up.
	#[error("frame consumer disconnected")]
	Disconnected,
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
