use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
	#[error("simulation loop has stopped")]
	LoopClosed,
	#[error("request was dropped before a response was produced")]
	ReplyDropped,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
