use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("failed to read config {path}: {source}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid config {path}: {source}")]
	ConfigParse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("cannot reach bridge at {addr}: {source}")]
	Connect {
		addr: String,
		#[source]
		source: std::io::Error,
	},

	#[error("bridge did not answer within {0:?}")]
	Timeout(Duration),

	#[error("bridge closed the connection")]
	Disconnected,

	#[error("protocol error: {0}")]
	Protocol(String),

	#[error("invalid arguments: {0}")]
	InvalidArgs(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
