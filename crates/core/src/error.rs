//! Failure taxonomy for dispatched commands.

use playbridge_protocol::ErrorKind;
use thiserror::Error;

use crate::host::{CaptureError, InjectError, InvokeError};

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Every way a command can fail once it reached the dispatcher.
///
/// None of these are exceptional: the dispatcher converts each one into a
/// structured `{ok: false, error}` response.
#[derive(Debug, Error)]
pub enum BridgeError {
	#[error("not found: {0}")]
	NotFound(String),

	#[error("input rejected: {0}")]
	InjectionRejected(String),

	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error("{context}: {source}")]
	IoFailure {
		context: String,
		#[source]
		source: std::io::Error,
	},

	#[error("invocation failed: {0}")]
	InvocationError(String),
}

impl BridgeError {
	pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
		BridgeError::IoFailure {
			context: context.into(),
			source,
		}
	}

	/// Wire-level kind reported to the driver.
	pub fn kind(&self) -> ErrorKind {
		match self {
			BridgeError::NotFound(_) => ErrorKind::NotFound,
			BridgeError::InjectionRejected(_) => ErrorKind::InjectionRejected,
			BridgeError::InvalidArgument(_) => ErrorKind::InvalidArgument,
			BridgeError::IoFailure { .. } => ErrorKind::IoFailure,
			BridgeError::InvocationError(_) => ErrorKind::InvocationError,
		}
	}
}

impl From<InjectError> for BridgeError {
	fn from(err: InjectError) -> Self {
		BridgeError::InjectionRejected(err.reason)
	}
}

impl From<CaptureError> for BridgeError {
	fn from(err: CaptureError) -> Self {
		BridgeError::io("capture request rejected", std::io::Error::other(err.reason))
	}
}

impl From<InvokeError> for BridgeError {
	fn from(err: InvokeError) -> Self {
		match err {
			InvokeError::MemberNotFound(member) => BridgeError::NotFound(format!("function '{member}'")),
			InvokeError::Failed(detail) => BridgeError::InvocationError(detail),
		}
	}
}
