use serde::{Deserialize, Serialize};

/// Standardized failure kinds for programmatic handling by drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
	/// Identifier, object path or actor name does not resolve.
	NotFound,
	/// Input could not be delivered (nothing focused, host refused the event).
	InjectionRejected,
	/// Malformed path, unknown key chord, out-of-range duration, bad JSON args.
	InvalidArgument,
	/// Output directory or screenshot path could not be prepared.
	IoFailure,
	/// Target function threw or does not exist.
	InvocationError,
	/// Command name is not part of the protocol.
	UnknownCommand,
	/// Request could not be parsed at the transport boundary.
	MalformedRequest,
}

impl ErrorKind {
	pub fn as_str(self) -> &'static str {
		match self {
			ErrorKind::NotFound => "NOT_FOUND",
			ErrorKind::InjectionRejected => "INJECTION_REJECTED",
			ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
			ErrorKind::IoFailure => "IO_FAILURE",
			ErrorKind::InvocationError => "INVOCATION_ERROR",
			ErrorKind::UnknownCommand => "UNKNOWN_COMMAND",
			ErrorKind::MalformedRequest => "MALFORMED_REQUEST",
		}
	}
}

impl std::fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Result payload of `Ping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingInfo {
	pub version: String,
	pub session: String,
}

/// Result payload of a failed `CallFunction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFailure {
	pub status: String,
	pub detail: String,
}

impl CallFailure {
	pub fn new(detail: impl Into<String>) -> Self {
		Self {
			status: "error".to_string(),
			detail: detail.into(),
		}
	}
}
