use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ErrorKind;

/// Logical request sent by an external driver.
///
/// ```json
/// { "command": "ClickById", "args": { "id": "login-btn" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
	pub command: String,
	#[serde(default)]
	pub args: Value,
}

impl Request {
	pub fn new(command: impl Into<String>, args: Value) -> Self {
		Self { command: command.into(), args }
	}

	/// Request with no arguments.
	pub fn bare(command: impl Into<String>) -> Self {
		Self::new(command, Value::Null)
	}
}

/// Logical response returned for every request.
///
/// `result` and `error` are always present on the wire (possibly `null`);
/// `message` carries a human-readable detail and is omitted when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
	pub ok: bool,
	#[serde(default)]
	pub result: Option<Value>,
	#[serde(default)]
	pub error: Option<ErrorKind>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl Response {
	pub fn success(result: impl Into<Value>) -> Self {
		Self {
			ok: true,
			result: Some(result.into()),
			error: None,
			message: None,
		}
	}

	pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self {
			ok: false,
			result: None,
			error: Some(kind),
			message: Some(message.into()),
		}
	}

	/// Attaches a result value to a failed response (e.g. the empty-string
	/// result of a failed `Screenshot`).
	pub fn with_result(mut self, result: impl Into<Value>) -> Self {
		self.result = Some(result.into());
		self
	}

	/// Result as a string, if it is one.
	pub fn result_str(&self) -> Option<&str> {
		self.result.as_ref().and_then(Value::as_str)
	}

	/// Result as a bool, if it is one.
	pub fn result_bool(&self) -> Option<bool> {
		self.result.as_ref().and_then(Value::as_bool)
	}
}
