//! Result envelope printed by every subcommand.

use std::io::{self, Write};
use std::time::Instant;

use clap::ValueEnum;
use playbridge_protocol::{ErrorKind, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Pretty-printed JSON
	#[default]
	Json,
	/// One JSON object per line
	Ndjson,
	/// Human-readable text
	Text,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
	pub code: String,
	pub message: String,
}

pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
	start_time: Instant,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
			start_time: Instant::now(),
		}
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
		self.error = Some(CommandError {
			code: code.into(),
			message: message.into(),
		});
		self
	}

	pub fn build(self) -> CommandResult<T> {
		CommandResult {
			ok: self.error.is_none() && self.data.is_some(),
			command: self.command,
			data: self.data,
			error: self.error,
			duration_ms: Some(self.start_time.elapsed().as_millis() as u64),
		}
	}
}

/// Wraps a bridge response. The bridge's `result` is kept even on failure
/// since some commands attach a failure payload there.
pub fn from_response(command: impl Into<String>, response: Response) -> CommandResult<Value> {
	let mut builder = ResultBuilder::new(command).data(response.result.unwrap_or(Value::Null));
	if !response.ok {
		let code = response.error.map(ErrorKind::as_str).unwrap_or("ERROR");
		builder = builder.error(code, response.message.unwrap_or_default());
	}
	builder.build()
}

pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Ndjson => {
			if let Ok(json) = serde_json::to_string(result) {
				println!("{json}");
			}
		}
		OutputFormat::Text => print_result_text(result),
	}
}

fn print_result_text<T: Serialize>(result: &CommandResult<T>) {
	let mut stdout = io::stdout().lock();

	if let Some(ref error) = result.error {
		let _ = writeln!(stdout, "Error [{}]: {}", error.code, error.message);
	}
	if let Some(ref data) = result.data {
		if let Ok(json) = serde_json::to_string_pretty(data) {
			let _ = writeln!(stdout, "{json}");
		}
	}
	if let Some(duration_ms) = result.duration_ms {
		let _ = writeln!(stdout, "Completed in {duration_ms}ms");
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn failed_response_keeps_result_payload() {
		let response = Response::failure(ErrorKind::InvocationError, "boom").with_result(json!({"status": "error", "detail": "boom"}));
		let result = from_response("send", response);

		assert!(!result.ok);
		let value = serde_json::to_value(&result).unwrap();
		assert_eq!(value["error"]["code"], "INVOCATION_ERROR");
		assert_eq!(value["data"]["status"], "error");
	}

	#[test]
	fn successful_response_is_ok() {
		let result = from_response("ping", Response::success(json!({"version": "0.1.0"})));
		assert!(result.ok);
		assert!(result.error.is_none());
	}
}
