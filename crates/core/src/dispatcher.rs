//! Command dispatch.
//!
//! The dispatcher is the single entry point for automation commands. It
//! resolves targets fresh for every command, applies at most one side
//! effect, and turns every failure into a structured [`Response`]. It never
//! holds a resolved handle past the call that produced it.

use std::time::Duration;

use playbridge_protocol::{CallFailure, MAX_WAIT_SECONDS, Request, Response};
use serde_json::{Value, json};
use tracing::debug;

use crate::command::Command;
use crate::error::{BridgeError, Result};
use crate::evidence::EvidenceCapture;
use crate::host::{InputEvent, InputSink, ObjectGraph, ScreenCapture, UiTree};
use crate::keys::KeyChord;
use crate::locator::{Locator, find_object_by_name_or_label};
use crate::registry::IdentityRegistry;
use crate::session::Session;

/// Borrowed view of the host for the duration of one command.
pub struct Host<'a> {
	pub ui: &'a dyn UiTree,
	pub registry: &'a IdentityRegistry,
	pub input: &'a mut dyn InputSink,
	pub screen: &'a mut dyn ScreenCapture,
	pub world: &'a mut dyn ObjectGraph,
}

impl Host<'_> {
	fn locator(&self) -> Locator<'_> {
		Locator::new(self.ui, self.registry)
	}
}

/// Result of dispatching one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
	/// The command finished within the current frame.
	Complete(Response),
	/// The command finishes once `duration` of game time has elapsed; the
	/// caller registers a timer and delivers `response` when it fires.
	Suspend { duration: Duration, response: Response },
}

impl Outcome {
	/// The response, regardless of any pending suspension.
	pub fn into_response(self) -> Response {
		match self {
			Outcome::Complete(response) | Outcome::Suspend { response, .. } => response,
		}
	}

	pub fn is_suspended(&self) -> bool {
		matches!(self, Outcome::Suspend { .. })
	}
}

pub struct Dispatcher {
	session: Session,
	evidence: EvidenceCapture,
}

impl Dispatcher {
	pub fn new(session: Session, evidence: EvidenceCapture) -> Self {
		Self { session, evidence }
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	pub fn evidence(&self) -> &EvidenceCapture {
		&self.evidence
	}

	/// Parses and dispatches a wire request.
	pub fn handle(&self, request: &Request, host: &mut Host<'_>) -> Outcome {
		match Command::parse(request) {
			Ok(command) => self.dispatch(&command, host),
			Err(err) => {
				debug!(target: "playbridge.dispatch", command = %request.command, error = %err, "request rejected");
				Outcome::Complete(err.to_response())
			}
		}
	}

	pub fn dispatch(&self, command: &Command, host: &mut Host<'_>) -> Outcome {
		debug!(target: "playbridge.dispatch", command = %command.name(), "dispatch");

		match command {
			Command::Ping => {
				let info = self.session.ping_info();
				Outcome::Complete(Response::success(json!({ "version": info.version, "session": info.session })))
			}
			Command::ClickById { id } => complete(command, click_by_id(id, host), Value::Null),
			Command::TypeText { text } => complete(command, type_text(text, host), Value::Null),
			Command::PressKey { key_chord } => complete(command, press_key(key_chord, host), Value::Null),
			Command::ElementExists { id } => Outcome::Complete(Response::success(host.locator().find_by_id(id).is_some())),
			Command::IsVisible { id } => {
				let locator = host.locator();
				let visible = locator.find_by_id(id).is_some_and(|element| locator.is_displayed(element));
				Outcome::Complete(Response::success(visible))
			}
			Command::Screenshot { path } => {
				let result = self
					.evidence
					.capture(path, &mut *host.screen)
					.map(|path| Value::String(path.to_string_lossy().into_owned()));
				complete(command, result, Value::String(String::new()))
			}
			Command::FindActorByName { name } => complete(command, find_actor(name, host), Value::String(String::new())),
			Command::CallFunction {
				object_path,
				function_name,
				params_json,
			} => match call_function(object_path, function_name, params_json, host) {
				Ok(value) => Outcome::Complete(Response::success(value)),
				Err(err) => {
					let detail = serde_json::to_value(CallFailure::new(err.to_string())).unwrap_or_default();
					complete(command, Err(err), detail)
				}
			},
			Command::WaitForSeconds { seconds } => match wait_duration(*seconds) {
				Ok(None) => Outcome::Complete(Response::success(0.0)),
				Ok(Some(duration)) => Outcome::Suspend {
					duration,
					response: Response::success(*seconds),
				},
				Err(err) => complete(command, Err(err), Value::Null),
			},
		}
	}
}

/// Validates a `WaitForSeconds` duration. Non-positive values are a no-op
/// (`None`); values at or above [`MAX_WAIT_SECONDS`] and NaN are rejected.
pub fn wait_duration(seconds: f64) -> Result<Option<Duration>> {
	if seconds.is_nan() {
		return Err(BridgeError::InvalidArgument("wait duration is NaN".into()));
	}
	if seconds <= 0.0 {
		return Ok(None);
	}
	if seconds >= MAX_WAIT_SECONDS {
		return Err(BridgeError::InvalidArgument(format!("wait of {seconds}s exceeds the {MAX_WAIT_SECONDS}s limit")));
	}
	Ok(Some(Duration::from_secs_f64(seconds)))
}

fn complete(command: &Command, result: Result<Value>, failure_result: Value) -> Outcome {
	match result {
		Ok(value) => Outcome::Complete(Response::success(value)),
		Err(err) => {
			debug!(target: "playbridge.dispatch", command = %command.name(), kind = %err.kind(), error = %err, "command failed");
			Outcome::Complete(Response::failure(err.kind(), err.to_string()).with_result(failure_result))
		}
	}
}

fn click_by_id(id: &str, host: &mut Host<'_>) -> Result<Value> {
	if id.is_empty() {
		return Err(BridgeError::InvalidArgument("automation id is empty".into()));
	}
	let target = host.locator().find_by_id(id).ok_or_else(|| BridgeError::NotFound(format!("no widget with automation id '{id}'")))?;
	host.input.inject(InputEvent::Click { target })?;
	Ok(Value::Bool(true))
}

fn type_text(text: &str, host: &mut Host<'_>) -> Result<Value> {
	let target = host.ui.focused().ok_or_else(|| BridgeError::InjectionRejected("no widget has keyboard focus".into()))?;
	if !host.ui.accepts_text(target) {
		return Err(BridgeError::InjectionRejected(format!(
			"focused widget '{}' does not accept text",
			host.ui.name(target).unwrap_or_default()
		)));
	}
	host.input.inject(InputEvent::Text {
		target,
		text: text.to_string(),
	})?;
	Ok(Value::Bool(true))
}

fn press_key(key_chord: &str, host: &mut Host<'_>) -> Result<Value> {
	let chord: KeyChord = key_chord.parse().map_err(|e| BridgeError::InvalidArgument(format!("{e}")))?;
	host.input.inject(InputEvent::Key { chord })?;
	Ok(Value::Bool(true))
}

fn find_actor(name: &str, host: &mut Host<'_>) -> Result<Value> {
	find_object_by_name_or_label(&*host.world, name)
		.and_then(|object| host.world.path(object))
		.map(Value::String)
		.ok_or_else(|| BridgeError::NotFound(format!("no actor named '{name}'")))
}

fn call_function(object_path: &str, function_name: &str, params_json: &str, host: &mut Host<'_>) -> Result<Value> {
	if function_name.is_empty() {
		return Err(BridgeError::InvalidArgument("function name is empty".into()));
	}
	let object = host
		.world
		.resolve_path(object_path)
		.ok_or_else(|| BridgeError::NotFound(format!("object '{object_path}'")))?;

	let params: Value = if params_json.trim().is_empty() {
		json!({})
	} else {
		serde_json::from_str(params_json).map_err(|e| BridgeError::InvalidArgument(format!("paramsJson: {e}")))?
	};

	let returned = host.world.invoke(object, function_name, &params)?;
	let encoded = serde_json::to_string(&returned).map_err(|e| BridgeError::InvocationError(format!("return value not serializable: {e}")))?;
	Ok(Value::String(encoded))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wait_boundaries() {
		assert_eq!(wait_duration(0.0).unwrap(), None);
		assert_eq!(wait_duration(-1.0).unwrap(), None);
		assert_eq!(wait_duration(f64::NEG_INFINITY).unwrap(), None);
		assert_eq!(wait_duration(29.999).unwrap(), Some(Duration::from_secs_f64(29.999)));
		assert!(matches!(wait_duration(30.0), Err(BridgeError::InvalidArgument(_))));
		assert!(matches!(wait_duration(f64::INFINITY), Err(BridgeError::InvalidArgument(_))));
		assert!(matches!(wait_duration(f64::NAN), Err(BridgeError::InvalidArgument(_))));
	}

	#[test]
	fn outcome_into_response() {
		let suspended = Outcome::Suspend {
			duration: Duration::from_secs(1),
			response: Response::success(1.0),
		};
		assert!(suspended.is_suspended());
		assert_eq!(suspended.into_response(), Response::success(1.0));
	}
}
