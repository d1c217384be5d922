//! Typed commands parsed from wire requests.

use playbridge_protocol::{
	CallFunctionArgs, CommandName, ErrorKind, FindActorArgs, IdArgs, PressKeyArgs, Request, Response, ScreenshotArgs, TypeTextArgs, WaitArgs,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
	Ping,
	ClickById { id: String },
	TypeText { text: String },
	PressKey { key_chord: String },
	ElementExists { id: String },
	IsVisible { id: String },
	Screenshot { path: String },
	FindActorByName { name: String },
	CallFunction { object_path: String, function_name: String, params_json: String },
	WaitForSeconds { seconds: f64 },
}

/// A request that never reaches the dispatcher.
#[derive(Debug, Error)]
pub enum CommandParseError {
	#[error("unknown command: {0}")]
	Unknown(String),
	#[error("malformed arguments for {command}: {source}")]
	Malformed {
		command: CommandName,
		#[source]
		source: serde_json::Error,
	},
}

impl CommandParseError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			CommandParseError::Unknown(_) => ErrorKind::UnknownCommand,
			CommandParseError::Malformed { .. } => ErrorKind::MalformedRequest,
		}
	}

	pub fn to_response(&self) -> Response {
		Response::failure(self.kind(), self.to_string())
	}
}

impl Command {
	pub fn parse(request: &Request) -> Result<Command, CommandParseError> {
		let name = CommandName::lookup(&request.command).ok_or_else(|| CommandParseError::Unknown(request.command.clone()))?;
		let args = &request.args;

		let command = match name {
			CommandName::Ping => Command::Ping,
			CommandName::ClickById => Command::ClickById {
				id: parse_args::<IdArgs>(name, args)?.id,
			},
			CommandName::TypeText => Command::TypeText {
				text: parse_args::<TypeTextArgs>(name, args)?.text,
			},
			CommandName::PressKey => Command::PressKey {
				key_chord: parse_args::<PressKeyArgs>(name, args)?.key_chord,
			},
			CommandName::ElementExists => Command::ElementExists {
				id: parse_args::<IdArgs>(name, args)?.id,
			},
			CommandName::IsVisible => Command::IsVisible {
				id: parse_args::<IdArgs>(name, args)?.id,
			},
			CommandName::Screenshot => Command::Screenshot {
				path: parse_args::<ScreenshotArgs>(name, args)?.path,
			},
			CommandName::FindActorByName => Command::FindActorByName {
				name: parse_args::<FindActorArgs>(name, args)?.name,
			},
			CommandName::CallFunction => {
				let args = parse_args::<CallFunctionArgs>(name, args)?;
				Command::CallFunction {
					object_path: args.object_path,
					function_name: args.function_name,
					params_json: args.params_json,
				}
			}
			CommandName::WaitForSeconds => Command::WaitForSeconds {
				seconds: parse_args::<WaitArgs>(name, args)?.seconds,
			},
		};
		Ok(command)
	}

	pub fn name(&self) -> CommandName {
		match self {
			Command::Ping => CommandName::Ping,
			Command::ClickById { .. } => CommandName::ClickById,
			Command::TypeText { .. } => CommandName::TypeText,
			Command::PressKey { .. } => CommandName::PressKey,
			Command::ElementExists { .. } => CommandName::ElementExists,
			Command::IsVisible { .. } => CommandName::IsVisible,
			Command::Screenshot { .. } => CommandName::Screenshot,
			Command::FindActorByName { .. } => CommandName::FindActorByName,
			Command::CallFunction { .. } => CommandName::CallFunction,
			Command::WaitForSeconds { .. } => CommandName::WaitForSeconds,
		}
	}
}

fn parse_args<T: DeserializeOwned>(command: CommandName, args: &Value) -> Result<T, CommandParseError> {
	serde_json::from_value(args.clone()).map_err(|source| CommandParseError::Malformed { command, source })
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn ping_ignores_args() {
		assert_eq!(Command::parse(&Request::bare("Ping")).unwrap(), Command::Ping);
		assert_eq!(Command::parse(&Request::new("Ping", json!({}))).unwrap(), Command::Ping);
	}

	#[test]
	fn parses_call_function() {
		let req = Request::new(
			"CallFunction",
			json!({"objectPath": "/Game/Maps/M.M:PersistentLevel.Door_1", "functionName": "Open", "paramsJson": "{\"fast\":true}"}),
		);
		match Command::parse(&req).unwrap() {
			Command::CallFunction { object_path, function_name, params_json } => {
				assert_eq!(object_path, "/Game/Maps/M.M:PersistentLevel.Door_1");
				assert_eq!(function_name, "Open");
				assert_eq!(params_json, "{\"fast\":true}");
			}
			other => panic!("unexpected {other:?}"),
		}
	}

	#[test]
	fn type_text_defaults_to_empty() {
		let cmd = Command::parse(&Request::new("TypeText", json!({}))).unwrap();
		assert_eq!(cmd, Command::TypeText { text: String::new() });
	}

	#[test]
	fn unknown_command_is_rejected() {
		let err = Command::parse(&Request::bare("Explode")).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::UnknownCommand);
		assert_eq!(err.to_response().error, Some(ErrorKind::UnknownCommand));
	}

	#[test]
	fn missing_args_are_malformed() {
		let err = Command::parse(&Request::bare("ClickById")).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::MalformedRequest);

		let err = Command::parse(&Request::new("WaitForSeconds", json!({"seconds": "soon"}))).unwrap_err();
		assert!(matches!(err, CommandParseError::Malformed { command: CommandName::WaitForSeconds, .. }));
	}

	#[test]
	fn name_matches_parsed_command() {
		let cmd = Command::parse(&Request::new("IsVisible", json!({"id": "hud"}))).unwrap();
		assert_eq!(cmd.name(), CommandName::IsVisible);
	}
}
