use serde::{Deserialize, Serialize};

/// Every command understood by the automation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandName {
	Ping,
	ClickById,
	TypeText,
	PressKey,
	ElementExists,
	IsVisible,
	Screenshot,
	FindActorByName,
	CallFunction,
	WaitForSeconds,
}

impl CommandName {
	pub const ALL: [CommandName; 10] = [
		CommandName::Ping,
		CommandName::ClickById,
		CommandName::TypeText,
		CommandName::PressKey,
		CommandName::ElementExists,
		CommandName::IsVisible,
		CommandName::Screenshot,
		CommandName::FindActorByName,
		CommandName::CallFunction,
		CommandName::WaitForSeconds,
	];

	/// Wire name of the command.
	pub fn as_str(self) -> &'static str {
		match self {
			CommandName::Ping => "Ping",
			CommandName::ClickById => "ClickById",
			CommandName::TypeText => "TypeText",
			CommandName::PressKey => "PressKey",
			CommandName::ElementExists => "ElementExists",
			CommandName::IsVisible => "IsVisible",
			CommandName::Screenshot => "Screenshot",
			CommandName::FindActorByName => "FindActorByName",
			CommandName::CallFunction => "CallFunction",
			CommandName::WaitForSeconds => "WaitForSeconds",
		}
	}

	/// Looks up a command by its exact wire name.
	pub fn lookup(name: &str) -> Option<CommandName> {
		Self::ALL.into_iter().find(|cmd| cmd.as_str() == name)
	}

	/// Query commands never alter application state.
	pub fn is_query(self) -> bool {
		matches!(self, CommandName::Ping | CommandName::ElementExists | CommandName::IsVisible)
	}
}

impl std::fmt::Display for CommandName {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Arguments for commands addressing a widget by automation id
/// (`ClickById`, `ElementExists`, `IsVisible`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdArgs {
	pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeTextArgs {
	#[serde(default)]
	pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressKeyArgs {
	pub key_chord: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotArgs {
	pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindActorArgs {
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionArgs {
	pub object_path: String,
	pub function_name: String,
	/// JSON-encoded parameters; empty means no parameters.
	#[serde(default)]
	pub params_json: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitArgs {
	pub seconds: f64,
}
