//! Key chord parsing for `PressKey`.
//!
//! A chord is `Modifier+...+Key`, e.g. `Escape`, `Ctrl+S`, `Shift+Alt+F4`.
//! Names are case-insensitive and canonicalized on display.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyChordError {
	#[error("empty key chord")]
	Empty,
	#[error("unknown key '{0}'")]
	UnknownKey(String),
	#[error("duplicate modifier '{0}'")]
	DuplicateModifier(String),
	#[error("key chord '{0}' has no key")]
	MissingKey(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
	pub ctrl: bool,
	pub shift: bool,
	pub alt: bool,
	pub cmd: bool,
}

impl Modifiers {
	pub fn is_empty(self) -> bool {
		!(self.ctrl || self.shift || self.alt || self.cmd)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
	/// Letter or digit, stored uppercase.
	Char(char),
	Function(u8),
	Escape,
	Enter,
	SpaceBar,
	Tab,
	BackSpace,
	Delete,
	Insert,
	Home,
	End,
	PageUp,
	PageDown,
	Left,
	Right,
	Up,
	Down,
}

impl Key {
	fn parse(token: &str) -> Option<Key> {
		let lower = token.to_ascii_lowercase();
		let named = match lower.as_str() {
			"escape" | "esc" => Some(Key::Escape),
			"enter" | "return" => Some(Key::Enter),
			"spacebar" | "space" => Some(Key::SpaceBar),
			"tab" => Some(Key::Tab),
			"backspace" => Some(Key::BackSpace),
			"delete" | "del" => Some(Key::Delete),
			"insert" => Some(Key::Insert),
			"home" => Some(Key::Home),
			"end" => Some(Key::End),
			"pageup" => Some(Key::PageUp),
			"pagedown" => Some(Key::PageDown),
			"left" => Some(Key::Left),
			"right" => Some(Key::Right),
			"up" => Some(Key::Up),
			"down" => Some(Key::Down),
			_ => None,
		};
		if named.is_some() {
			return named;
		}

		let mut chars = token.chars();
		if let (Some(c), None) = (chars.next(), chars.next()) {
			return c.is_ascii_alphanumeric().then(|| Key::Char(c.to_ascii_uppercase()));
		}

		let number = lower.strip_prefix('f')?.parse::<u8>().ok()?;
		(1..=24).contains(&number).then_some(Key::Function(number))
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Key::Char(c) => write!(f, "{c}"),
			Key::Function(n) => write!(f, "F{n}"),
			Key::Escape => f.write_str("Escape"),
			Key::Enter => f.write_str("Enter"),
			Key::SpaceBar => f.write_str("SpaceBar"),
			Key::Tab => f.write_str("Tab"),
			Key::BackSpace => f.write_str("BackSpace"),
			Key::Delete => f.write_str("Delete"),
			Key::Insert => f.write_str("Insert"),
			Key::Home => f.write_str("Home"),
			Key::End => f.write_str("End"),
			Key::PageUp => f.write_str("PageUp"),
			Key::PageDown => f.write_str("PageDown"),
			Key::Left => f.write_str("Left"),
			Key::Right => f.write_str("Right"),
			Key::Up => f.write_str("Up"),
			Key::Down => f.write_str("Down"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
	pub modifiers: Modifiers,
	pub key: Key,
}

impl KeyChord {
	pub fn new(key: Key) -> Self {
		Self {
			modifiers: Modifiers::default(),
			key,
		}
	}
}

impl FromStr for KeyChord {
	type Err = KeyChordError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if s.is_empty() {
			return Err(KeyChordError::Empty);
		}

		let tokens: Vec<&str> = s.split('+').map(str::trim).collect();
		let Some((key_token, modifier_tokens)) = tokens.split_last() else {
			return Err(KeyChordError::Empty);
		};
		if key_token.is_empty() {
			return Err(KeyChordError::MissingKey(s.to_string()));
		}

		let mut modifiers = Modifiers::default();
		for token in modifier_tokens {
			let flag = match token.to_ascii_lowercase().as_str() {
				"ctrl" | "control" => &mut modifiers.ctrl,
				"shift" => &mut modifiers.shift,
				"alt" => &mut modifiers.alt,
				"cmd" | "command" => &mut modifiers.cmd,
				_ => return Err(KeyChordError::UnknownKey(token.to_string())),
			};
			if *flag {
				return Err(KeyChordError::DuplicateModifier(token.to_string()));
			}
			*flag = true;
		}

		let key = Key::parse(key_token).ok_or_else(|| KeyChordError::UnknownKey(key_token.to_string()))?;
		Ok(KeyChord { modifiers, key })
	}
}

impl fmt::Display for KeyChord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let m = self.modifiers;
		for (on, name) in [(m.ctrl, "Ctrl"), (m.shift, "Shift"), (m.alt, "Alt"), (m.cmd, "Cmd")] {
			if on {
				write!(f, "{name}+")?;
			}
		}
		write!(f, "{}", self.key)
	}
}
