//! Bridge configuration.
//!
//! Resolution order: an explicit `--config` file, then
//! `<config_dir>/playbridge/config.json`, then built-in defaults. Command
//! line flags are applied on top by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use playbridge_protocol::{DEFAULT_PORT, PROTOCOL_VERSION};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, Result};

const CONFIG_DIR: &str = "playbridge";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
	pub host: String,
	pub port: u16,
	/// Root directory for screenshots.
	pub output_root: PathBuf,
	pub frame_rate_hz: u32,
	pub protocol_version: String,
}

impl Default for BridgeConfig {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_string(),
			port: DEFAULT_PORT,
			output_root: PathBuf::from("Saved"),
			frame_rate_hz: 60,
			protocol_version: PROTOCOL_VERSION.to_string(),
		}
	}
}

impl BridgeConfig {
	/// Loads configuration. An explicit path must exist; the default path
	/// is optional.
	pub fn load(explicit: Option<&Path>) -> Result<Self> {
		if let Some(path) = explicit {
			return Self::from_file(path);
		}
		match default_path() {
			Some(path) if path.is_file() => Self::from_file(&path),
			_ => Ok(Self::default()),
		}
	}

	pub fn from_file(path: &Path) -> Result<Self> {
		let content = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
			path: path.to_path_buf(),
			source,
		})?;
		let config = serde_json::from_str(&content).map_err(|source| CliError::ConfigParse {
			path: path.to_path_buf(),
			source,
		})?;
		debug!(target: "playbridge", path = %path.display(), "loaded config");
		Ok(config)
	}

	/// `host:port` for binding or connecting.
	pub fn addr(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}

	pub fn with_host(mut self, host: Option<String>) -> Self {
		if let Some(host) = host {
			self.host = host;
		}
		self
	}

	pub fn with_port(mut self, port: Option<u16>) -> Self {
		if let Some(port) = port {
			self.port = port;
		}
		self
	}

	pub fn with_output_root(mut self, root: Option<PathBuf>) -> Self {
		if let Some(root) = root {
			self.output_root = root;
		}
		self
	}

	pub fn with_frame_rate(mut self, hz: Option<u32>) -> Self {
		if let Some(hz) = hz {
			self.frame_rate_hz = hz;
		}
		self
	}
}

pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_file_keeps_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");
		fs::write(&path, r#"{"port": 31000, "outputRoot": "/tmp/shots"}"#).unwrap();

		let config = BridgeConfig::load(Some(&path)).unwrap();
		assert_eq!(config.port, 31000);
		assert_eq!(config.output_root, PathBuf::from("/tmp/shots"));
		assert_eq!(config.host, "127.0.0.1");
		assert_eq!(config.frame_rate_hz, 60);
	}

	#[test]
	fn malformed_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");
		fs::write(&path, "{ port: ").unwrap();
		assert!(matches!(BridgeConfig::load(Some(&path)), Err(CliError::ConfigParse { .. })));
	}

	#[test]
	fn missing_explicit_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = BridgeConfig::load(Some(&dir.path().join("absent.json"))).unwrap_err();
		assert!(matches!(err, CliError::ConfigRead { .. }));
	}

	#[test]
	fn flags_override_file_values() {
		let config = BridgeConfig::default()
			.with_host(Some("0.0.0.0".into()))
			.with_port(None)
			.with_frame_rate(Some(30));
		assert_eq!(config.addr(), format!("0.0.0.0:{DEFAULT_PORT}"));
		assert_eq!(config.frame_rate_hz, 30);
	}

	#[test]
	fn serializes_camel_case() {
		let value = serde_json::to_value(BridgeConfig::default()).unwrap();
		assert_eq!(value["outputRoot"], "Saved");
		assert_eq!(value["frameRateHz"], 60);
		assert_eq!(value["protocolVersion"], PROTOCOL_VERSION);
	}
}
