//! Session envelope reported by `Ping`.

use playbridge_protocol::{PROTOCOL_VERSION, PingInfo};
use uuid::Uuid;

/// Version and per-instance token of one automation endpoint.
///
/// Created once when the endpoint starts and immutable afterwards. The
/// token lets a reconnecting driver notice it is talking to a different
/// application instance; it is not a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
	version: String,
	id: String,
}

impl Session {
	pub fn new(version: impl Into<String>) -> Self {
		Self {
			version: version.into(),
			id: Uuid::new_v4().simple().to_string().to_uppercase(),
		}
	}

	pub fn version(&self) -> &str {
		&self.version
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn ping_info(&self) -> PingInfo {
		PingInfo {
			version: self.version.clone(),
			session: self.id.clone(),
		}
	}
}

impl Default for Session {
	fn default() -> Self {
		Self::new(PROTOCOL_VERSION)
	}
}
