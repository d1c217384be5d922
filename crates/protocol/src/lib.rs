//! Wire types for the playbridge automation protocol.
//!
//! This crate contains the serde-serializable types exchanged between an
//! external test driver and the automation endpoint living inside a running
//! application. These types represent the "protocol layer" - the shapes of
//! data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization and name lookup
//! * Transport-agnostic: A request is `{command, args}`, a response is
//!   `{ok, result, error}`, whatever carries them
//! * Stable: Changes only when the wire protocol changes
//!
//! Resolution, dispatch and session handling are built on top of these types
//! in `playbridge`.

pub mod command;
pub mod envelope;
pub mod types;

pub use command::*;
pub use envelope::*;
pub use types::*;

/// Version string reported by `Ping` unless the host overrides it.
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound (exclusive) for a single `WaitForSeconds` suspension.
pub const MAX_WAIT_SECONDS: f64 = 30.0;

/// Conventional port for remote-control style endpoints.
pub const DEFAULT_PORT: u16 = 30010;
