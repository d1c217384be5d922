//! Capabilities the host application exposes to the bridge.
//!
//! The bridge owns none of the host's state. Each trait here is the narrow
//! interface the dispatcher needs from one host subsystem: the live UI tree,
//! the input pipeline, the renderer's capture facility and the simulation's
//! object graph.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::keys::KeyChord;

/// Non-owning reference to a UI element in the host's arena.
///
/// The generation distinguishes successive occupants of the same slot, so a
/// handle to a destroyed element never resolves to its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementHandle {
	index: u32,
	generation: u32,
}

impl ElementHandle {
	pub const fn new(index: u32, generation: u32) -> Self {
		Self { index, generation }
	}

	pub const fn index(self) -> u32 {
		self.index
	}

	pub const fn generation(self) -> u32 {
		self.generation
	}
}

impl std::fmt::Display for ElementHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "#{}v{}", self.index, self.generation)
	}
}

/// Top-level owner of widget trees (a local player or controller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub u32);

/// Visibility state of a widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
	/// Rendered and hit-testable.
	#[default]
	Visible,
	/// Rendered; neither the widget nor its children receive hits.
	HitTestInvisible,
	/// Rendered; children may still receive hits.
	SelfHitTestInvisible,
	/// Not rendered but still takes layout space.
	Hidden,
	/// Not rendered and takes no space.
	Collapsed,
}

impl Visibility {
	pub fn is_rendered(self) -> bool {
		matches!(self, Visibility::Visible | Visibility::HitTestInvisible | Visibility::SelfHitTestInvisible)
	}
}

/// Read-only view of the host's live UI tree.
///
/// Enumeration methods must return elements in a stable order: owners in
/// registration order, roots and children in insertion order. Every method
/// must tolerate stale handles and report them as absent.
pub trait UiTree {
	fn is_live(&self, element: ElementHandle) -> bool;

	fn owners(&self) -> Vec<OwnerId>;

	fn roots(&self, owner: OwnerId) -> Vec<ElementHandle>;

	fn children(&self, element: ElementHandle) -> Vec<ElementHandle>;

	fn parent(&self, element: ElementHandle) -> Option<ElementHandle>;

	fn visibility(&self, element: ElementHandle) -> Option<Visibility>;

	/// Element that currently holds keyboard focus.
	fn focused(&self) -> Option<ElementHandle>;

	fn accepts_text(&self, element: ElementHandle) -> bool;

	/// Programmatic name, for diagnostics only. Never used for lookup.
	fn name(&self, element: ElementHandle) -> Option<&str>;
}

/// Synthesized input delivered through the host's input pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
	Click { target: ElementHandle },
	Text { target: ElementHandle, text: String },
	Key { chord: KeyChord },
}

#[derive(Debug, Clone, Error)]
#[error("input rejected: {reason}")]
pub struct InjectError {
	pub reason: String,
}

impl InjectError {
	pub fn new(reason: impl Into<String>) -> Self {
		Self { reason: reason.into() }
	}
}

/// The host's input pipeline. Success means the event was accepted for
/// delivery, not that the application reacted to it.
pub trait InputSink {
	fn inject(&mut self, event: InputEvent) -> Result<(), InjectError>;
}

#[derive(Debug, Clone, Error)]
#[error("capture rejected: {reason}")]
pub struct CaptureError {
	pub reason: String,
}

impl CaptureError {
	pub fn new(reason: impl Into<String>) -> Self {
		Self { reason: reason.into() }
	}
}

/// The renderer's screenshot facility. Accepting a request does not imply
/// the file exists yet; capture may complete on a later frame.
pub trait ScreenCapture {
	fn capture(&mut self, path: &Path) -> Result<(), CaptureError>;
}

/// Opaque reference to an object in the host's simulation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
	#[error("no member '{0}'")]
	MemberNotFound(String),
	#[error("{0}")]
	Failed(String),
}

/// The host simulation's object graph. This namespace is unrelated to widget
/// automation ids.
pub trait ObjectGraph {
	/// Live objects in the host's enumeration order.
	fn enumerate(&self) -> Vec<ObjectHandle>;

	fn name(&self, object: ObjectHandle) -> Option<&str>;

	/// Human-readable label; may differ from the programmatic name.
	fn label(&self, object: ObjectHandle) -> Option<&str>;

	/// Fully-qualified object path.
	fn path(&self, object: ObjectHandle) -> Option<String>;

	fn resolve_path(&self, path: &str) -> Option<ObjectHandle>;

	fn invoke(&mut self, object: ObjectHandle, member: &str, args: &Value) -> Result<Value, InvokeError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rendered_states() {
		assert!(Visibility::Visible.is_rendered());
		assert!(Visibility::HitTestInvisible.is_rendered());
		assert!(Visibility::SelfHitTestInvisible.is_rendered());
		assert!(!Visibility::Hidden.is_rendered());
		assert!(!Visibility::Collapsed.is_rendered());
	}

	#[test]
	fn handle_display_shows_generation() {
		assert_eq!(ElementHandle::new(3, 7).to_string(), "#3v7");
	}
}
