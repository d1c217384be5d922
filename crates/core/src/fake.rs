//! In-memory host collaborators for tests and headless demos.
//!
//! Provides an input sink, a screen capture facility and an object graph
//! that record what the bridge asked of them, so dispatch behavior can be
//! verified without a renderer or an engine.
//!
//! # Example
//!
//! ```ignore
//! let mut world = FakeWorld::new("TestMap");
//! let door = world.spawn("Door_1", "Front Door");
//! world.on(door, "Open", |_args| Ok(json!(true)));
//!
//! let mut input = FakeInput::new();
//! let mut screen = FakeScreen::new();
//! let mut host = Host { ui: &tree, registry: &registry, input: &mut input, screen: &mut screen, world: &mut world };
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::host::{CaptureError, InjectError, InputEvent, InputSink, InvokeError, ObjectGraph, ObjectHandle, ScreenCapture};

/// Input sink that records every accepted event.
#[derive(Debug)]
pub struct FakeInput {
	events: Vec<InputEvent>,
	accepting: bool,
}

impl FakeInput {
	pub fn new() -> Self {
		Self {
			events: Vec::new(),
			accepting: true,
		}
	}

	/// When `false`, every injection is refused.
	pub fn set_accepting(&mut self, accepting: bool) {
		self.accepting = accepting;
	}

	pub fn events(&self) -> &[InputEvent] {
		&self.events
	}

	/// Take all recorded events, clearing the buffer.
	pub fn take_events(&mut self) -> Vec<InputEvent> {
		std::mem::take(&mut self.events)
	}
}

impl Default for FakeInput {
	fn default() -> Self {
		Self::new()
	}
}

impl InputSink for FakeInput {
	fn inject(&mut self, event: InputEvent) -> Result<(), InjectError> {
		if !self.accepting {
			return Err(InjectError::new("input pipeline is not accepting events"));
		}
		self.events.push(event);
		Ok(())
	}
}

/// Capture facility that records requested paths. Nothing is written; a
/// host that wants files flushes [`take_requests`](Self::take_requests) on
/// its own frame.
#[derive(Debug)]
pub struct FakeScreen {
	requests: Vec<PathBuf>,
	accepting: bool,
}

impl FakeScreen {
	pub fn new() -> Self {
		Self {
			requests: Vec::new(),
			accepting: true,
		}
	}

	pub fn set_accepting(&mut self, accepting: bool) {
		self.accepting = accepting;
	}

	pub fn requests(&self) -> &[PathBuf] {
		&self.requests
	}

	pub fn take_requests(&mut self) -> Vec<PathBuf> {
		std::mem::take(&mut self.requests)
	}
}

impl Default for FakeScreen {
	fn default() -> Self {
		Self::new()
	}
}

impl ScreenCapture for FakeScreen {
	fn capture(&mut self, path: &Path) -> Result<(), CaptureError> {
		if !self.accepting {
			return Err(CaptureError::new("renderer unavailable"));
		}
		self.requests.push(path.to_path_buf());
		Ok(())
	}
}

type Member = Box<dyn FnMut(&Value) -> Result<Value, String> + Send>;

struct FakeObject {
	name: String,
	label: String,
	members: HashMap<String, Member>,
}

/// Object graph with named actors and scripted callable members.
///
/// Paths follow the `/Game/Maps/<Map>.<Map>:PersistentLevel.<Name>` shape.
pub struct FakeWorld {
	map: String,
	objects: Vec<Option<FakeObject>>,
}

impl FakeWorld {
	pub fn new(map: impl Into<String>) -> Self {
		Self {
			map: map.into(),
			objects: Vec::new(),
		}
	}

	pub fn spawn(&mut self, name: impl Into<String>, label: impl Into<String>) -> ObjectHandle {
		self.objects.push(Some(FakeObject {
			name: name.into(),
			label: label.into(),
			members: HashMap::new(),
		}));
		ObjectHandle((self.objects.len() - 1) as u64)
	}

	/// Registers a callable member on `object`.
	pub fn on(&mut self, object: ObjectHandle, member: impl Into<String>, f: impl FnMut(&Value) -> Result<Value, String> + Send + 'static) -> bool {
		match self.get_mut(object) {
			Some(obj) => {
				obj.members.insert(member.into(), Box::new(f));
				true
			}
			None => false,
		}
	}

	pub fn destroy(&mut self, object: ObjectHandle) -> bool {
		match self.objects.get_mut(object.0 as usize) {
			Some(slot) => slot.take().is_some(),
			None => false,
		}
	}

	pub fn level_prefix(&self) -> String {
		format!("/Game/Maps/{map}.{map}:PersistentLevel", map = self.map)
	}

	fn get(&self, object: ObjectHandle) -> Option<&FakeObject> {
		self.objects.get(object.0 as usize)?.as_ref()
	}

	fn get_mut(&mut self, object: ObjectHandle) -> Option<&mut FakeObject> {
		self.objects.get_mut(object.0 as usize)?.as_mut()
	}
}

impl std::fmt::Debug for FakeWorld {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FakeWorld")
			.field("map", &self.map)
			.field("objects", &self.objects.iter().flatten().map(|o| o.name.as_str()).collect::<Vec<_>>())
			.finish()
	}
}

impl ObjectGraph for FakeWorld {
	fn enumerate(&self) -> Vec<ObjectHandle> {
		self.objects
			.iter()
			.enumerate()
			.filter(|(_, slot)| slot.is_some())
			.map(|(index, _)| ObjectHandle(index as u64))
			.collect()
	}

	fn name(&self, object: ObjectHandle) -> Option<&str> {
		self.get(object).map(|o| o.name.as_str())
	}

	fn label(&self, object: ObjectHandle) -> Option<&str> {
		self.get(object).map(|o| o.label.as_str())
	}

	fn path(&self, object: ObjectHandle) -> Option<String> {
		self.get(object).map(|o| format!("{}.{}", self.level_prefix(), o.name))
	}

	fn resolve_path(&self, path: &str) -> Option<ObjectHandle> {
		let name = path.strip_prefix(&self.level_prefix())?.strip_prefix('.')?;
		self.enumerate().into_iter().find(|object| self.name(*object) == Some(name))
	}

	fn invoke(&mut self, object: ObjectHandle, member: &str, args: &Value) -> Result<Value, InvokeError> {
		let obj = self.get_mut(object).ok_or_else(|| InvokeError::Failed("object was destroyed".into()))?;
		let f = obj.members.get_mut(member).ok_or_else(|| InvokeError::MemberNotFound(member.to_string()))?;
		f(args).map_err(InvokeError::Failed)
	}
}
