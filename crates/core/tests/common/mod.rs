//! Shared fixture wiring a widget tree, registry and fake collaborators to a
//! dispatcher.

#![allow(dead_code)]

use playbridge::fake::{FakeInput, FakeScreen, FakeWorld};
use playbridge::protocol::{Request, Response};
use playbridge::{Dispatcher, EvidenceCapture, Host, IdentityRegistry, Outcome, Session, WidgetTree};
use serde_json::Value;
use tempfile::TempDir;

pub struct Fixture {
	pub tree: WidgetTree,
	pub registry: IdentityRegistry,
	pub input: FakeInput,
	pub screen: FakeScreen,
	pub world: FakeWorld,
	pub dispatcher: Dispatcher,
	pub output: TempDir,
}

impl Fixture {
	pub fn new() -> Self {
		let output = tempfile::tempdir().expect("tempdir");
		let evidence = EvidenceCapture::new(output.path()).expect("output root");
		Self {
			tree: WidgetTree::new(),
			registry: IdentityRegistry::new(),
			input: FakeInput::new(),
			screen: FakeScreen::new(),
			world: FakeWorld::new("TestMap"),
			dispatcher: Dispatcher::new(Session::new("0.1.0"), evidence),
			output,
		}
	}

	pub fn outcome(&mut self, command: &str, args: Value) -> Outcome {
		let mut host = Host {
			ui: &self.tree,
			registry: &self.registry,
			input: &mut self.input,
			screen: &mut self.screen,
			world: &mut self.world,
		};
		self.dispatcher.handle(&Request::new(command, args), &mut host)
	}

	/// Dispatches and returns the response, ignoring any suspension.
	pub fn send(&mut self, command: &str, args: Value) -> Response {
		self.outcome(command, args).into_response()
	}
}
