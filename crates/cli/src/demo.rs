//! Headless demo host served by `pbridge serve`.
//!
//! A login screen (user field, password field, login button, hidden error
//! banner) that turns into a lobby once a user name is submitted, plus a
//! small level with a door, a game mode and a frog. Input is consumed on
//! the next frame, as a real UI would, and screenshot requests are written
//! as placeholder images.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use playbridge::fake::{FakeInput, FakeScreen, FakeWorld};
use playbridge::{ElementHandle, Host, IdentityRegistry, InputEvent, Key, KeyChord, Locator, OwnerId, UiTree, Visibility, WidgetSpec, WidgetTree};
use playbridge_runtime::Application;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

pub const DEMO_MAP: &str = "DemoMap";

/// 1x1 transparent PNG.
const PLACEHOLDER_PNG: &[u8] = &[
	0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06,
	0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D,
	0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

struct LoginScreen {
	root: ElementHandle,
	user: ElementHandle,
	password: ElementHandle,
	button: ElementHandle,
	error: ElementHandle,
}

pub struct DemoApp {
	tree: WidgetTree,
	registry: IdentityRegistry,
	input: FakeInput,
	screen: FakeScreen,
	world: FakeWorld,
	player: OwnerId,
	login: Option<LoginScreen>,
	fields: HashMap<ElementHandle, String>,
	score: Arc<AtomicI64>,
}

impl DemoApp {
	pub fn new() -> Self {
		let mut tree = WidgetTree::new();
		let player = tree.add_owner();
		let mut app = Self {
			tree,
			registry: IdentityRegistry::new(),
			input: FakeInput::new(),
			screen: FakeScreen::new(),
			world: FakeWorld::new(DEMO_MAP),
			player,
			login: None,
			fields: HashMap::new(),
			score: Arc::new(AtomicI64::new(0)),
		};
		app.build_login();
		app.populate_level();
		app
	}

	/// `true` once the lobby has replaced the login screen.
	pub fn logged_in(&self) -> bool {
		self.login.is_none()
	}

	/// Text typed into the field tagged `id`.
	pub fn field_text(&self, id: &str) -> Option<&str> {
		let element = Locator::new(&self.tree, &self.registry).find_by_id(id)?;
		self.fields.get(&element).map(String::as_str)
	}

	pub fn score(&self) -> i64 {
		self.score.load(Ordering::SeqCst)
	}

	fn build_login(&mut self) {
		let Some(root) = self.tree.spawn_root(self.player, WidgetSpec::new("LoginScreen")) else {
			return;
		};
		let spawned = (
			self.tree.spawn_child(root, WidgetSpec::new("UserField").text_input()),
			self.tree.spawn_child(root, WidgetSpec::new("PasswordField").text_input()),
			self.tree.spawn_child(root, WidgetSpec::new("LoginButton")),
			self.tree.spawn_child(root, WidgetSpec::new("ErrorBanner").visibility(Visibility::Collapsed)),
		);
		let (Some(user), Some(password), Some(button), Some(error)) = spawned else {
			return;
		};

		for (element, id) in [(root, "login-screen"), (user, "user-field"), (password, "password-field"), (button, "login-btn"), (error, "login-error")] {
			self.registry.assign(&self.tree, Some(element), id);
		}
		self.login = Some(LoginScreen {
			root,
			user,
			password,
			button,
			error,
		});
	}

	fn build_lobby(&mut self) {
		let Some(root) = self.tree.spawn_root(self.player, WidgetSpec::new("Lobby")) else {
			return;
		};
		let title = self.tree.spawn_child(root, WidgetSpec::new("LobbyTitle"));
		let play = self.tree.spawn_child(root, WidgetSpec::new("PlayButton"));
		self.registry.assign(&self.tree, Some(root), "lobby");
		self.registry.assign(&self.tree, title, "lobby-title");
		self.registry.assign(&self.tree, play, "play-btn");
	}

	fn populate_level(&mut self) {
		self.world.spawn("Door_1", "Front Door");
		self.world.spawn("FrogCharacter_0", "Frog");

		let game_mode = self.world.spawn("GameMode_0", "GameMode");
		let score = Arc::clone(&self.score);
		self.world.on(game_mode, "GetScore", move |_| Ok(json!({ "score": score.load(Ordering::SeqCst) })));
		let score = Arc::clone(&self.score);
		self.world.on(game_mode, "SetScore", move |args| {
			let value = args.get("score").and_then(Value::as_i64).ok_or("SetScore expects an integer 'score'")?;
			score.store(value, Ordering::SeqCst);
			Ok(Value::Null)
		});
	}

	fn handle_input(&mut self, event: InputEvent) {
		match event {
			InputEvent::Click { target } => {
				if self.tree.accepts_text(target) {
					self.tree.set_focus(Some(target));
				} else if self.login.as_ref().is_some_and(|login| login.button == target) {
					self.submit_login();
				}
			}
			InputEvent::Text { target, text } => {
				self.fields.entry(target).or_default().push_str(&text);
			}
			InputEvent::Key { chord } => self.handle_key(chord),
		}
	}

	fn handle_key(&mut self, chord: KeyChord) {
		if !chord.modifiers.is_empty() {
			return;
		}
		match chord.key {
			Key::Enter => self.submit_login(),
			Key::Escape => {
				self.tree.set_focus(None);
			}
			Key::BackSpace => {
				if let Some(text) = self.tree.focused().and_then(|focused| self.fields.get_mut(&focused)) {
					text.pop();
				}
			}
			Key::Tab => {
				if let Some(login) = &self.login {
					let next = if self.tree.focused() == Some(login.user) { login.password } else { login.user };
					self.tree.set_focus(Some(next));
				}
			}
			_ => {}
		}
	}

	fn submit_login(&mut self) {
		let Some(login) = self.login.take() else {
			return;
		};
		let user = self.fields.get(&login.user).map(String::as_str).unwrap_or_default();
		if user.trim().is_empty() {
			self.tree.set_visibility(login.error, Visibility::Visible);
			self.login = Some(login);
			return;
		}

		info!(target: "playbridge", user, "demo login");
		self.fields.remove(&login.user);
		self.fields.remove(&login.password);
		self.tree.destroy(login.root);
		self.build_lobby();
	}

	fn flush_captures(&mut self) {
		for path in self.screen.take_requests() {
			match write_placeholder(&path) {
				Ok(()) => debug!(target: "playbridge", path = %path.display(), "screenshot written"),
				Err(err) => warn!(target: "playbridge", path = %path.display(), error = %err, "screenshot write failed"),
			}
		}
	}
}

impl Default for DemoApp {
	fn default() -> Self {
		Self::new()
	}
}

impl Application for DemoApp {
	fn tick(&mut self, _dt: Duration) {
		for event in self.input.take_events() {
			self.handle_input(event);
		}
		self.flush_captures();
	}

	fn host(&mut self) -> Host<'_> {
		Host {
			ui: &self.tree,
			registry: &self.registry,
			input: &mut self.input,
			screen: &mut self.screen,
			world: &mut self.world,
		}
	}

	fn identities(&mut self) -> (&dyn UiTree, &mut IdentityRegistry) {
		(&self.tree, &mut self.registry)
	}
}

fn write_placeholder(path: &Path) -> std::io::Result<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, PLACEHOLDER_PNG)
}
