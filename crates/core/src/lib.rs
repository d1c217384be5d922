//! Automation bridge core: identity registry, element locator and command
//! dispatcher for driving a live application from an external test driver.
//!
//! The host application owns its UI tree and object graph and exposes them
//! through the traits in [`host`]. The bridge never owns an element: the
//! [`IdentityRegistry`] maps generational [`ElementHandle`]s to automation
//! ids, and every command re-resolves its target through the [`Locator`].
//!
//! All types here are meant to live on the application's single simulation
//! context. Commands arriving from a transport thread must be marshaled onto
//! that context first (see `playbridge-runtime`).
//!
//! # Example
//!
//! ```ignore
//! let mut tree = WidgetTree::new();
//! let player = tree.add_owner();
//! let button = tree.spawn_root(player, WidgetSpec::new("LoginButton")).unwrap();
//!
//! let mut registry = IdentityRegistry::new();
//! registry.assign(&tree, Some(button), "login-btn");
//!
//! let locator = Locator::new(&tree, &registry);
//! assert_eq!(locator.find_by_id("login-btn"), Some(button));
//! ```

pub mod command;
pub mod dispatcher;
pub mod error;
pub mod evidence;
pub mod fake;
pub mod host;
pub mod keys;
pub mod locator;
pub mod registry;
pub mod session;
pub mod tree;

pub use command::{Command, CommandParseError};
pub use dispatcher::{Dispatcher, Host, Outcome};
pub use error::{BridgeError, Result};
pub use evidence::EvidenceCapture;
pub use host::{
	CaptureError, ElementHandle, InjectError, InputEvent, InputSink, InvokeError, ObjectGraph, ObjectHandle, OwnerId, ScreenCapture, UiTree, Visibility,
};
pub use keys::{Key, KeyChord, KeyChordError, Modifiers};
pub use locator::Locator;
pub use playbridge_protocol as protocol;
pub use registry::IdentityRegistry;
pub use session::Session;
pub use tree::{WidgetSpec, WidgetTree};
