//! Automation identity registry.
//!
//! Associates externally-addressable ids with widgets whose own types know
//! nothing about automation. Entries are keyed by generational handles, so a
//! destroyed widget can never be observed through the registry: every read
//! checks liveness against the host tree, and stale entries are dropped
//! lazily by [`IdentityRegistry::prune`] or eagerly by
//! [`IdentityRegistry::remove`] when the host reports a destruction.
//!
//! The registry must only be touched from the application's simulation
//! context. It carries no locks and is `!Sync`.

use std::cell::Cell;
use std::collections::HashMap;
use std::marker::PhantomData;

use tracing::{trace, warn};

use crate::host::{ElementHandle, UiTree};

#[derive(Debug, Default)]
pub struct IdentityRegistry {
	entries: HashMap<ElementHandle, String>,
	_single_context: PhantomData<Cell<()>>,
}

impl IdentityRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the automation id of `element`.
	///
	/// An absent or destroyed element is logged and ignored. An empty `id`
	/// clears the element's entry. Otherwise any previous id is replaced.
	///
	/// Ids should be unique among live widgets. If two widgets share one,
	/// the locator deterministically returns the first in traversal order.
	pub fn assign(&mut self, tree: &dyn UiTree, element: Option<ElementHandle>, id: &str) {
		let Some(element) = element.filter(|e| tree.is_live(*e)) else {
			warn!(target: "playbridge.registry", %id, "assign called with absent widget");
			return;
		};

		if id.is_empty() {
			self.entries.remove(&element);
		} else {
			self.entries.insert(element, id.to_string());
		}

		trace!(
			target: "playbridge.registry",
			element = %element,
			name = tree.name(element).unwrap_or_default(),
			%id,
			"automation id assigned"
		);
	}

	/// Automation id of `element`, or `None` if absent, destroyed or untagged.
	pub fn lookup<'a>(&'a self, tree: &dyn UiTree, element: Option<ElementHandle>) -> Option<&'a str> {
		let element = element?;
		if !tree.is_live(element) {
			return None;
		}
		self.entries.get(&element).map(String::as_str)
	}

	/// Drops the entry for `element`. Hosts that get destruction callbacks
	/// call this eagerly; others rely on [`prune`](Self::prune).
	pub fn remove(&mut self, element: ElementHandle) -> Option<String> {
		self.entries.remove(&element)
	}

	/// Removes entries whose widget has been destroyed. Returns how many
	/// were dropped.
	pub fn prune(&mut self, tree: &dyn UiTree) -> usize {
		let before = self.entries.len();
		self.entries.retain(|element, _| tree.is_live(*element));
		let pruned = before - self.entries.len();
		if pruned > 0 {
			trace!(target: "playbridge.registry", pruned, "stale entries pruned");
		}
		pruned
	}

	/// Live entries, ordered by handle.
	pub fn live_entries<'a>(&'a self, tree: &dyn UiTree) -> Vec<(ElementHandle, &'a str)> {
		let mut live: Vec<_> = self
			.entries
			.iter()
			.filter(|(element, _)| tree.is_live(**element))
			.map(|(element, id)| (*element, id.as_str()))
			.collect();
		live.sort_by_key(|(element, _)| *element);
		live
	}

	/// Number of entries whose widget is still alive.
	pub fn len_live(&self, tree: &dyn UiTree) -> usize {
		self.entries.keys().filter(|element| tree.is_live(**element)).count()
	}

	/// Number of stored entries, including not-yet-pruned stale ones.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
