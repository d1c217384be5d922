//! Generational widget arena.
//!
//! `WidgetTree` is a reference host UI tree: widgets live in recycled slots,
//! each slot carries a generation that is bumped on destruction, and trees
//! hang off owners in registration order. Headless hosts and tests use it
//! directly; engine integrations implement [`UiTree`] over their own tree.

use tracing::trace;

use crate::host::{ElementHandle, OwnerId, UiTree, Visibility};

/// Construction parameters for a widget.
#[derive(Debug, Clone)]
pub struct WidgetSpec {
	name: String,
	visibility: Visibility,
	accepts_text: bool,
}

impl WidgetSpec {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			visibility: Visibility::Visible,
			accepts_text: false,
		}
	}

	pub fn visibility(mut self, visibility: Visibility) -> Self {
		self.visibility = visibility;
		self
	}

	/// Marks the widget as an editable text field.
	pub fn text_input(mut self) -> Self {
		self.accepts_text = true;
		self
	}
}

#[derive(Debug)]
struct Node {
	name: String,
	owner: OwnerId,
	parent: Option<ElementHandle>,
	children: Vec<ElementHandle>,
	visibility: Visibility,
	accepts_text: bool,
}

#[derive(Debug, Default)]
struct Slot {
	generation: u32,
	node: Option<Node>,
}

#[derive(Debug)]
struct Owner {
	id: OwnerId,
	roots: Vec<ElementHandle>,
}

#[derive(Debug, Default)]
pub struct WidgetTree {
	slots: Vec<Slot>,
	free: Vec<u32>,
	owners: Vec<Owner>,
	next_owner: u32,
	focus: Option<ElementHandle>,
}

impl WidgetTree {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a new owner; owners are searched in registration order.
	pub fn add_owner(&mut self) -> OwnerId {
		let id = OwnerId(self.next_owner);
		self.next_owner += 1;
		self.owners.push(Owner { id, roots: Vec::new() });
		id
	}

	/// Removes an owner and destroys every widget it owns.
	pub fn remove_owner(&mut self, owner: OwnerId) -> bool {
		let Some(pos) = self.owners.iter().position(|o| o.id == owner) else {
			return false;
		};
		let roots = std::mem::take(&mut self.owners[pos].roots);
		for root in roots {
			self.release(root);
		}
		self.owners.remove(pos);
		true
	}

	/// Adds a top-level widget under `owner`.
	pub fn spawn_root(&mut self, owner: OwnerId, spec: WidgetSpec) -> Option<ElementHandle> {
		let pos = self.owners.iter().position(|o| o.id == owner)?;
		let handle = self.alloc(owner, None, spec);
		self.owners[pos].roots.push(handle);
		Some(handle)
	}

	/// Adds a widget as the last child of `parent`.
	pub fn spawn_child(&mut self, parent: ElementHandle, spec: WidgetSpec) -> Option<ElementHandle> {
		let owner = self.node(parent)?.owner;
		let handle = self.alloc(owner, Some(parent), spec);
		self.node_mut(parent)?.children.push(handle);
		Some(handle)
	}

	/// Destroys `element` and its whole subtree. Returns `false` for a
	/// handle that was already stale.
	pub fn destroy(&mut self, element: ElementHandle) -> bool {
		let Some(node) = self.node(element) else {
			return false;
		};
		let (owner, parent) = (node.owner, node.parent);

		match parent {
			Some(parent) => {
				if let Some(parent) = self.node_mut(parent) {
					parent.children.retain(|child| *child != element);
				}
			}
			None => {
				if let Some(owner) = self.owners.iter_mut().find(|o| o.id == owner) {
					owner.roots.retain(|root| *root != element);
				}
			}
		}

		self.release(element);
		true
	}

	pub fn set_visibility(&mut self, element: ElementHandle, visibility: Visibility) -> bool {
		match self.node_mut(element) {
			Some(node) => {
				node.visibility = visibility;
				true
			}
			None => false,
		}
	}

	/// Moves keyboard focus. Focusing a stale handle is refused.
	pub fn set_focus(&mut self, element: Option<ElementHandle>) -> bool {
		if let Some(element) = element {
			if !self.is_live(element) {
				return false;
			}
		}
		self.focus = element;
		true
	}

	/// Number of live widgets.
	pub fn len(&self) -> usize {
		self.slots.iter().filter(|slot| slot.node.is_some()).count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn alloc(&mut self, owner: OwnerId, parent: Option<ElementHandle>, spec: WidgetSpec) -> ElementHandle {
		let node = Node {
			name: spec.name,
			owner,
			parent,
			children: Vec::new(),
			visibility: spec.visibility,
			accepts_text: spec.accepts_text,
		};

		let index = match self.free.pop() {
			Some(index) => index,
			None => {
				self.slots.push(Slot::default());
				(self.slots.len() - 1) as u32
			}
		};

		let slot = &mut self.slots[index as usize];
		slot.node = Some(node);
		ElementHandle::new(index, slot.generation)
	}

	/// Frees `element` and its descendants without touching the parent link.
	fn release(&mut self, element: ElementHandle) {
		let mut stack = vec![element];
		while let Some(handle) = stack.pop() {
			let Some(slot) = self.slots.get_mut(handle.index() as usize) else {
				continue;
			};
			if slot.generation != handle.generation() {
				continue;
			}
			let Some(node) = slot.node.take() else {
				continue;
			};
			slot.generation = slot.generation.wrapping_add(1);
			self.free.push(handle.index());
			if self.focus == Some(handle) {
				self.focus = None;
			}
			trace!(target: "playbridge.tree", element = %handle, name = %node.name, "widget destroyed");
			stack.extend(node.children);
		}
	}

	fn node(&self, element: ElementHandle) -> Option<&Node> {
		let slot = self.slots.get(element.index() as usize)?;
		if slot.generation != element.generation() {
			return None;
		}
		slot.node.as_ref()
	}

	fn node_mut(&mut self, element: ElementHandle) -> Option<&mut Node> {
		let slot = self.slots.get_mut(element.index() as usize)?;
		if slot.generation != element.generation() {
			return None;
		}
		slot.node.as_mut()
	}
}

impl UiTree for WidgetTree {
	fn is_live(&self, element: ElementHandle) -> bool {
		self.node(element).is_some()
	}

	fn owners(&self) -> Vec<OwnerId> {
		self.owners.iter().map(|o| o.id).collect()
	}

	fn roots(&self, owner: OwnerId) -> Vec<ElementHandle> {
		self.owners.iter().find(|o| o.id == owner).map(|o| o.roots.clone()).unwrap_or_default()
	}

	fn children(&self, element: ElementHandle) -> Vec<ElementHandle> {
		self.node(element).map(|n| n.children.clone()).unwrap_or_default()
	}

	fn parent(&self, element: ElementHandle) -> Option<ElementHandle> {
		self.node(element)?.parent
	}

	fn visibility(&self, element: ElementHandle) -> Option<Visibility> {
		self.node(element).map(|n| n.visibility)
	}

	fn focused(&self) -> Option<ElementHandle> {
		self.focus.filter(|f| self.is_live(*f))
	}

	fn accepts_text(&self, element: ElementHandle) -> bool {
		self.node(element).is_some_and(|n| n.accepts_text)
	}

	fn name(&self, element: ElementHandle) -> Option<&str> {
		self.node(element).map(|n| n.name.as_str())
	}
}
