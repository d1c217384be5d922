//! Resolution of automation ids and actor names to live handles.

use crate::host::{ElementHandle, ObjectGraph, ObjectHandle, UiTree};
use crate::registry::IdentityRegistry;

/// Searches the live UI tree for tagged widgets.
///
/// Traversal order is fixed: owners in registration order, then each
/// owner's roots in insertion order, each subtree in pre-order. The first
/// widget whose registry entry equals the requested id wins, so duplicate
/// ids still give a reproducible answer.
pub struct Locator<'a> {
	tree: &'a dyn UiTree,
	registry: &'a IdentityRegistry,
}

impl<'a> Locator<'a> {
	pub fn new(tree: &'a dyn UiTree, registry: &'a IdentityRegistry) -> Self {
		Self { tree, registry }
	}

	pub fn find_by_id(&self, id: &str) -> Option<ElementHandle> {
		if id.is_empty() || self.registry.is_empty() {
			return None;
		}

		let mut found = None;
		self.walk(|element| {
			if self.registry.lookup(self.tree, Some(element)) == Some(id) {
				found = Some(element);
				false
			} else {
				true
			}
		});
		found
	}

	/// Whether `element` and all of its ancestors are rendered.
	pub fn is_displayed(&self, element: ElementHandle) -> bool {
		let mut current = Some(element);
		while let Some(handle) = current {
			match self.tree.visibility(handle) {
				Some(visibility) if visibility.is_rendered() => current = self.tree.parent(handle),
				_ => return false,
			}
		}
		true
	}

	/// Pre-order walk over every live widget; stops when `visit` returns `false`.
	fn walk(&self, mut visit: impl FnMut(ElementHandle) -> bool) {
		for owner in self.tree.owners() {
			let mut stack: Vec<ElementHandle> = self.tree.roots(owner);
			stack.reverse();
			while let Some(element) = stack.pop() {
				if !visit(element) {
					return;
				}
				let mut children = self.tree.children(element);
				children.reverse();
				stack.extend(children);
			}
		}
	}
}

/// Finds the first object whose programmatic name or label equals `name`
/// exactly, in the host's enumeration order. Widget ids are never consulted.
pub fn find_object_by_name_or_label(world: &dyn ObjectGraph, name: &str) -> Option<ObjectHandle> {
	if name.is_empty() {
		return None;
	}
	world
		.enumerate()
		.into_iter()
		.find(|object| world.name(*object) == Some(name) || world.label(*object) == Some(name))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fake::FakeWorld;
	use crate::host::Visibility;
	use crate::tree::{WidgetSpec, WidgetTree};

	#[test]
	fn pre_order_first_match_wins_for_duplicates() {
		let mut tree = WidgetTree::new();
		let p1 = tree.add_owner();
		let p2 = tree.add_owner();
		let panel = tree.spawn_root(p1, WidgetSpec::new("Panel")).unwrap();
		let deep = tree.spawn_child(panel, WidgetSpec::new("Deep")).unwrap();
		let sibling = tree.spawn_root(p1, WidgetSpec::new("Sibling")).unwrap();
		let other_player = tree.spawn_root(p2, WidgetSpec::new("Other")).unwrap();

		let mut registry = IdentityRegistry::new();
		registry.assign(&tree, Some(other_player), "dup");
		registry.assign(&tree, Some(sibling), "dup");
		registry.assign(&tree, Some(deep), "dup");

		let locator = Locator::new(&tree, &registry);
		for _ in 0..10 {
			assert_eq!(locator.find_by_id("dup"), Some(deep));
		}
	}

	#[test]
	fn second_owner_is_searched() {
		let mut tree = WidgetTree::new();
		let p1 = tree.add_owner();
		let p2 = tree.add_owner();
		tree.spawn_root(p1, WidgetSpec::new("Hud")).unwrap();
		let menu = tree.spawn_root(p2, WidgetSpec::new("Menu")).unwrap();

		let mut registry = IdentityRegistry::new();
		registry.assign(&tree, Some(menu), "p2-menu");
		assert_eq!(Locator::new(&tree, &registry).find_by_id("p2-menu"), Some(menu));
	}

	#[test]
	fn empty_and_unknown_ids_are_not_found() {
		let mut tree = WidgetTree::new();
		let owner = tree.add_owner();
		let w = tree.spawn_root(owner, WidgetSpec::new("W")).unwrap();
		let mut registry = IdentityRegistry::new();
		registry.assign(&tree, Some(w), "w");

		let locator = Locator::new(&tree, &registry);
		assert_eq!(locator.find_by_id(""), None);
		assert_eq!(locator.find_by_id("nonexistent"), None);
	}

	#[test]
	fn collapsed_ancestor_hides_descendant() {
		let mut tree = WidgetTree::new();
		let owner = tree.add_owner();
		let panel = tree.spawn_root(owner, WidgetSpec::new("Panel")).unwrap();
		let label = tree.spawn_child(panel, WidgetSpec::new("Label").visibility(Visibility::HitTestInvisible)).unwrap();
		let registry = IdentityRegistry::new();

		assert!(Locator::new(&tree, &registry).is_displayed(label));
		tree.set_visibility(panel, Visibility::Collapsed);
		assert!(!Locator::new(&tree, &registry).is_displayed(label));
	}

	#[test]
	fn object_lookup_is_exact_on_name_or_label() {
		let mut world = FakeWorld::new("TestMap");
		let door = world.spawn("Door_1", "Front Door");
		world.spawn("Door_10", "Back Door");

		assert_eq!(find_object_by_name_or_label(&world, "Door_1"), Some(door));
		assert_eq!(find_object_by_name_or_label(&world, "Front Door"), Some(door));
		assert_eq!(find_object_by_name_or_label(&world, "Door"), None);
		assert_eq!(find_object_by_name_or_label(&world, "door_1"), None);
		assert_eq!(find_object_by_name_or_label(&world, ""), None);
	}
}
