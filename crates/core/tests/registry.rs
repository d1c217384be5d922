mod common;

use common::Fixture;
use playbridge::protocol::ErrorKind;
use playbridge::{Locator, UiTree, WidgetSpec};
use serde_json::json;

#[test]
fn churned_widgets_are_never_resolved() {
	let mut fx = Fixture::new();
	let player = fx.tree.add_owner();
	let root = fx.tree.spawn_root(player, WidgetSpec::new("Hud")).unwrap();

	for round in 0..200 {
		let id = format!("row-{round}");
		let row = fx.tree.spawn_child(root, WidgetSpec::new("Row")).unwrap();
		fx.registry.assign(&fx.tree, Some(row), &id);
		assert!(fx.send("ElementExists", json!({"id": id})).result_bool().unwrap());

		fx.tree.destroy(row);
		let resp = fx.send("ClickById", json!({"id": id}));
		assert_eq!(resp.error, Some(ErrorKind::NotFound), "round {round}");
	}

	// Slots were reused but every old handle is stale.
	assert_eq!(fx.tree.len(), 1);
	assert!(fx.input.events().is_empty());
	assert_eq!(fx.registry.len_live(&fx.tree), 0);
	assert_eq!(fx.registry.len(), 200);
	assert_eq!(fx.registry.prune(&fx.tree), 200);
	assert!(fx.registry.is_empty());
}

#[test]
fn reused_slot_does_not_inherit_old_id() {
	let mut fx = Fixture::new();
	let player = fx.tree.add_owner();
	let old = fx.tree.spawn_root(player, WidgetSpec::new("Dialog")).unwrap();
	fx.registry.assign(&fx.tree, Some(old), "dialog");
	fx.tree.destroy(old);

	let fresh = fx.tree.spawn_root(player, WidgetSpec::new("Dialog")).unwrap();
	assert_eq!(fresh.index(), old.index());
	assert_ne!(fresh, old);
	assert_eq!(fx.registry.lookup(&fx.tree, Some(fresh)), None);
	assert_eq!(Locator::new(&fx.tree, &fx.registry).find_by_id("dialog"), None);
}

#[test]
fn destroying_a_subtree_hides_descendant_ids() {
	let mut fx = Fixture::new();
	let player = fx.tree.add_owner();
	let menu = fx.tree.spawn_root(player, WidgetSpec::new("Menu")).unwrap();
	let panel = fx.tree.spawn_child(menu, WidgetSpec::new("Panel")).unwrap();
	let play = fx.tree.spawn_child(panel, WidgetSpec::new("Play")).unwrap();
	fx.registry.assign(&fx.tree, Some(play), "play-btn");

	fx.tree.destroy(menu);
	assert!(!fx.tree.is_live(play));
	assert_eq!(fx.send("IsVisible", json!({"id": "play-btn"})).result_bool(), Some(false));
	assert_eq!(fx.send("ClickById", json!({"id": "play-btn"})).error, Some(ErrorKind::NotFound));
}

#[test]
fn removed_owner_takes_its_widgets() {
	let mut fx = Fixture::new();
	let first = fx.tree.add_owner();
	let second = fx.tree.add_owner();
	let a = fx.tree.spawn_root(first, WidgetSpec::new("A")).unwrap();
	let b = fx.tree.spawn_root(second, WidgetSpec::new("B")).unwrap();
	fx.registry.assign(&fx.tree, Some(a), "shared");
	fx.registry.assign(&fx.tree, Some(b), "shared");

	assert_eq!(Locator::new(&fx.tree, &fx.registry).find_by_id("shared"), Some(a));
	fx.tree.remove_owner(first);
	assert_eq!(Locator::new(&fx.tree, &fx.registry).find_by_id("shared"), Some(b));
}
