mod common;

use std::time::Duration;

use common::Fixture;
use playbridge::protocol::ErrorKind;
use playbridge::{InputEvent, Key, Outcome, UiTree, Visibility, WidgetSpec};
use serde_json::{Value, json};

fn login_screen(fx: &mut Fixture) -> (playbridge::ElementHandle, playbridge::ElementHandle) {
	let player = fx.tree.add_owner();
	let screen = fx.tree.spawn_root(player, WidgetSpec::new("LoginScreen")).unwrap();
	let user = fx.tree.spawn_child(screen, WidgetSpec::new("UserField").text_input()).unwrap();
	let button = fx.tree.spawn_child(screen, WidgetSpec::new("LoginButton")).unwrap();
	fx.registry.assign(&fx.tree, Some(user), "user-field");
	fx.registry.assign(&fx.tree, Some(button), "login-btn");
	(user, button)
}

#[test]
fn ping_is_stable_within_a_session() {
	let mut fx = Fixture::new();
	let first = fx.send("Ping", Value::Null);
	let second = fx.send("Ping", json!({}));

	assert!(first.ok);
	assert_eq!(first, second);
	let result = first.result.unwrap();
	assert_eq!(result["version"], "0.1.0");
	assert_eq!(result["session"].as_str().unwrap(), fx.dispatcher.session().id());
}

#[test]
fn click_by_id_found_and_missing() {
	let mut fx = Fixture::new();
	let (_, button) = login_screen(&mut fx);

	let hit = fx.send("ClickById", json!({"id": "login-btn"}));
	assert!(hit.ok);
	assert_eq!(hit.result, Some(json!(true)));
	assert_eq!(fx.input.events(), &[InputEvent::Click { target: button }]);

	let miss = fx.send("ClickById", json!({"id": "nonexistent"}));
	assert!(!miss.ok);
	assert_eq!(miss.error, Some(ErrorKind::NotFound));
	assert_eq!(fx.input.events().len(), 1);
}

#[test]
fn click_reports_rejected_injection() {
	let mut fx = Fixture::new();
	login_screen(&mut fx);
	fx.input.set_accepting(false);

	let resp = fx.send("ClickById", json!({"id": "login-btn"}));
	assert!(!resp.ok);
	assert_eq!(resp.error, Some(ErrorKind::InjectionRejected));
}

#[test]
fn click_with_empty_id_is_invalid() {
	let mut fx = Fixture::new();
	let resp = fx.send("ClickById", json!({"id": ""}));
	assert_eq!(resp.error, Some(ErrorKind::InvalidArgument));
}

#[test]
fn type_text_targets_focused_field() {
	let mut fx = Fixture::new();
	let (user, button) = login_screen(&mut fx);

	let unfocused = fx.send("TypeText", json!({"text": "alice"}));
	assert_eq!(unfocused.error, Some(ErrorKind::InjectionRejected));

	fx.tree.set_focus(Some(button));
	let not_editable = fx.send("TypeText", json!({"text": "alice"}));
	assert_eq!(not_editable.error, Some(ErrorKind::InjectionRejected));

	fx.tree.set_focus(Some(user));
	let typed = fx.send("TypeText", json!({"text": "alice"}));
	assert!(typed.ok);
	let empty = fx.send("TypeText", json!({"text": ""}));
	assert!(empty.ok);
	assert_eq!(
		fx.input.take_events(),
		vec![
			InputEvent::Text {
				target: user,
				text: "alice".into()
			},
			InputEvent::Text {
				target: user,
				text: String::new()
			},
		]
	);
}

#[test]
fn press_key_parses_chord() {
	let mut fx = Fixture::new();

	let ok = fx.send("PressKey", json!({"keyChord": "Ctrl+Enter"}));
	assert!(ok.ok);
	match &fx.input.events()[0] {
		InputEvent::Key { chord } => {
			assert!(chord.modifiers.ctrl);
			assert_eq!(chord.key, Key::Enter);
		}
		other => panic!("unexpected event {other:?}"),
	}

	let bad = fx.send("PressKey", json!({"keyChord": "Hyper+Q"}));
	assert!(!bad.ok);
	assert_eq!(bad.error, Some(ErrorKind::InvalidArgument));
	assert_eq!(fx.input.events().len(), 1);
}

#[test]
fn exists_and_visible_never_fail() {
	let mut fx = Fixture::new();
	let (user, _) = login_screen(&mut fx);

	let exists = fx.send("ElementExists", json!({"id": "user-field"}));
	assert_eq!((exists.ok, exists.result), (true, Some(json!(true))));

	let missing = fx.send("ElementExists", json!({"id": "never-assigned"}));
	assert_eq!((missing.ok, missing.result), (true, Some(json!(false))));

	assert_eq!(fx.send("IsVisible", json!({"id": "user-field"})).result, Some(json!(true)));

	fx.tree.set_visibility(user, Visibility::SelfHitTestInvisible);
	assert_eq!(fx.send("IsVisible", json!({"id": "user-field"})).result, Some(json!(true)));

	fx.tree.set_visibility(user, Visibility::Hidden);
	assert_eq!(fx.send("IsVisible", json!({"id": "user-field"})).result, Some(json!(false)));

	let absent = fx.send("IsVisible", json!({"id": "never-assigned"}));
	assert_eq!((absent.ok, absent.result), (true, Some(json!(false))));
}

#[test]
fn queries_do_not_inject_input() {
	let mut fx = Fixture::new();
	login_screen(&mut fx);
	for _ in 0..1000 {
		fx.send("ElementExists", json!({"id": "login-btn"}));
		fx.send("IsVisible", json!({"id": "login-btn"}));
		fx.send("Ping", Value::Null);
	}
	assert!(fx.input.events().is_empty());
	assert!(fx.screen.requests().is_empty());
}

#[test]
fn destroyed_widget_is_no_longer_found() {
	let mut fx = Fixture::new();
	let (_, button) = login_screen(&mut fx);
	fx.tree.destroy(button);

	let resp = fx.send("ClickById", json!({"id": "login-btn"}));
	assert_eq!(resp.error, Some(ErrorKind::NotFound));
	assert_eq!(fx.send("ElementExists", json!({"id": "login-btn"})).result, Some(json!(false)));
	assert!(!fx.tree.is_live(button));
}

#[test]
fn screenshot_returns_absolute_path_and_creates_directory() {
	let mut fx = Fixture::new();
	let resp = fx.send("Screenshot", json!({"path": "shots/a.png"}));
	assert!(resp.ok, "{resp:?}");

	let path = std::path::PathBuf::from(resp.result_str().unwrap());
	assert!(path.is_absolute());
	assert!(path.ends_with("shots/a.png"));
	assert!(path.parent().unwrap().is_dir());
	assert_eq!(fx.screen.requests(), &[path]);
}

#[test]
fn screenshot_with_empty_path_fails_with_empty_result() {
	let mut fx = Fixture::new();
	let resp = fx.send("Screenshot", json!({"path": ""}));
	assert!(!resp.ok);
	assert_eq!(resp.result_str(), Some(""));
	assert_eq!(resp.error, Some(ErrorKind::InvalidArgument));
	assert!(fx.screen.requests().is_empty());
}

#[test]
fn find_actor_exact_match_only() {
	let mut fx = Fixture::new();
	fx.world.spawn("Door_10", "Side Door");
	let door = fx.world.spawn("Door_2", "Front Door");

	let missing = fx.send("FindActorByName", json!({"name": "Door_1"}));
	assert!(!missing.ok);
	assert_eq!(missing.result_str(), Some(""));
	assert_eq!(missing.error, Some(ErrorKind::NotFound));

	let by_label = fx.send("FindActorByName", json!({"name": "Front Door"}));
	assert_eq!(by_label.result_str(), Some("/Game/Maps/TestMap.TestMap:PersistentLevel.Door_2"));
	assert_eq!(by_label.result_str().map(String::from), playbridge::ObjectGraph::path(&fx.world, door));
}

#[test]
fn widget_ids_and_actor_names_are_separate_namespaces() {
	let mut fx = Fixture::new();
	login_screen(&mut fx);
	fx.world.spawn("Door_1", "Door_1");

	assert_eq!(fx.send("FindActorByName", json!({"name": "login-btn"})).error, Some(ErrorKind::NotFound));
	assert_eq!(fx.send("ElementExists", json!({"id": "Door_1"})).result, Some(json!(false)));
}

#[test]
fn call_function_round_trips_return_value() {
	let mut fx = Fixture::new();
	let gm = fx.world.spawn("GameMode_0", "GameMode");
	fx.world.on(gm, "GetScore", |args| Ok(json!({"score": 40, "echo": args.clone()})));
	let path = fx.world.level_prefix() + ".GameMode_0";

	let resp = fx.send(
		"CallFunction",
		json!({"objectPath": path, "functionName": "GetScore", "paramsJson": "{\"lane\":3}"}),
	);
	assert!(resp.ok);
	let decoded: Value = serde_json::from_str(resp.result_str().unwrap()).unwrap();
	assert_eq!(decoded, json!({"score": 40, "echo": {"lane": 3}}));

	let no_params = fx.send("CallFunction", json!({"objectPath": path, "functionName": "GetScore"}));
	let decoded: Value = serde_json::from_str(no_params.result_str().unwrap()).unwrap();
	assert_eq!(decoded["echo"], json!({}));
}

#[test]
fn call_function_failures_carry_error_object() {
	let mut fx = Fixture::new();
	let gm = fx.world.spawn("GameMode_0", "GameMode");
	fx.world.on(gm, "Explode", |_| Err("boom".to_string()));
	let path = fx.world.level_prefix() + ".GameMode_0";

	let cases = [
		(json!({"objectPath": "/Game/Nowhere", "functionName": "Explode"}), ErrorKind::NotFound),
		(json!({"objectPath": path, "functionName": "Missing"}), ErrorKind::NotFound),
		(json!({"objectPath": path, "functionName": "Explode"}), ErrorKind::InvocationError),
		(json!({"objectPath": path, "functionName": "Explode", "paramsJson": "{not json"}), ErrorKind::InvalidArgument),
	];

	for (args, kind) in cases {
		let resp = fx.send("CallFunction", args);
		assert!(!resp.ok);
		assert_eq!(resp.error, Some(kind));
		let result = resp.result.unwrap();
		assert_eq!(result["status"], "error");
		assert!(result["detail"].as_str().is_some_and(|d| !d.is_empty()));
	}
}

#[test]
fn wait_boundaries_through_dispatch() {
	let mut fx = Fixture::new();

	for (seconds, expect) in [(0.0, "noop"), (-1.0, "noop"), (29.999, "suspend"), (30.0, "reject")] {
		let outcome = fx.outcome("WaitForSeconds", json!({"seconds": seconds}));
		match (expect, outcome) {
			("noop", Outcome::Complete(resp)) => assert!(resp.ok),
			("suspend", Outcome::Suspend { duration, response }) => {
				assert_eq!(duration, Duration::from_secs_f64(29.999));
				assert!(response.ok);
			}
			("reject", Outcome::Complete(resp)) => assert_eq!(resp.error, Some(ErrorKind::InvalidArgument)),
			(expect, outcome) => panic!("seconds={seconds}: expected {expect}, got {outcome:?}"),
		}
	}
}

#[test]
fn unknown_and_malformed_requests() {
	let mut fx = Fixture::new();
	assert_eq!(fx.send("Teleport", Value::Null).error, Some(ErrorKind::UnknownCommand));
	assert_eq!(fx.send("ClickById", json!({"identifier": "x"})).error, Some(ErrorKind::MalformedRequest));
}
