//! Integration tests for RouterStore navigation, guards, and state transfer.

use parking_lot::Mutex;
use reinhardt_router_store::{
	HookError, HookOutcome, HookPhase, Route, RouterConfig, RouterError, RouterState, RouterStore,
	SerializedState,
};
use rstest::{fixture, rstest};
use std::error::Error as _;
use std::future::{Ready, ready};
use std::sync::Arc;

type Store = RouterStore<&'static str>;

fn internal_error(_from: RouterState) -> Ready<HookOutcome> {
	panic!("Internal error")
}

#[fixture]
fn routes() -> Vec<Route<&'static str>> {
	vec![
		Route::new("home", "/").with_view("home"),
		Route::new("department", "/departments/:id").with_view("department"),
		Route::new("gym", "/gym").with_view("gym"),
		Route::new("gasStation", "/gas-station").with_view("gasStation"),
		Route::new("notFound", "/not-found").with_view("notFound"),
		Route::new("work", "/work")
			.with_view("work")
			.before_exit(|_from| async { HookOutcome::redirect("gym") }),
		Route::new("mountains", "/mountains")
			.with_view("mountains")
			.before_enter(|_from| async { HookOutcome::redirect("gasStation") }),
		Route::new("sea", "/sea")
			.with_view("sea")
			.on_exit(|_from| async { HookOutcome::redirect("gasStation") }),
		Route::new("dessert", "/dessert")
			.with_view("dessert")
			.on_enter(|_from| async { HookOutcome::redirect("gasStation") }),
		Route::new("errorRoute", "/error")
			.with_view("errorRoute")
			.on_enter(internal_error),
	]
}

#[fixture]
fn store(routes: Vec<Route<&'static str>>) -> Store {
	RouterStore::new((), routes, RouterState::new("notFound"))
}

fn dept_electronics() -> RouterState {
	RouterState::new("department").with_param("id", "electronics")
}

#[rstest]
#[tokio::test]
async fn test_transitions_to_the_desired_state(store: Store) {
	// Act
	let to_state = store.go_to(RouterState::new("home")).await.unwrap();

	// Assert
	assert!(to_state.is_equal(&RouterState::new("home")));
	assert_eq!(store.active_view(), Some("home"));
	assert!(!store.is_transitioning());
}

#[rstest]
#[tokio::test]
async fn test_go_to_with_name_and_params(store: Store) {
	let to_state = store
		.go_to(("department", [("id", "electronics")]))
		.await
		.unwrap();

	assert!(to_state.is_equal(&dept_electronics()));
	assert_eq!(store.active_view(), Some("department"));
}

#[rstest]
#[tokio::test]
async fn test_go_to_with_name_params_and_empty_query(store: Store) {
	let params = [("id".to_string(), "electronics".to_string())].into();

	let to_state = store
		.go_to_route("department", params, Default::default())
		.await
		.unwrap();

	assert!(to_state.is_equal(&dept_electronics()));
}

#[rstest]
#[tokio::test]
async fn test_transitions_to_the_same_state_with_same_params(store: Store) {
	// Arrange
	store.go_to(dept_electronics()).await.unwrap();

	// Act
	let to_state = store.go_to(dept_electronics()).await.unwrap();

	// Assert
	assert!(to_state.is_equal(&dept_electronics()));
}

#[rstest]
#[tokio::test]
async fn test_transitions_to_the_same_state_with_different_params(store: Store) {
	// Arrange
	let dept_music = RouterState::new("department").with_param("id", "music");
	store.go_to(dept_electronics()).await.unwrap();

	// Act
	let to_state = store.go_to(dept_music.clone()).await.unwrap();

	// Assert
	assert!(to_state.is_equal(&dept_music));
	assert!(store.router_state().is_equal(&dept_music));
}

#[rstest]
#[tokio::test]
async fn test_transitions_with_query_parameters(store: Store) {
	let target = dept_electronics().with_query_param("q", "apple");

	let to_state = store.go_to(target.clone()).await.unwrap();

	assert!(to_state.is_equal(&target));
	assert_eq!(to_state.query_param("q"), Some("apple"));
}

#[rstest]
fn test_transitions_to_not_found_state(store: Store) {
	// Act
	store.go_to_not_found();

	// Assert
	assert!(store.router_state().is_equal(&RouterState::new("notFound")));
	assert_eq!(store.active_view(), Some("notFound"));
	assert!(!store.is_transitioning());
}

#[rstest]
fn test_not_found_state_without_route_clears_view(routes: Vec<Route<&'static str>>) {
	let store: Store = RouterStore::new((), routes, "missing");

	store.go_to_not_found();

	assert_eq!(store.router_state().route_name(), "missing");
	assert_eq!(store.active_view(), None);
}

#[rstest]
#[case::before_exit("work", "home", "gym")]
#[case::before_enter("home", "mountains", "gasStation")]
#[case::on_exit("sea", "home", "gasStation")]
#[case::on_enter("home", "dessert", "gasStation")]
#[tokio::test]
async fn test_hook_redirects_transition(
	store: Store,
	#[case] first: &str,
	#[case] second: &str,
	#[case] expected: &str,
) {
	// Arrange
	store.go_to(first).await.unwrap();

	// Act
	let to_state = store.go_to(second).await.unwrap();

	// Assert
	assert!(to_state.is_equal(&RouterState::new(expected)));
	assert!(store.router_state().is_equal(&RouterState::new(expected)));
	assert_eq!(store.get_current_route().unwrap().name(), expected);
	assert!(!store.is_transitioning());
}

#[rstest]
fn test_unknown_route_lookup_fails(store: Store) {
	let result = store.get_route("unknown");

	assert!(matches!(result, Err(RouterError::RouteNotFound(ref name)) if name == "unknown"));
}

#[rstest]
#[tokio::test]
async fn test_failing_hook_without_error_hook_fails_navigation(store: Store) {
	// Act
	let result = store.go_to("errorRoute").await;

	// Assert
	let err = result.unwrap_err();
	match &err {
		RouterError::GuardFailed { route, phase, .. } => {
			assert_eq!(route, "errorRoute");
			assert_eq!(*phase, HookPhase::OnEnter);
		}
		other => panic!("unexpected error: {:?}", other),
	}
	assert_eq!(err.source().unwrap().to_string(), "Internal error");
	assert!(!store.is_transitioning());
}

#[rstest]
#[tokio::test]
async fn test_failing_hook_calls_error_hook(store: Store) {
	// Arrange
	let calls = Arc::new(Mutex::new(Vec::new()));
	let recorded = Arc::clone(&calls);
	store.set_error_hook(move |err| recorded.lock().push(err.to_string()));

	// Act
	let result = store.go_to("errorRoute").await;

	// Assert
	assert!(result.is_ok());
	assert_eq!(
		*calls.lock(),
		vec!["onEnter hook of route 'errorRoute' failed: Internal error"]
	);
	assert!(!store.is_transitioning());
}

#[rstest]
#[tokio::test]
async fn test_error_hook_last_write_wins(store: Store) {
	// Arrange
	let first = Arc::new(Mutex::new(0usize));
	let second = Arc::new(Mutex::new(0usize));
	{
		let first = Arc::clone(&first);
		store.set_error_hook(move |_| *first.lock() += 1);
	}
	{
		let second = Arc::clone(&second);
		store.set_error_hook(move |_| *second.lock() += 1);
	}

	// Act
	store.go_to("errorRoute").await.unwrap();

	// Assert
	assert_eq!(*first.lock(), 0);
	assert_eq!(*second.lock(), 1);
}

#[rstest]
#[tokio::test]
async fn test_cleared_error_hook_no_longer_absorbs(store: Store) {
	store.set_error_hook(|_| {});
	store.clear_error_hook();

	let result = store.go_to("errorRoute").await;

	assert!(matches!(result, Err(RouterError::GuardFailed { .. })));
}

#[rstest]
#[tokio::test]
async fn test_pre_commit_failure_keeps_current_state() {
	// Arrange
	let store: Store = RouterStore::new(
		(),
		[
			Route::new("home", "/").with_view("home"),
			Route::new("vault", "/vault").with_view("vault").before_enter(|_from| async {
				HookOutcome::Fail(HookError::msg("not authorized"))
			}),
		],
		"notFound",
	);
	store.go_to("home").await.unwrap();
	store.set_error_hook(|_| {});

	// Act
	let result = store.go_to("vault").await.unwrap();

	// Assert
	assert!(result.is_equal(&RouterState::new("home")));
	assert_eq!(store.active_view(), Some("home"));
}

#[rstest]
#[tokio::test]
async fn test_hooks_receive_the_source_state() {
	// Arrange
	let seen = Arc::new(Mutex::new(None));
	let recorded = Arc::clone(&seen);
	let store: Store = RouterStore::new(
		(),
		[
			Route::new("department", "/departments/:id").with_view("department"),
			Route::new("gym", "/gym").with_view("gym").on_enter(move |from| {
				let recorded = Arc::clone(&recorded);
				async move {
					*recorded.lock() = Some(from);
					HookOutcome::Proceed
				}
			}),
		],
		"notFound",
	)
	.with_initial_state(dept_electronics());

	// Act
	store.go_to("gym").await.unwrap();

	// Assert
	assert_eq!(*seen.lock(), Some(dept_electronics()));
}

#[rstest]
fn test_sets_a_default_initial_route(store: Store) {
	let state = store.router_state();

	assert_eq!(state.route_name(), "__initial__");
	assert!(state.params().is_empty());
	assert!(state.query_params().is_empty());
	assert_eq!(store.active_view(), None);
}

#[rstest]
fn test_allows_a_specific_initial_route(routes: Vec<Route<&'static str>>) {
	// Arrange
	let store: Store =
		RouterStore::new((), routes, "notFound").with_initial_state(SerializedState::new("home"));

	// Act
	let state = store.router_state();
	let route = store.get_current_route().unwrap();

	// Assert
	assert!(state.is_equal(&RouterState::new("home")));
	assert_eq!(route.name(), "home");
	assert_eq!(route.pattern(), "/");
}

#[rstest]
fn test_current_route_of_placeholder_state_is_not_found(store: Store) {
	let result = store.get_current_route();

	assert!(matches!(result, Err(RouterError::RouteNotFound(ref name)) if name == "__initial__"));
}

#[rstest]
fn test_hydrates_from_a_serialized_state(store: Store) {
	// Act
	store.hydrate(SerializedState::from_json(r#"{"routeName":"home"}"#).unwrap());

	// Assert
	assert!(store.router_state().is_equal(&RouterState::new("home")));
	assert_eq!(store.active_view(), Some("home"));
}

#[rstest]
fn test_hydrate_can_leave_view_untouched(routes: Vec<Route<&'static str>>) {
	let store: Store = RouterStore::new((), routes, "notFound")
		.with_config(RouterConfig::new().with_hydrate_resolves_view(false));

	store.hydrate(SerializedState::new("home"));

	assert_eq!(store.router_state().route_name(), "home");
	assert_eq!(store.active_view(), None);
}

#[rstest]
fn test_hydrate_json_rejects_malformed_record(store: Store) {
	let result = store.hydrate_json("{\"params\": {}}");

	assert!(result.is_err());
	assert!(store.router_state().is_initial());
}

#[rstest]
fn test_serializes_current_state(routes: Vec<Route<&'static str>>) {
	// Arrange
	let store: Store =
		RouterStore::new((), routes, "notFound").with_initial_state(dept_electronics());

	// Act
	let record = store.serialize();

	// Assert
	assert_eq!(record.route_name, "department");
	assert_eq!(record.params.get("id").map(String::as_str), Some("electronics"));
	assert!(record.query_params.is_empty());
	assert_eq!(
		serde_json::from_str::<serde_json::Value>(&record.to_json().unwrap()).unwrap(),
		serde_json::json!({
			"routeName": "department",
			"params": {"id": "electronics"},
			"queryParams": {}
		})
	);
}

#[rstest]
#[tokio::test]
async fn test_serialized_state_restores_in_another_store(
	store: Store,
	routes: Vec<Route<&'static str>>,
) {
	// Arrange
	let target = dept_electronics().with_query_param("q", "apple");
	store.go_to(target.clone()).await.unwrap();
	let json = store.serialize().to_json().unwrap();
	let client: Store = RouterStore::new((), routes, "notFound");

	// Act
	client.hydrate_json(&json).unwrap();

	// Assert
	assert!(client.router_state().is_equal(&target));
	assert_eq!(client.active_view(), Some("department"));
}

#[rstest]
#[tokio::test]
async fn test_listeners_observe_commits_until_unsubscribed(store: Store) {
	// Arrange
	let seen = Arc::new(Mutex::new(Vec::new()));
	let recorded = Arc::clone(&seen);
	let id = store.subscribe(move |from, to| {
		recorded
			.lock()
			.push(format!("{}->{}", from.route_name(), to.route_name()))
	});

	// Act
	store.go_to("home").await.unwrap();
	store.go_to("mountains").await.unwrap();
	assert!(store.unsubscribe(id));
	store.go_to("gym").await.unwrap();

	// Assert
	assert_eq!(*seen.lock(), vec!["__initial__->home", "home->gasStation"]);
	assert!(!store.unsubscribe(id));
}

#[rstest]
fn test_store_exposes_application_context(routes: Vec<Route<&'static str>>) {
	#[derive(Debug, PartialEq)]
	struct AppContext {
		user: &'static str,
	}

	let store = RouterStore::new(AppContext { user: "alice" }, routes, "notFound");

	assert_eq!(store.context(), &AppContext { user: "alice" });
	assert_eq!(store.not_found_state().route_name(), "notFound");
	assert_eq!(store.routes().len(), 10);
}
