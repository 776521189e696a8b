//! The router store.
//!
//! [`RouterStore`] owns the current [`RouterState`] and active view, and runs
//! every navigation through the [transition pipeline](crate::pipeline).
//!
//! ## Concurrent navigations
//!
//! Under [`NavigationPolicy::Queue`] navigations are single-flight: a `go_to`
//! issued while another one is running waits for it to finish and then starts
//! from the state it left behind. Under [`NavigationPolicy::Supersede`] each
//! `go_to` displaces the ones issued before it; a displaced navigation that has
//! not committed yet fails with [`RouterError::Superseded`]. Direct writes
//! through [`RouterStore::go_to_not_found`] and [`RouterStore::hydrate`]
//! displace pending navigations in the same way.
//!
//! Under `Queue` the navigation lock is held for the whole run, hooks included.
//! A hook must therefore never await `go_to` on its own store: that call waits
//! for the run that is awaiting it and never resolves. Hooks change course by
//! returning [`HookOutcome::Redirect`](crate::HookOutcome::Redirect), or spawn a
//! detached navigation that runs once the current one has finished.

use futures::lock::Mutex as AsyncMutex;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::config::{NavigationPolicy, RouterConfig};
use crate::error::{RouterError, RouterResult};
use crate::pipeline::Pipeline;
use crate::route::Route;
use crate::state::{Params, RouterState, SerializedState};
use crate::table::RouteTable;

/// Handler for hard transition failures.
pub type ErrorHook = Arc<dyn Fn(&RouterError) + Send + Sync>;

/// Observer notified after each committed state change with `(from, to)`.
pub type TransitionListener = Arc<dyn Fn(&RouterState, &RouterState) + Send + Sync>;

/// Identifies a listener registered through [`RouterStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Current<V> {
	state: RouterState,
	view: Option<V>,
}

/// Client-side router state machine.
///
/// `V` is the view descriptor type carried by routes, `C` an opaque
/// application context the store hands back through [`RouterStore::context`].
///
/// # Examples
///
/// ```
/// use reinhardt_router_store::{Route, RouterState, RouterStore};
///
/// # futures::executor::block_on(async {
/// let store = RouterStore::new(
///     (),
///     [
///         Route::new("home", "/").with_view("Home"),
///         Route::new("notFound", "/not-found").with_view("NotFound"),
///     ],
///     RouterState::new("notFound"),
/// );
///
/// let state = store.go_to("home").await.unwrap();
///
/// assert_eq!(state.route_name(), "home");
/// assert_eq!(store.active_view(), Some("Home"));
/// assert!(!store.is_transitioning());
/// # });
/// ```
pub struct RouterStore<V, C = ()> {
	context: C,
	routes: RouteTable<V>,
	not_found: RouterState,
	config: RouterConfig,
	current: RwLock<Current<V>>,
	error_hook: RwLock<Option<ErrorHook>>,
	listeners: RwLock<Vec<(SubscriptionId, TransitionListener)>>,
	next_subscription: AtomicU64,
	in_flight: AtomicUsize,
	generation: AtomicU64,
	navigation: AsyncMutex<()>,
}

impl<V, C> fmt::Debug for RouterStore<V, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let current = self.current.read();
		f.debug_struct("RouterStore")
			.field("router_state", &current.state)
			.field("has_active_view", &current.view.is_some())
			.field("routes", &self.routes.names().collect::<Vec<_>>())
			.field("not_found", &self.not_found)
			.field("config", &self.config)
			.field("is_transitioning", &self.is_transitioning())
			.field("has_error_hook", &self.error_hook.read().is_some())
			.finish()
	}
}

impl<V, C> RouterStore<V, C> {
	/// Creates a store in the `__initial__` placeholder state.
	pub fn new(
		context: C,
		routes: impl IntoIterator<Item = Route<V>>,
		not_found: impl Into<RouterState>,
	) -> Self {
		Self {
			context,
			routes: RouteTable::new(routes),
			not_found: not_found.into(),
			config: RouterConfig::default(),
			current: RwLock::new(Current {
				state: RouterState::initial(),
				view: None,
			}),
			error_hook: RwLock::new(None),
			listeners: RwLock::new(Vec::new()),
			next_subscription: AtomicU64::new(0),
			in_flight: AtomicUsize::new(0),
			generation: AtomicU64::new(0),
			navigation: AsyncMutex::new(()),
		}
	}

	/// Seeds the current state. The active view stays unset until the first
	/// transition completes.
	pub fn with_initial_state(mut self, state: impl Into<RouterState>) -> Self {
		self.current.get_mut().state = state.into();
		self
	}

	/// Replaces the configuration.
	pub fn with_config(mut self, config: RouterConfig) -> Self {
		self.config = config;
		self
	}

	/// Returns the application context.
	pub fn context(&self) -> &C {
		&self.context
	}

	/// Returns the configuration.
	pub fn config(&self) -> &RouterConfig {
		&self.config
	}

	/// Returns the route table.
	pub fn routes(&self) -> &RouteTable<V> {
		&self.routes
	}

	/// Returns the state [`go_to_not_found`](Self::go_to_not_found) switches to.
	pub fn not_found_state(&self) -> &RouterState {
		&self.not_found
	}

	/// Returns a snapshot of the current state.
	pub fn router_state(&self) -> RouterState {
		self.current.read().state.clone()
	}

	/// Returns `true` while a navigation is running.
	pub fn is_transitioning(&self) -> bool {
		self.in_flight.load(Ordering::SeqCst) > 0
	}

	/// Looks up a route by name.
	pub fn get_route(&self, name: &str) -> RouterResult<&Route<V>> {
		self.routes.get(name)
	}

	/// Looks up the route of the current state.
	pub fn get_current_route(&self) -> RouterResult<&Route<V>> {
		let name = self.current.read().state.route_name().to_string();
		self.routes.get(&name)
	}

	/// Installs the handler for hard transition failures, replacing any
	/// previous one.
	///
	/// While a handler is installed, a failing hook no longer fails the
	/// pending [`go_to`](Self::go_to): the handler receives the error and the
	/// call resolves with whatever state the store holds at that point.
	pub fn set_error_hook<F>(&self, hook: F)
	where
		F: Fn(&RouterError) + Send + Sync + 'static,
	{
		*self.error_hook.write() = Some(Arc::new(hook));
	}

	/// Removes the error handler.
	pub fn clear_error_hook(&self) {
		*self.error_hook.write() = None;
	}

	/// Registers a listener called after every state change.
	pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
	where
		F: Fn(&RouterState, &RouterState) + Send + Sync + 'static,
	{
		let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
		self.listeners.write().push((id, Arc::new(listener)));
		id
	}

	/// Removes a listener. Returns `false` if it was not registered.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut listeners = self.listeners.write();
		let original_len = listeners.len();
		listeners.retain(|(existing, _)| *existing != id);
		listeners.len() < original_len
	}

	/// Produces a transferable snapshot of the current state.
	pub fn serialize(&self) -> SerializedState {
		self.current.read().state.to_serialized()
	}

	pub(crate) fn in_flight_counter(&self) -> &AtomicUsize {
		&self.in_flight
	}

	pub(crate) fn is_current_generation(&self, ticket: u64) -> bool {
		self.generation.load(Ordering::SeqCst) == ticket
	}

	fn next_generation(&self) -> u64 {
		self.generation.fetch_add(1, Ordering::SeqCst) + 1
	}

	/// Replaces state and view, then notifies listeners.
	pub(crate) fn commit(&self, state: RouterState, view: Option<V>) {
		let from = {
			let mut current = self.current.write();
			current.view = view;
			std::mem::replace(&mut current.state, state.clone())
		};

		tracing::debug!(from = %from, to = %state, "router state committed");

		let listeners: Vec<TransitionListener> = self
			.listeners
			.read()
			.iter()
			.map(|(_, listener)| Arc::clone(listener))
			.collect();
		for listener in listeners {
			listener(&from, &state);
		}
	}
}

impl<V: Clone, C> RouterStore<V, C> {
	/// Returns the view descriptor of the current route.
	pub fn active_view(&self) -> Option<V> {
		self.current.read().view.clone()
	}

	/// Navigates to `target`.
	///
	/// `target` is anything convertible into a [`RouterState`]: a state, a
	/// route name, or a `(name, params)` / `(name, params, query)` tuple.
	///
	/// Resolves with the state the navigation ended in, which differs from
	/// `target` when a hook redirected.
	///
	/// # Errors
	///
	/// - [`RouterError::RouteNotFound`] if the target names no route.
	/// - [`RouterError::GuardFailed`] or [`RouterError::RedirectLimitExceeded`]
	///   if a hook failed and no error hook is installed.
	/// - [`RouterError::Superseded`] under [`NavigationPolicy::Supersede`] when
	///   a newer navigation started before this one committed.
	///
	/// # Deadlocks
	///
	/// Under [`NavigationPolicy::Queue`] a hook that awaits `go_to` on the same
	/// store never completes, because the inner call queues behind the run that
	/// is waiting for it. Return a redirect from the hook instead.
	pub async fn go_to(&self, target: impl Into<RouterState>) -> RouterResult<RouterState> {
		let target = target.into();
		tracing::debug!(
			to = %target,
			policy = ?self.config.navigation_policy(),
			"navigation requested"
		);

		let result = match self.config.navigation_policy() {
			NavigationPolicy::Queue => {
				let _permit = self.navigation.lock().await;
				Pipeline::new(self, None).run(target).await
			}
			NavigationPolicy::Supersede => {
				let ticket = self.next_generation();
				Pipeline::new(self, Some(ticket)).run(target).await
			}
		};

		match result {
			Err(
				err @ (RouterError::GuardFailed { .. } | RouterError::RedirectLimitExceeded { .. }),
			) => self.absorb(err),
			other => other,
		}
	}

	/// Navigates to a route given by name and parameter maps.
	pub async fn go_to_route(
		&self,
		route_name: impl Into<String>,
		params: Params,
		query_params: Params,
	) -> RouterResult<RouterState> {
		self.go_to(RouterState::with_all(route_name, params, query_params))
			.await
	}

	/// Switches to the not-found state without running any hooks.
	///
	/// The active view becomes the not-found route's view, or none if the
	/// not-found state names no route.
	pub fn go_to_not_found(&self) {
		self.next_generation();
		let view = self.view_of(self.not_found.route_name());
		self.commit(self.not_found.clone(), view);
	}

	/// Overwrites the current state from a serialized record without running
	/// any hooks.
	///
	/// When [`RouterConfig::hydrate_resolves_view`] is set (the default) the
	/// hydrated route's view becomes active; otherwise the active view is left
	/// untouched.
	pub fn hydrate(&self, record: impl Into<SerializedState>) {
		let state = RouterState::from(record.into());
		self.next_generation();

		if !self.routes.contains(state.route_name()) {
			tracing::warn!(
				route = state.route_name(),
				"hydrating a state with no route definition"
			);
		}

		let view = if self.config.hydrate_resolves_view() {
			self.view_of(state.route_name())
		} else {
			self.active_view()
		};
		self.commit(state, view);
	}

	/// Parses a JSON record and hydrates from it.
	pub fn hydrate_json(&self, json: &str) -> Result<(), serde_json::Error> {
		let record = SerializedState::from_json(json)?;
		self.hydrate(record);
		Ok(())
	}

	fn view_of(&self, route_name: &str) -> Option<V> {
		self.routes
			.get(route_name)
			.ok()
			.and_then(|route| route.view().cloned())
	}

	fn absorb(&self, err: RouterError) -> RouterResult<RouterState> {
		tracing::warn!(error = %err, "transition failed");

		let hook = self.error_hook.read().clone();
		match hook {
			Some(hook) => {
				hook(&err);
				Ok(self.router_state())
			}
			None => Err(err),
		}
	}
}
