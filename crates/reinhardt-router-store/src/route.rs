//! Route definitions.

use std::fmt;
use std::future::Future;

use crate::hook::{HookOutcome, HookPhase, TransitionHook};
use crate::state::RouterState;

/// A single route definition.
///
/// `V` is the view descriptor the store activates when the route is entered.
/// The pattern is carried as metadata for URL binding layers and is never
/// interpreted by the store.
///
/// # Examples
///
/// ```
/// use reinhardt_router_store::{HookOutcome, Route, RouterState};
///
/// let route = Route::new("work", "/work")
///     .with_view("WorkPage")
///     .before_exit(|_from| async { HookOutcome::redirect(RouterState::new("gym")) });
///
/// assert_eq!(route.name(), "work");
/// assert_eq!(route.view(), Some(&"WorkPage"));
/// assert!(route.has_hooks());
/// ```
#[derive(Clone)]
pub struct Route<V> {
	name: String,
	pattern: String,
	view: Option<V>,
	before_exit: Option<TransitionHook>,
	before_enter: Option<TransitionHook>,
	on_exit: Option<TransitionHook>,
	on_enter: Option<TransitionHook>,
}

impl<V: fmt::Debug> fmt::Debug for Route<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("name", &self.name)
			.field("pattern", &self.pattern)
			.field("view", &self.view)
			.field("has_before_exit", &self.before_exit.is_some())
			.field("has_before_enter", &self.before_enter.is_some())
			.field("has_on_exit", &self.on_exit.is_some())
			.field("has_on_enter", &self.on_enter.is_some())
			.finish()
	}
}

impl<V> Route<V> {
	/// Creates a route without a view or hooks.
	pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			pattern: pattern.into(),
			view: None,
			before_exit: None,
			before_enter: None,
			on_exit: None,
			on_enter: None,
		}
	}

	/// Sets the view descriptor.
	pub fn with_view(mut self, view: V) -> Self {
		self.view = Some(view);
		self
	}

	/// Installs `hook` in the slot for `phase`, replacing any previous hook.
	pub fn with_hook(mut self, phase: HookPhase, hook: TransitionHook) -> Self {
		*self.slot_mut(phase) = Some(hook);
		self
	}

	/// Adds a hook that runs on this route before it is left.
	pub fn before_exit<F, Fut>(self, hook: F) -> Self
	where
		F: Fn(RouterState) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = HookOutcome> + Send + 'static,
	{
		self.with_hook(HookPhase::BeforeExit, TransitionHook::new(hook))
	}

	/// Adds a hook that runs on this route before it is entered.
	pub fn before_enter<F, Fut>(self, hook: F) -> Self
	where
		F: Fn(RouterState) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = HookOutcome> + Send + 'static,
	{
		self.with_hook(HookPhase::BeforeEnter, TransitionHook::new(hook))
	}

	/// Adds a hook that runs on this route after it has been left.
	pub fn on_exit<F, Fut>(self, hook: F) -> Self
	where
		F: Fn(RouterState) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = HookOutcome> + Send + 'static,
	{
		self.with_hook(HookPhase::OnExit, TransitionHook::new(hook))
	}

	/// Adds a hook that runs on this route after it has been entered.
	pub fn on_enter<F, Fut>(self, hook: F) -> Self
	where
		F: Fn(RouterState) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = HookOutcome> + Send + 'static,
	{
		self.with_hook(HookPhase::OnEnter, TransitionHook::new(hook))
	}

	/// Returns the route name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the opaque path pattern.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the view descriptor, if any.
	pub fn view(&self) -> Option<&V> {
		self.view.as_ref()
	}

	/// Returns the hook installed for `phase`, if any.
	pub fn hook(&self, phase: HookPhase) -> Option<&TransitionHook> {
		match phase {
			HookPhase::BeforeExit => self.before_exit.as_ref(),
			HookPhase::BeforeEnter => self.before_enter.as_ref(),
			HookPhase::OnExit => self.on_exit.as_ref(),
			HookPhase::OnEnter => self.on_enter.as_ref(),
		}
	}

	/// Returns `true` if any hook slot is populated.
	pub fn has_hooks(&self) -> bool {
		HookPhase::ALL.iter().any(|phase| self.hook(*phase).is_some())
	}

	fn slot_mut(&mut self, phase: HookPhase) -> &mut Option<TransitionHook> {
		match phase {
			HookPhase::BeforeExit => &mut self.before_exit,
			HookPhase::BeforeEnter => &mut self.before_enter,
			HookPhase::OnExit => &mut self.on_exit,
			HookPhase::OnEnter => &mut self.on_enter,
		}
	}
}
