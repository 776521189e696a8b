//! Lifecycle hooks and their outcomes.
//!
//! A route owns up to four hooks, one per [`HookPhase`]. Every hook has the same
//! shape: it receives the state the navigation is leaving and asynchronously
//! yields a [`HookOutcome`].
//!
//! ## Example
//!
//! ```
//! use reinhardt_router_store::{HookOutcome, RouterState, TransitionHook};
//!
//! // Send anonymous visitors to the login page.
//! let require_login = TransitionHook::new(|_from: RouterState| async move {
//!     let logged_in = false;
//!     if logged_in {
//!         HookOutcome::Proceed
//!     } else {
//!         HookOutcome::redirect(RouterState::new("login"))
//!     }
//! });
//! # let _ = require_login;
//! ```

use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use crate::state::RouterState;

/// Boxed future returned by a hook.
pub type HookFuture = Pin<Box<dyn Future<Output = HookOutcome> + Send>>;

type HookFn = Arc<dyn Fn(RouterState) -> HookFuture + Send + Sync>;

/// The pipeline step a hook is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
	/// Runs on the route being left, before the new state is committed.
	BeforeExit,
	/// Runs on the route being entered, before the new state is committed.
	BeforeEnter,
	/// Runs on the route being left, after the new state is committed.
	OnExit,
	/// Runs on the route being entered, after the new state is committed.
	OnEnter,
}

impl HookPhase {
	/// All phases in pipeline execution order.
	pub const ALL: [HookPhase; 4] = [
		HookPhase::BeforeExit,
		HookPhase::BeforeEnter,
		HookPhase::OnExit,
		HookPhase::OnEnter,
	];

	/// Returns `true` for the phases that run before the commit step.
	pub fn is_pre_commit(self) -> bool {
		matches!(self, HookPhase::BeforeExit | HookPhase::BeforeEnter)
	}

	/// Returns `true` for the phases owned by the route being left.
	pub fn is_exit(self) -> bool {
		matches!(self, HookPhase::BeforeExit | HookPhase::OnExit)
	}

	/// Returns the camel-cased hook name.
	pub fn as_str(self) -> &'static str {
		match self {
			HookPhase::BeforeExit => "beforeExit",
			HookPhase::BeforeEnter => "beforeEnter",
			HookPhase::OnExit => "onExit",
			HookPhase::OnEnter => "onEnter",
		}
	}
}

impl fmt::Display for HookPhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Failure reported by a hook.
///
/// Wraps the hook's original error so that it can be inspected through
/// [`std::error::Error::source`] once it surfaces from the pipeline.
#[derive(Debug)]
pub struct HookError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl fmt::Display for HookError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

impl std::error::Error for HookError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.0.source()
	}
}

impl HookError {
	/// Wraps an arbitrary error.
	pub fn new<E>(error: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self(Box::new(error))
	}

	/// Creates an error from a plain message.
	pub fn msg(message: impl Into<String>) -> Self {
		let message: String = message.into();
		Self(message.into())
	}

	/// Converts a caught panic payload into an error.
	pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
		let message = if let Some(s) = payload.downcast_ref::<&str>() {
			(*s).to_string()
		} else if let Some(s) = payload.downcast_ref::<String>() {
			s.clone()
		} else {
			"hook panicked".to_string()
		};
		Self::msg(message)
	}

	/// Returns the wrapped error.
	pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
		&*self.0
	}

	/// Attempts to downcast the wrapped error to a concrete type.
	pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
		self.0.downcast_ref::<E>()
	}
}

/// What a hook decided about the running transition.
#[derive(Debug)]
pub enum HookOutcome {
	/// Let the transition continue.
	Proceed,
	/// Abandon the transition and navigate to the given state instead.
	Redirect(RouterState),
	/// Abort the transition with a hard failure.
	Fail(HookError),
}

impl HookOutcome {
	/// Shorthand for [`HookOutcome::Proceed`].
	pub fn proceed() -> Self {
		Self::Proceed
	}

	/// Redirects to `target`.
	pub fn redirect(target: impl Into<RouterState>) -> Self {
		Self::Redirect(target.into())
	}

	/// Fails with `error`.
	pub fn fail<E>(error: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self::Fail(HookError::new(error))
	}
}

impl From<Result<(), HookError>> for HookOutcome {
	fn from(result: Result<(), HookError>) -> Self {
		match result {
			Ok(()) => Self::Proceed,
			Err(err) => Self::Fail(err),
		}
	}
}

/// A cloneable lifecycle hook.
#[derive(Clone)]
pub struct TransitionHook {
	inner: HookFn,
}

impl fmt::Debug for TransitionHook {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TransitionHook").finish_non_exhaustive()
	}
}

impl TransitionHook {
	/// Creates a hook from an async closure taking the source state.
	pub fn new<F, Fut>(hook: F) -> Self
	where
		F: Fn(RouterState) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = HookOutcome> + Send + 'static,
	{
		Self {
			inner: Arc::new(move |from| Box::pin(hook(from))),
		}
	}

	/// Runs the hook against `from`.
	///
	/// A panic, whether raised while the hook builds its future or while the
	/// future is polled, is reported as [`HookOutcome::Fail`].
	pub async fn run(&self, from: RouterState) -> HookOutcome {
		let future = match std::panic::catch_unwind(AssertUnwindSafe(|| (self.inner)(from))) {
			Ok(future) => future,
			Err(payload) => return HookOutcome::Fail(HookError::from_panic(payload)),
		};

		match AssertUnwindSafe(future).catch_unwind().await {
			Ok(outcome) => outcome,
			Err(payload) => HookOutcome::Fail(HookError::from_panic(payload)),
		}
	}
}
