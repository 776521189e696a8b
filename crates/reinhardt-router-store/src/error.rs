//! Router error types.
//!
//! Guard redirects are not represented here: a redirect is an ordinary
//! [`HookOutcome`](crate::hook::HookOutcome) that the transition pipeline
//! turns into a new navigation.

use thiserror::Error;

use crate::hook::{HookError, HookPhase};
use crate::state::RouterState;

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors raised by the route table and the transition pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RouterError {
	/// No route definition matches the requested name.
	#[error("route not found: {0}")]
	RouteNotFound(String),

	/// A lifecycle hook failed without redirecting.
	#[error("{phase} hook of route '{route}' failed: {source}")]
	GuardFailed {
		/// Name of the route that owns the failing hook.
		route: String,
		/// Pipeline step the hook was attached to.
		phase: HookPhase,
		/// Failure reported by the hook.
		#[source]
		source: HookError,
	},

	/// Guards kept redirecting past the configured limit.
	#[error("redirect limit of {limit} exceeded (last target: '{}')", last.route_name())]
	RedirectLimitExceeded {
		/// Configured maximum number of redirects.
		limit: usize,
		/// The redirect target that would have exceeded the limit.
		last: RouterState,
	},

	/// A newer navigation displaced this one before it committed.
	#[error("navigation to '{}' was superseded by a newer navigation", target.route_name())]
	Superseded {
		/// The target this navigation was heading to.
		target: RouterState,
	},
}

impl RouterError {
	/// Returns `true` for [`RouterError::RouteNotFound`].
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::RouteNotFound(_))
	}

	/// Returns `true` when the error originates from a lifecycle hook.
	pub fn is_guard_failure(&self) -> bool {
		matches!(self, Self::GuardFailed { .. })
	}
}
