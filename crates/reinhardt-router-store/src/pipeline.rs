//! Transition pipeline.
//!
//! One run moves the store from its current state to a target state:
//!
//! 1. mark the store as transitioning
//! 2. `beforeExit` of the route being left
//! 3. `beforeEnter` of the route being entered
//! 4. commit the target state and its view
//! 5. `onExit` of the route being left
//! 6. `onEnter` of the route being entered
//! 7. clear the transitioning mark and yield the target state
//!
//! Every hook receives the state being left. A redirect at any step abandons
//! the remaining steps and restarts the protocol towards the redirect target,
//! with whatever state the store holds at that moment as the new source. Every
//! hook runs again on each restart. A redirect to the state the current pass is
//! already heading for counts as proceeding, so an exit guard on the source
//! route does not bounce its own redirect. Real cycles end once
//! `max_redirects` is exceeded. A hard failure aborts the run and is handed back
//! to the store, which either feeds it to the error hook or returns it to the
//! caller.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{RouterError, RouterResult};
use crate::hook::{HookOutcome, HookPhase};
use crate::route::Route;
use crate::state::RouterState;
use crate::store::RouterStore;

/// Keeps the store's in-flight counter raised for the lifetime of a run.
pub(crate) struct InFlight<'a> {
	counter: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
	pub(crate) fn enter(counter: &'a AtomicUsize) -> Self {
		counter.fetch_add(1, Ordering::SeqCst);
		Self { counter }
	}
}

impl Drop for InFlight<'_> {
	fn drop(&mut self) {
		self.counter.fetch_sub(1, Ordering::SeqCst);
	}
}

/// How a single pass through the protocol ended.
enum Attempt {
	Completed(RouterState),
	Redirected(RouterState),
}

/// A single navigation against a store.
pub(crate) struct Pipeline<'s, V, C> {
	store: &'s RouterStore<V, C>,
	/// Generation ticket under the supersede policy; `None` when queued.
	ticket: Option<u64>,
}

impl<'s, V: Clone, C> Pipeline<'s, V, C> {
	pub(crate) fn new(store: &'s RouterStore<V, C>, ticket: Option<u64>) -> Self {
		Self { store, ticket }
	}

	/// Drives the protocol until it completes or fails.
	pub(crate) async fn run(self, target: RouterState) -> RouterResult<RouterState> {
		let _in_flight = InFlight::enter(self.store.in_flight_counter());
		let limit = self.store.config().max_redirects();
		let mut target = target;
		let mut redirects = 0usize;

		loop {
			match self.attempt(&target).await? {
				Attempt::Completed(state) => return Ok(state),
				Attempt::Redirected(next) => {
					redirects += 1;
					if redirects > limit {
						return Err(RouterError::RedirectLimitExceeded { limit, last: next });
					}
					tracing::debug!(
						from = %target,
						to = %next,
						hop = redirects,
						"transition redirected"
					);
					target = next;
				}
			}
		}
	}

	async fn attempt(&self, target: &RouterState) -> RouterResult<Attempt> {
		let from = self.store.router_state();
		let from_route = self.source_route(&from);
		let to_route = self.store.get_route(target.route_name())?;

		tracing::debug!(from = %from, to = %target, "transition started");

		for phase in [HookPhase::BeforeExit, HookPhase::BeforeEnter] {
			if let Some(redirect) = self
				.step(phase, from_route, to_route, &from, target)
				.await?
			{
				return Ok(Attempt::Redirected(redirect));
			}
		}

		self.ensure_current(target)?;
		self.store.commit(target.clone(), to_route.view().cloned());

		for phase in [HookPhase::OnExit, HookPhase::OnEnter] {
			if let Some(redirect) = self
				.step(phase, from_route, to_route, &from, target)
				.await?
			{
				return Ok(Attempt::Redirected(redirect));
			}
		}

		tracing::debug!(to = %target, "transition completed");
		Ok(Attempt::Completed(target.clone()))
	}

	/// Runs the hook for `phase`, if the owning route has one.
	///
	/// Returns the redirect target when the hook redirected somewhere other
	/// than `target`.
	async fn step(
		&self,
		phase: HookPhase,
		from_route: Option<&Route<V>>,
		to_route: &Route<V>,
		from: &RouterState,
		target: &RouterState,
	) -> RouterResult<Option<RouterState>> {
		let owner = if phase.is_exit() {
			from_route
		} else {
			Some(to_route)
		};
		let Some(route) = owner else {
			return Ok(None);
		};
		let Some(hook) = route.hook(phase) else {
			return Ok(None);
		};
		tracing::debug!(route = route.name(), %phase, "running hook");

		match hook.run(from.clone()).await {
			HookOutcome::Proceed => Ok(None),
			HookOutcome::Redirect(next) if next.is_equal(target) => {
				tracing::debug!(
					route = route.name(),
					%phase,
					"hook redirected to the current target"
				);
				Ok(None)
			}
			HookOutcome::Redirect(next) => Ok(Some(next)),
			HookOutcome::Fail(source) => Err(RouterError::GuardFailed {
				route: route.name().to_string(),
				phase,
				source,
			}),
		}
	}

	/// Resolves the route being left.
	///
	/// The placeholder initial state and states written directly through
	/// `hydrate` or `go_to_not_found` may name no route; they have no exit hooks.
	fn source_route(&self, from: &RouterState) -> Option<&'s Route<V>> {
		match self.store.get_route(from.route_name()) {
			Ok(route) => Some(route),
			Err(_) => {
				if !from.is_initial() {
					tracing::debug!(
						route = from.route_name(),
						"source state has no route definition; skipping exit hooks"
					);
				}
				None
			}
		}
	}

	/// Fails with [`RouterError::Superseded`] once a newer navigation has started.
	fn ensure_current(&self, target: &RouterState) -> RouterResult<()> {
		match self.ticket {
			Some(ticket) if !self.store.is_current_generation(ticket) => {
				tracing::debug!(to = %target, "transition superseded before commit");
				Err(RouterError::Superseded {
					target: target.clone(),
				})
			}
			_ => Ok(()),
		}
	}
}
