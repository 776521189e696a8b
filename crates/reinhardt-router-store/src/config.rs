//! Router store configuration.
//!
//! # Examples
//!
//! ```
//! use reinhardt_router_store::{NavigationPolicy, RouterConfig};
//!
//! let config = RouterConfig::new()
//!     .with_navigation_policy(NavigationPolicy::Supersede)
//!     .with_max_redirects(4);
//!
//! assert_eq!(config.max_redirects(), 4);
//! ```
//!
//! The configuration also deserializes from a settings document:
//!
//! ```
//! use reinhardt_router_store::{NavigationPolicy, RouterConfig};
//!
//! let config: RouterConfig =
//!     serde_json::from_str(r#"{"navigation_policy": "supersede"}"#).unwrap();
//!
//! assert_eq!(config.navigation_policy(), NavigationPolicy::Supersede);
//! assert!(config.hydrate_resolves_view());
//! ```

use serde::{Deserialize, Serialize};

/// Default upper bound on redirect hops within one navigation.
pub const DEFAULT_MAX_REDIRECTS: usize = 16;

/// How a store treats a navigation issued while another one is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPolicy {
	/// Navigations run one at a time in the order they were issued.
	#[default]
	Queue,
	/// A newer navigation displaces older ones that have not committed yet.
	Supersede,
}

/// Configuration for a [`RouterStore`](crate::RouterStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	navigation_policy: NavigationPolicy,
	max_redirects: usize,
	hydrate_resolves_view: bool,
}

impl RouterConfig {
	/// Creates a configuration with default values
	///
	/// Defaults:
	/// - `navigation_policy`: Queue
	/// - `max_redirects`: 16
	/// - `hydrate_resolves_view`: true
	pub fn new() -> Self {
		Self {
			navigation_policy: NavigationPolicy::Queue,
			max_redirects: DEFAULT_MAX_REDIRECTS,
			hydrate_resolves_view: true,
		}
	}

	/// Set the concurrent navigation policy
	pub fn with_navigation_policy(mut self, policy: NavigationPolicy) -> Self {
		self.navigation_policy = policy;
		self
	}

	/// Set the maximum number of redirects followed by one navigation
	pub fn with_max_redirects(mut self, max: usize) -> Self {
		self.max_redirects = max;
		self
	}

	/// Set whether `hydrate` also activates the hydrated route's view
	pub fn with_hydrate_resolves_view(mut self, resolve: bool) -> Self {
		self.hydrate_resolves_view = resolve;
		self
	}

	/// Get the concurrent navigation policy
	pub fn navigation_policy(&self) -> NavigationPolicy {
		self.navigation_policy
	}

	/// Get the maximum number of redirects
	pub fn max_redirects(&self) -> usize {
		self.max_redirects
	}

	/// Get whether `hydrate` activates the view
	pub fn hydrate_resolves_view(&self) -> bool {
		self.hydrate_resolves_view
	}
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self::new()
	}
}
