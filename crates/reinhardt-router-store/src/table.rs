//! Route table: lookup of route definitions by name.

use std::collections::HashMap;

use crate::error::{RouterError, RouterResult};
use crate::route::Route;

/// Ordered collection of routes indexed by name.
///
/// Built once from the route list. When two routes share a name the first one
/// wins and the later definition is unreachable through [`RouteTable::get`].
#[derive(Debug, Clone)]
pub struct RouteTable<V> {
	routes: Vec<Route<V>>,
	by_name: HashMap<String, usize>,
}

impl<V> RouteTable<V> {
	/// Builds the table from `routes`, preserving their order.
	pub fn new(routes: impl IntoIterator<Item = Route<V>>) -> Self {
		let routes: Vec<Route<V>> = routes.into_iter().collect();
		let mut by_name = HashMap::with_capacity(routes.len());

		for (index, route) in routes.iter().enumerate() {
			if by_name.contains_key(route.name()) {
				tracing::warn!(
					route = route.name(),
					index,
					"duplicate route name; the earlier definition takes precedence"
				);
				continue;
			}
			by_name.insert(route.name().to_string(), index);
		}

		Self { routes, by_name }
	}

	/// Looks up a route by exact name.
	pub fn get(&self, name: &str) -> RouterResult<&Route<V>> {
		self.by_name
			.get(name)
			.map(|index| &self.routes[*index])
			.ok_or_else(|| RouterError::RouteNotFound(name.to_string()))
	}

	/// Checks if a route name exists.
	pub fn contains(&self, name: &str) -> bool {
		self.by_name.contains_key(name)
	}

	/// Returns the number of route definitions, duplicates included.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns whether the table has no routes.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Iterates over the routes in definition order.
	pub fn iter(&self) -> impl Iterator<Item = &Route<V>> {
		self.routes.iter()
	}

	/// Iterates over the route names in definition order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.routes.iter().map(Route::name)
	}
}

impl<V> FromIterator<Route<V>> for RouteTable<V> {
	fn from_iter<I: IntoIterator<Item = Route<V>>>(iter: I) -> Self {
		Self::new(iter)
	}
}
