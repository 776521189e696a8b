//! Router state values.
//!
//! [`RouterState`] identifies one navigable application state: a route name
//! plus its path and query parameters. [`SerializedState`] is the wire shape
//! used to move a state across an environment boundary (for example from a
//! server render to the client).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Route name of the placeholder state a store starts in when no initial
/// state is configured.
pub const INITIAL_ROUTE_NAME: &str = "__initial__";

/// Path or query parameters.
pub type Params = HashMap<String, String>;

/// An immutable, addressable router state.
///
/// Two states are equal when their route names match and their parameter maps
/// hold the same keys and values, independent of insertion order.
///
/// # Examples
///
/// ```
/// use reinhardt_router_store::RouterState;
///
/// let a = RouterState::new("department").with_param("id", "electronics");
/// let b = RouterState::from(("department", [("id", "electronics")]));
///
/// assert!(a.is_equal(&b));
/// assert_eq!(a.param("id"), Some("electronics"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterState {
	route_name: String,
	params: Params,
	query_params: Params,
}

impl RouterState {
	/// Creates a state for `route_name` with no parameters.
	pub fn new(route_name: impl Into<String>) -> Self {
		Self {
			route_name: route_name.into(),
			params: Params::new(),
			query_params: Params::new(),
		}
	}

	/// Creates a state from all three components.
	pub fn with_all(route_name: impl Into<String>, params: Params, query_params: Params) -> Self {
		Self {
			route_name: route_name.into(),
			params,
			query_params,
		}
	}

	/// Returns the `__initial__` placeholder state.
	pub fn initial() -> Self {
		Self::new(INITIAL_ROUTE_NAME)
	}

	/// Returns a copy with the path parameters replaced.
	pub fn with_params<I, K, V>(mut self, params: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.params = collect_params(params);
		self
	}

	/// Returns a copy with one additional path parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(key.into(), value.into());
		self
	}

	/// Returns a copy with the query parameters replaced.
	pub fn with_query_params<I, K, V>(mut self, query_params: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.query_params = collect_params(query_params);
		self
	}

	/// Returns a copy with one additional query parameter.
	pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query_params.insert(key.into(), value.into());
		self
	}

	/// Returns the route name.
	pub fn route_name(&self) -> &str {
		&self.route_name
	}

	/// Returns the path parameters.
	pub fn params(&self) -> &Params {
		&self.params
	}

	/// Returns the query parameters.
	pub fn query_params(&self) -> &Params {
		&self.query_params
	}

	/// Returns a single path parameter.
	pub fn param(&self, key: &str) -> Option<&str> {
		self.params.get(key).map(String::as_str)
	}

	/// Returns a single query parameter.
	pub fn query_param(&self, key: &str) -> Option<&str> {
		self.query_params.get(key).map(String::as_str)
	}

	/// Returns `true` if this is the `__initial__` placeholder state.
	pub fn is_initial(&self) -> bool {
		self.route_name == INITIAL_ROUTE_NAME
	}

	/// Compares route name, path parameters and query parameters.
	pub fn is_equal(&self, other: &RouterState) -> bool {
		self == other
	}

	/// Produces the transferable record of this state.
	pub fn to_serialized(&self) -> SerializedState {
		SerializedState {
			route_name: self.route_name.clone(),
			params: self.params.clone(),
			query_params: self.query_params.clone(),
		}
	}
}

/// Formats as `name`, `name(key=value, ..)` or `name(..)?key=value&..`,
/// with keys sorted.
impl fmt::Display for RouterState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.route_name)?;
		if !self.params.is_empty() {
			let mut params: Vec<_> = self.params.iter().collect();
			params.sort();
			f.write_str("(")?;
			for (i, (key, value)) in params.into_iter().enumerate() {
				if i > 0 {
					f.write_str(", ")?;
				}
				write!(f, "{}={}", key, value)?;
			}
			f.write_str(")")?;
		}
		if !self.query_params.is_empty() {
			let mut query: Vec<_> = self.query_params.iter().collect();
			query.sort();
			for (i, (key, value)) in query.into_iter().enumerate() {
				f.write_str(if i == 0 { "?" } else { "&" })?;
				write!(f, "{}={}", key, value)?;
			}
		}
		Ok(())
	}
}

impl Default for RouterState {
	fn default() -> Self {
		Self::initial()
	}
}

fn collect_params<I, K, V>(params: I) -> Params
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<String>,
{
	params
		.into_iter()
		.map(|(k, v)| (k.into(), v.into()))
		.collect()
}

impl From<&str> for RouterState {
	fn from(route_name: &str) -> Self {
		Self::new(route_name)
	}
}

impl From<String> for RouterState {
	fn from(route_name: String) -> Self {
		Self::new(route_name)
	}
}

impl From<&RouterState> for RouterState {
	fn from(state: &RouterState) -> Self {
		state.clone()
	}
}

impl<N, P, K, V> From<(N, P)> for RouterState
where
	N: Into<String>,
	P: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<String>,
{
	fn from((route_name, params): (N, P)) -> Self {
		Self::new(route_name).with_params(params)
	}
}

impl<N, P, Q, K, V, QK, QV> From<(N, P, Q)> for RouterState
where
	N: Into<String>,
	P: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<String>,
	Q: IntoIterator<Item = (QK, QV)>,
	QK: Into<String>,
	QV: Into<String>,
{
	fn from((route_name, params, query_params): (N, P, Q)) -> Self {
		Self::new(route_name)
			.with_params(params)
			.with_query_params(query_params)
	}
}

impl From<SerializedState> for RouterState {
	fn from(record: SerializedState) -> Self {
		Self::with_all(record.route_name, record.params, record.query_params)
	}
}

/// Transferable snapshot of a [`RouterState`].
///
/// Serializes as `{"routeName": .., "params": {..}, "queryParams": {..}}`.
/// Missing `params` or `queryParams` deserialize as empty maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedState {
	/// Route name.
	pub route_name: String,
	/// Path parameters.
	#[serde(default)]
	pub params: Params,
	/// Query parameters.
	#[serde(default)]
	pub query_params: Params,
}

impl SerializedState {
	/// Creates a record for `route_name` with no parameters.
	pub fn new(route_name: impl Into<String>) -> Self {
		Self {
			route_name: route_name.into(),
			..Self::default()
		}
	}

	/// Serializes the record to JSON.
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}

	/// Serializes the record to pretty-printed JSON.
	pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string_pretty(self)
	}

	/// Deserializes a record from JSON.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

impl From<&RouterState> for SerializedState {
	fn from(state: &RouterState) -> Self {
		state.to_serialized()
	}
}
