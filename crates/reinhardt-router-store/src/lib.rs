//! Reinhardt Router Store - view-routing state machine
//!
//! A framework-agnostic client-side router core. It maps named, parameterized
//! application states to view descriptors and moves between them through an
//! asynchronous pipeline of lifecycle hooks that can let a navigation through,
//! redirect it, or fail it.
//!
//! ## Architecture
//!
//! - [`state`]: [`RouterState`] values and the [`SerializedState`] transfer record
//! - [`route`]: [`Route`] definitions carrying a view descriptor and up to four hooks
//! - [`table`]: [`RouteTable`] lookup by route name
//! - [`hook`]: [`TransitionHook`] and the tagged [`HookOutcome`]
//! - [`pipeline`]: the guarded transition protocol
//! - [`store`]: the [`RouterStore`] façade
//! - [`config`]: [`RouterConfig`] (navigation policy, redirect limit, hydration)
//!
//! Translating URLs or history entries into states, and rendering the active
//! view, are left to the embedding application.
//!
//! ## Example
//!
//! ```
//! use reinhardt_router_store::{HookOutcome, Route, RouterState, RouterStore};
//!
//! # futures::executor::block_on(async {
//! let routes = vec![
//!     Route::new("home", "/").with_view("Home"),
//!     Route::new("login", "/login").with_view("Login"),
//!     Route::new("account", "/account")
//!         .with_view("Account")
//!         .before_enter(|_from| async { HookOutcome::redirect("login") }),
//!     Route::new("notFound", "/not-found").with_view("NotFound"),
//! ];
//! let store = RouterStore::new((), routes, RouterState::new("notFound"));
//!
//! let landed = store.go_to("account").await.unwrap();
//!
//! assert_eq!(landed.route_name(), "login");
//! assert_eq!(store.active_view(), Some("Login"));
//!
//! // Hand the state over to another environment and restore it there.
//! let json = store.serialize().to_json().unwrap();
//! let login = Route::new("login", "/login").with_view("Login");
//! let other = RouterStore::new((), vec![login], "notFound");
//! other.hydrate_json(&json).unwrap();
//! assert!(other.router_state().is_equal(&landed));
//! # });
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hook;
pub mod pipeline;
pub mod route;
pub mod state;
pub mod store;
pub mod table;

pub use config::{NavigationPolicy, RouterConfig};
pub use error::{RouterError, RouterResult};
pub use hook::{HookError, HookFuture, HookOutcome, HookPhase, TransitionHook};
pub use route::Route;
pub use state::{INITIAL_ROUTE_NAME, Params, RouterState, SerializedState};
pub use store::{ErrorHook, RouterStore, SubscriptionId, TransitionListener};
pub use table::RouteTable;
