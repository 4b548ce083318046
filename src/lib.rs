//! Composable HTTP request router with continuation-based middleware chains.
//!
//! `waypoint` is the routing core a host adapter wraps: it owns the route
//! table, the path-pattern matcher, and the chain executor, and stays
//! agnostic to the host's request/response shapes. Given a method and a
//! pathname it selects an ordered handler chain, extracts path parameters,
//! and runs the chain through a `proceed` continuation that supports
//! short-circuiting, asynchronous suspension, and error propagation to a
//! designated fallback.
//!
//! Routes match in registration order — a deliberate linear scan, because
//! "handlers run in the order their routes were declared" is the guarantee
//! everything else leans on. Routers compose: a child router mounted under a
//! prefix has that prefix stripped before its own table is scanned, and the
//! same child may be mounted under several parents.
//!
//! # Example
//! ```rust,ignore
//! use http::Method;
//! use waypoint::{Dispatcher, Next, Router, RouteResult};
//!
//! let api = Router::new()
//!     .get("/users/:id", |state: AppState, _next: Next<String>| async move {
//!         Ok(format!("user {}", state.params().get("id").unwrap()))
//!     });
//!
//! let app = Router::new()
//!     .middleware("", |state: AppState, next: Next<String>| async move {
//!         // runs for every request, before the terminal handler
//!         next().await
//!     })
//!     .mount("/api", api);
//!
//! let dispatcher = Dispatcher::builder(app).build();
//! let body = dispatcher.dispatch(&Method::GET, "/api/users/42", state).await?;
//! ```

mod chain;
mod dispatch;
mod error;
mod handler;
mod params;
mod pattern;
mod router;

#[cfg(test)]
mod tests;

pub use chain::{execute, execute_recovery};
pub use dispatch::{CarriesParams, Dispatcher, DispatcherBuilder, pathname};
pub use error::{RouteError, RouteErrorCode, RouteResult};
pub use handler::{
    BoxedErrorHandler, BoxedHandler, ErrorHandler, Handler, HandlerFuture, Next,
};
pub use params::Params;
pub use pattern::RouteSpec;
pub use router::{FindResult, Router};
