//! Handler traits and type erasure
//!
//! Handlers are invoked as `handler(args, proceed)` where `proceed` is a
//! zero-argument continuation running the remainder of the chain. A handler
//! that never calls `proceed` short-circuits the chain; one that awaits it
//! forwards (and may observe) the downstream result.
//!
//! Error handlers are a separate, explicitly tagged registration kind: they
//! receive the failure that aborted the normal chain along with their own
//! continuation, which re-invokes the remaining error handlers with the same
//! error.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::{RouteError, RouteResult};

/// Future returned by handlers and continuations.
pub type HandlerFuture<O> = BoxFuture<'static, RouteResult<O>>;

/// Continuation invoking the remainder of a chain.
///
/// Calling it more than once re-invokes the remainder from the same position;
/// a correct handler calls it at most once.
pub type Next<O> = Arc<dyn Fn() -> HandlerFuture<O> + Send + Sync>;

/// Type-erased handler stored in the route table.
pub type BoxedHandler<A, O> = Arc<dyn Fn(A, Next<O>) -> HandlerFuture<O> + Send + Sync>;

/// Type-erased error handler stored in the route table.
pub type BoxedErrorHandler<A, O> =
    Arc<dyn Fn(RouteError, A, Next<O>) -> HandlerFuture<O> + Send + Sync>;

/// Trait for chain handlers.
///
/// Automatically implemented for async functions and closures with the
/// signature `async fn(A, Next<O>) -> RouteResult<O>`.
pub trait Handler<A, O>: Clone + Send + Sync + 'static
where
    A: Send + 'static,
    O: Send + 'static,
{
    /// The future type returned by the handler
    type Future: Future<Output = RouteResult<O>> + Send + 'static;

    /// Call the handler with the fixed arguments and the continuation
    fn call(&self, args: A, next: Next<O>) -> Self::Future;
}

impl<A, O, F, Fut> Handler<A, O> for F
where
    A: Send + 'static,
    O: Send + 'static,
    F: Fn(A, Next<O>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = RouteResult<O>> + Send + 'static,
{
    type Future = Fut;

    fn call(&self, args: A, next: Next<O>) -> Self::Future {
        (self)(args, next)
    }
}

/// Trait for error handlers registered via `catch`.
///
/// Automatically implemented for async functions and closures with the
/// signature `async fn(RouteError, A, Next<O>) -> RouteResult<O>`.
pub trait ErrorHandler<A, O>: Clone + Send + Sync + 'static
where
    A: Send + 'static,
    O: Send + 'static,
{
    /// The future type returned by the error handler
    type Future: Future<Output = RouteResult<O>> + Send + 'static;

    /// Handle the failure, optionally delegating to the next error handler
    fn call(&self, error: RouteError, args: A, next: Next<O>) -> Self::Future;
}

impl<A, O, F, Fut> ErrorHandler<A, O> for F
where
    A: Send + 'static,
    O: Send + 'static,
    F: Fn(RouteError, A, Next<O>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = RouteResult<O>> + Send + 'static,
{
    type Future = Fut;

    fn call(&self, error: RouteError, args: A, next: Next<O>) -> Self::Future {
        (self)(error, args, next)
    }
}

/// Convert a handler into a boxed handler for storage
pub(crate) fn into_boxed<A, O, H>(handler: H) -> BoxedHandler<A, O>
where
    A: Send + 'static,
    O: Send + 'static,
    H: Handler<A, O>,
{
    Arc::new(move |args, next| Box::pin(handler.call(args, next)))
}

/// Convert an error handler into a boxed error handler for storage
pub(crate) fn into_boxed_error<A, O, H>(handler: H) -> BoxedErrorHandler<A, O>
where
    A: Send + 'static,
    O: Send + 'static,
    H: ErrorHandler<A, O>,
{
    Arc::new(move |error, args, next| Box::pin(handler.call(error, args, next)))
}
