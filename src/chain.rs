//! Continuation-passing chain execution
//!
//! A chain behaves like nested function calls: the value resolved by
//! [`execute`] is the first handler's return value, propagated through
//! however many times it awaited the downstream result. A handler that does
//! not call its continuation terminates the chain; handlers after it never
//! run. Failures propagate to the caller untouched — the executor performs no
//! recovery of its own.
//!
//! Handlers in one chain never run concurrently with each other: a handler
//! that suspends before calling `proceed` keeps the whole chain suspended.

use std::future::ready;
use std::sync::Arc;

use crate::error::RouteError;
use crate::handler::{BoxedErrorHandler, BoxedHandler, HandlerFuture, Next};

/// Execute `handlers` in order, invoking each as `handler(args, proceed)`.
///
/// The fixed arguments are cloned once per handler invocation, so `A` should
/// be cheap to clone (typically a small struct of `Arc`s).
///
/// An empty chain — and a continuation invoked past the last handler —
/// resolves to a `ChainExhausted` error; the executor itself never invokes a
/// continuation.
pub fn execute<A, O>(handlers: Vec<BoxedHandler<A, O>>, args: A) -> HandlerFuture<O>
where
    A: Clone + Send + Sync + 'static,
    O: Send + 'static,
{
    let handlers: Arc<[BoxedHandler<A, O>]> = handlers.into();
    invoke_from(handlers, 0, args)
}

fn invoke_from<A, O>(
    handlers: Arc<[BoxedHandler<A, O>]>,
    index: usize,
    args: A,
) -> HandlerFuture<O>
where
    A: Clone + Send + Sync + 'static,
    O: Send + 'static,
{
    let Some(handler) = handlers.get(index).map(Arc::clone) else {
        return Box::pin(ready(Err(RouteError::chain_exhausted())));
    };
    let next: Next<O> = {
        let handlers = Arc::clone(&handlers);
        let args = args.clone();
        Arc::new(move || invoke_from(Arc::clone(&handlers), index + 1, args.clone()))
    };
    handler(args, next)
}

/// Run a recovery chain of error handlers for a failed normal chain.
///
/// Each error handler receives the failure, the fixed arguments, and a
/// continuation that re-invokes the remaining error handlers with the same
/// error. An empty or exhausted recovery chain resolves to the original
/// error, preserving its identity.
pub fn execute_recovery<A, O>(
    handlers: Vec<BoxedErrorHandler<A, O>>,
    error: RouteError,
    args: A,
) -> HandlerFuture<O>
where
    A: Clone + Send + Sync + 'static,
    O: Send + 'static,
{
    let handlers: Arc<[BoxedErrorHandler<A, O>]> = handlers.into();
    recover_from(handlers, 0, error, args)
}

fn recover_from<A, O>(
    handlers: Arc<[BoxedErrorHandler<A, O>]>,
    index: usize,
    error: RouteError,
    args: A,
) -> HandlerFuture<O>
where
    A: Clone + Send + Sync + 'static,
    O: Send + 'static,
{
    let Some(handler) = handlers.get(index).map(Arc::clone) else {
        return Box::pin(ready(Err(error)));
    };
    let next: Next<O> = {
        let handlers = Arc::clone(&handlers);
        let error = error.clone();
        let args = args.clone();
        Arc::new(move || recover_from(Arc::clone(&handlers), index + 1, error.clone(), args.clone()))
    };
    handler(error, args, next)
}
