//! Host-adapter contracts
//!
//! The dispatcher is the piece a host adapter wraps around a [`Router`]: it
//! computes the pathname from the request target, runs the lookup, attaches
//! captured parameters to the host's request state, executes the chain, and
//! translates "no match" and "unhandled failure" into configured terminal
//! behaviors. Defaults are explicit configuration, not module state: with
//! nothing configured, no-match yields a `NotFound` error and failures
//! propagate unchanged.

use std::future::{Future, ready};
use std::sync::Arc;

use http::Method;

use crate::chain;
use crate::error::{RouteError, RouteResult};
use crate::handler::HandlerFuture;
use crate::params::Params;
use crate::router::Router;

/// Access to the parameter map carried by the host's request state.
///
/// The dispatcher merges captured parameters through this trait without
/// overwriting values already present — an outer router's captures survive
/// nested re-entry.
pub trait CarriesParams {
    /// The request state's parameter map.
    fn params_mut(&mut self) -> &mut Params;
}

type NoMatchFn<A, O> = Arc<dyn Fn(A) -> HandlerFuture<O> + Send + Sync>;
type OnErrorFn<A, O> = Arc<dyn Fn(RouteError, A) -> HandlerFuture<O> + Send + Sync>;

/// Drives a [`Router`] for a host runtime.
///
/// # Example
/// ```rust,ignore
/// let dispatcher = Dispatcher::builder(router)
///     .on_no_match(|state| async move { render_404(state).await })
///     .on_error(|err, state| async move { render_500(err, state).await })
///     .build();
///
/// let outcome = dispatcher.dispatch(&Method::GET, "/users/42?expand=1", state).await;
/// ```
pub struct Dispatcher<A, O> {
    router: Router<A, O>,
    on_no_match: NoMatchFn<A, O>,
    on_error: OnErrorFn<A, O>,
}

/// Builder for [`Dispatcher`], with documented defaults for both fallbacks.
pub struct DispatcherBuilder<A, O> {
    router: Router<A, O>,
    on_no_match: Option<NoMatchFn<A, O>>,
    on_error: Option<OnErrorFn<A, O>>,
}

impl<A, O> DispatcherBuilder<A, O>
where
    A: Clone + Send + Sync + 'static,
    O: Send + 'static,
{
    /// Configure the terminal behavior when no terminal route matched.
    ///
    /// Default: resolve to [`RouteError::not_found`].
    pub fn on_no_match<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RouteResult<O>> + Send + 'static,
    {
        self.on_no_match = Some(Arc::new(move |args| Box::pin(f(args))));
        self
    }

    /// Configure the terminal behavior for failures no error handler
    /// recovered.
    ///
    /// Default: propagate the failure unchanged.
    pub fn on_error<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(RouteError, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RouteResult<O>> + Send + 'static,
    {
        self.on_error = Some(Arc::new(move |err, args| Box::pin(f(err, args))));
        self
    }

    /// Finish the builder.
    pub fn build(self) -> Dispatcher<A, O> {
        Dispatcher {
            router: self.router,
            on_no_match: self.on_no_match.unwrap_or_else(|| {
                Arc::new(|_| {
                    Box::pin(ready(Err(RouteError::not_found(
                        "no route matched the request",
                    ))))
                })
            }),
            on_error: self
                .on_error
                .unwrap_or_else(|| Arc::new(|err, _| Box::pin(ready(Err(err))))),
        }
    }
}

impl<A, O> Dispatcher<A, O>
where
    A: CarriesParams + Clone + Send + Sync + 'static,
    O: Send + 'static,
{
    /// Start configuring a dispatcher around `router`.
    pub fn builder(router: Router<A, O>) -> DispatcherBuilder<A, O> {
        DispatcherBuilder {
            router,
            on_no_match: None,
            on_error: None,
        }
    }

    /// The wrapped router.
    pub fn router(&self) -> &Router<A, O> {
        &self.router
    }

    /// Route one request to completion.
    ///
    /// Computes the pathname from `target`, looks up the chain, merges
    /// captured parameters into `args` (existing values win), and executes.
    /// An empty or middleware-only match is handed to `on_no_match`; a
    /// failure is first offered to the matched error handlers and, if none
    /// recovers, to `on_error`.
    pub async fn dispatch(&self, method: &Method, target: &str, mut args: A) -> RouteResult<O> {
        let found = self.router.find(method, pathname(target));
        args.params_mut().fill_missing(found.params);
        if found.handlers.is_empty() || !found.matched_terminal {
            return (self.on_no_match)(args).await;
        }
        match chain::execute(found.handlers, args.clone()).await {
            Ok(out) => Ok(out),
            Err(err) => {
                tracing::debug!(error = %err, "handler chain failed");
                match chain::execute_recovery(found.error_handlers, err, args.clone()).await {
                    Ok(out) => Ok(out),
                    Err(err) => (self.on_error)(err, args).await,
                }
            }
        }
    }

    /// Execute whatever matched, without no-match or error translation.
    ///
    /// Middleware-only matches do run here. Returns `Ok(None)` when nothing
    /// matched at all; failures propagate to the caller untouched. This is
    /// the escape hatch for adapters layering their own terminal behavior.
    pub async fn run(&self, method: &Method, target: &str, mut args: A) -> RouteResult<Option<O>> {
        let found = self.router.find(method, pathname(target));
        if found.handlers.is_empty() {
            return Ok(None);
        }
        args.params_mut().fill_missing(found.params);
        chain::execute(found.handlers, args).await.map(Some)
    }
}

/// The path component of a request target: everything before the first `?`.
pub fn pathname(target: &str) -> &str {
    target.split_once('?').map_or(target, |(path, _)| path)
}
