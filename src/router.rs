//! Route table, matching, and composition
//!
//! The route table is an append-only list scanned linearly in registration
//! order. That scan is the load-bearing ordering guarantee of the whole
//! crate: handlers run in the order their routes were declared, including
//! across mounted sub-routers, whose matches are spliced in at the position
//! their mount entry occupies. Any restructuring for lookup speed must
//! preserve this total order exactly.

use std::fmt;
use std::sync::Arc;

use http::Method;

use crate::chain;
use crate::handler::{
    BoxedErrorHandler, BoxedHandler, ErrorHandler, Handler, HandlerFuture, into_boxed,
    into_boxed_error,
};
use crate::params::Params;
use crate::pattern::{Pattern, RouteSpec};

/// What a route entry contributes once matched.
enum RoutePayload<A, O> {
    /// A normal chain handler.
    Handler(BoxedHandler<A, O>),
    /// An error handler, run only when the normal chain fails.
    ErrorHandler(BoxedErrorHandler<A, O>),
    /// A mounted sub-router, expanded lazily at match time.
    Mounted(Arc<Router<A, O>>),
}

impl<A, O> Clone for RoutePayload<A, O> {
    fn clone(&self) -> Self {
        match self {
            Self::Handler(h) => Self::Handler(Arc::clone(h)),
            Self::ErrorHandler(h) => Self::ErrorHandler(Arc::clone(h)),
            Self::Mounted(r) => Self::Mounted(Arc::clone(r)),
        }
    }
}

impl<A, O> fmt::Debug for RoutePayload<A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(_) => f.write_str("Handler"),
            Self::ErrorHandler(_) => f.write_str("ErrorHandler"),
            Self::Mounted(r) => write!(f, "Mounted({} routes)", r.routes.len()),
        }
    }
}

/// One registration: a method gate, a compiled pattern, and a payload.
struct RouteEntry<A, O> {
    /// `None` matches every method.
    method: Option<Method>,
    pattern: Pattern,
    /// Literal prefix stripped before delegating to a mounted router.
    /// Set only on mount entries; normalized to carry a leading `/`.
    mount_base: Option<String>,
    payload: RoutePayload<A, O>,
    /// True for entries registered via `middleware`/`catch`/`mount`
    /// (loose matching); false for terminal routes.
    is_middleware: bool,
}

impl<A, O> Clone for RouteEntry<A, O> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            pattern: self.pattern.clone(),
            mount_base: self.mount_base.clone(),
            payload: self.payload.clone(),
            is_middleware: self.is_middleware,
        }
    }
}

impl<A, O> fmt::Debug for RouteEntry<A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("payload", &self.payload)
            .field("is_middleware", &self.is_middleware)
            .finish()
    }
}

/// Everything matched for one request.
///
/// `handlers` is the flattened, order-preserving concatenation of every
/// matching entry's handlers; `params` maps parameter names to captured
/// values with later-scanned matches overwriting earlier ones;
/// `matched_terminal` is true iff at least one matching entry at any nesting
/// level was a terminal route. A result whose `matched_terminal` is false
/// must be treated as "not found" even when middleware matched.
pub struct FindResult<A, O> {
    /// Matched chain handlers, in registration order.
    pub handlers: Vec<BoxedHandler<A, O>>,
    /// Matched error handlers, in registration order.
    pub error_handlers: Vec<BoxedErrorHandler<A, O>>,
    /// Captured path parameters.
    pub params: Params,
    /// True iff a terminal (non-middleware) route matched.
    pub matched_terminal: bool,
}

impl<A, O> Default for FindResult<A, O> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            error_handlers: Vec::new(),
            params: Params::new(),
            matched_terminal: false,
        }
    }
}

impl<A, O> fmt::Debug for FindResult<A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FindResult")
            .field("handlers", &self.handlers.len())
            .field("error_handlers", &self.error_handlers.len())
            .field("params", &self.params)
            .field("matched_terminal", &self.matched_terminal)
            .finish()
    }
}

/// An ordered route table with continuation-based chain execution.
///
/// Generic over the host's argument bundle `A` — cloned into every handler
/// invocation, so keep it a small struct of `Arc`s — and the chain output
/// `O`. The router imposes no threading model of its own; registration is a
/// build-time activity and the table is read-only during request service.
///
/// # Example
/// ```rust,ignore
/// let api = Router::new()
///     .get("/users/:id", get_user)
///     .post("/users", create_user);
///
/// let app = Router::new()
///     .middleware("", log_request)
///     .mount("/api", api);
///
/// let found = app.find(&Method::GET, "/api/users/42");
/// assert_eq!(found.params.get("id"), Some("42"));
/// ```
pub struct Router<A, O> {
    routes: Vec<RouteEntry<A, O>>,
}

impl<A, O> Clone for Router<A, O> {
    /// Produce a structurally independent copy of the route table.
    ///
    /// Appending to the clone never mutates the original. Handlers and
    /// mounted sub-routers are shared by reference.
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
        }
    }
}

impl<A, O> Default for Router<A, O>
where
    A: Clone + Send + Sync + 'static,
    O: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, O> fmt::Debug for Router<A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .finish()
    }
}

impl<A, O> Router<A, O>
where
    A: Clone + Send + Sync + 'static,
    O: Send + 'static,
{
    /// Create an empty router.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Number of registered entries, counting a mounted router as one.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn push(
        &mut self,
        method: Option<Method>,
        spec: RouteSpec,
        mount_base: Option<String>,
        payload: RoutePayload<A, O>,
        is_middleware: bool,
    ) {
        self.routes.push(RouteEntry {
            method,
            pattern: Pattern::compile(spec, is_middleware),
            mount_base,
            payload,
            is_middleware,
        });
    }

    /// Register a terminal route for `method`.
    ///
    /// Pass `""` (or [`RouteSpec::Any`]) to match every pathname. Registering
    /// the same spec repeatedly appends handlers in call order, which is also
    /// their execution order.
    pub fn add<H>(mut self, method: Method, spec: impl Into<RouteSpec>, handler: H) -> Self
    where
        H: Handler<A, O>,
    {
        self.push(
            Some(method),
            spec.into(),
            None,
            RoutePayload::Handler(into_boxed(handler)),
            false,
        );
        self
    }

    /// Register a terminal route matching every method.
    pub fn all<H>(mut self, spec: impl Into<RouteSpec>, handler: H) -> Self
    where
        H: Handler<A, O>,
    {
        self.push(
            None,
            spec.into(),
            None,
            RoutePayload::Handler(into_boxed(handler)),
            false,
        );
        self
    }

    /// Register a terminal `GET` route. `HEAD` requests reuse it.
    pub fn get<H>(self, spec: impl Into<RouteSpec>, handler: H) -> Self
    where
        H: Handler<A, O>,
    {
        self.add(Method::GET, spec, handler)
    }

    /// Register a terminal `HEAD` route.
    pub fn head<H>(self, spec: impl Into<RouteSpec>, handler: H) -> Self
    where
        H: Handler<A, O>,
    {
        self.add(Method::HEAD, spec, handler)
    }

    /// Register a terminal `POST` route.
    pub fn post<H>(self, spec: impl Into<RouteSpec>, handler: H) -> Self
    where
        H: Handler<A, O>,
    {
        self.add(Method::POST, spec, handler)
    }

    /// Register a terminal `PUT` route.
    pub fn put<H>(self, spec: impl Into<RouteSpec>, handler: H) -> Self
    where
        H: Handler<A, O>,
    {
        self.add(Method::PUT, spec, handler)
    }

    /// Register a terminal `PATCH` route.
    pub fn patch<H>(self, spec: impl Into<RouteSpec>, handler: H) -> Self
    where
        H: Handler<A, O>,
    {
        self.add(Method::PATCH, spec, handler)
    }

    /// Register a terminal `DELETE` route.
    pub fn delete<H>(self, spec: impl Into<RouteSpec>, handler: H) -> Self
    where
        H: Handler<A, O>,
    {
        self.add(Method::DELETE, spec, handler)
    }

    /// Register a middleware handler, loose-matched against `spec`.
    ///
    /// Loose matching treats the template as a prefix of whole segments:
    /// `/api` matches `/api`, `/api/`, and `/api/v1/users`, but not
    /// `/apikey`. Pass `""` to run for every request.
    pub fn middleware<H>(mut self, spec: impl Into<RouteSpec>, handler: H) -> Self
    where
        H: Handler<A, O>,
    {
        self.push(
            None,
            spec.into(),
            None,
            RoutePayload::Handler(into_boxed(handler)),
            true,
        );
        self
    }

    /// Register an error handler, loose-matched against `spec`.
    ///
    /// Error handlers never run in the normal chain. When the normal chain
    /// fails, the matched error handlers run as their own chain: each
    /// receives the failure, the fixed arguments, and a continuation
    /// delegating to the next error handler.
    pub fn catch<H>(mut self, spec: impl Into<RouteSpec>, handler: H) -> Self
    where
        H: ErrorHandler<A, O>,
    {
        self.push(
            None,
            spec.into(),
            None,
            RoutePayload::ErrorHandler(into_boxed_error(handler)),
            true,
        );
        self
    }

    /// Mount a sub-router under `base`.
    ///
    /// The entry is loose-matched; at match time the literal `base` prefix is
    /// stripped from the pathname (restoring the leading `/`) before the
    /// child's own table is scanned, and the child's result is spliced in at
    /// this entry's position. The child is shared by reference: mounting the
    /// same router under several parents is legal, and each parent strips
    /// its own prefix independently.
    pub fn mount(mut self, base: &str, child: impl Into<Arc<Router<A, O>>>) -> Self {
        let base = normalize_base(base);
        self.push(
            None,
            RouteSpec::from(base.as_str()),
            Some(base),
            RoutePayload::Mounted(child.into()),
            true,
        );
        self
    }

    /// Scan the table in registration order and collect everything matching
    /// `(method, pathname)`.
    ///
    /// A pathname with no matching entries yields an empty result. A result
    /// matching only middleware has handlers but `matched_terminal == false`
    /// and must be treated as "not found" by callers deciding final routing.
    pub fn find(&self, method: &Method, pathname: &str) -> FindResult<A, O> {
        let mut result = FindResult::default();
        self.find_into(method, pathname, &mut result);
        tracing::trace!(
            method = %method,
            pathname,
            handlers = result.handlers.len(),
            matched_terminal = result.matched_terminal,
            "route lookup"
        );
        result
    }

    fn find_into(&self, method: &Method, pathname: &str, out: &mut FindResult<A, O>) {
        let is_head = *method == Method::HEAD;
        for entry in &self.routes {
            if let Some(gate) = &entry.method {
                // HEAD transparently reuses GET registrations.
                if gate != method && !(is_head && *gate == Method::GET) {
                    continue;
                }
            }
            if !entry.pattern.matches(pathname, &mut out.params) {
                continue;
            }
            match &entry.payload {
                RoutePayload::Handler(h) => out.handlers.push(Arc::clone(h)),
                RoutePayload::ErrorHandler(h) => out.error_handlers.push(Arc::clone(h)),
                RoutePayload::Mounted(child) => {
                    let base = entry.mount_base.as_deref().unwrap_or("/");
                    let sub = strip_base(pathname, base);
                    child.find_into(method, &sub, out);
                    continue;
                }
            }
            if !entry.is_middleware {
                out.matched_terminal = true;
            }
        }
    }

    /// Execute a handler list produced by [`Router::find`].
    ///
    /// Provided on the router for symmetry with registration; forwards to
    /// [`execute`](crate::execute).
    pub fn exec(handlers: Vec<BoxedHandler<A, O>>, args: A) -> HandlerFuture<O> {
        chain::execute(handlers, args)
    }
}

/// Normalize a mount base: leading `/`, no trailing `/` (the root stays `/`).
fn normalize_base(base: &str) -> String {
    let mut out = String::with_capacity(base.len() + 1);
    if !base.starts_with('/') {
        out.push('/');
    }
    out.push_str(base);
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Strip a mount prefix, restoring the leading `/` when stripping removed it.
///
/// A pathname that does not carry the literal prefix (possible when the mount
/// base itself holds placeholders) is delegated unchanged.
fn strip_base(pathname: &str, base: &str) -> String {
    let rest = pathname.strip_prefix(base).unwrap_or(pathname);
    if rest.starts_with('/') {
        rest.to_owned()
    } else {
        format!("/{rest}")
    }
}
