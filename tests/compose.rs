//! End-to-end composition test: sub-routers, middleware ordering, recovery.

use std::sync::Arc;

use http::Method;
use tokio::sync::Mutex;

use waypoint::{CarriesParams, Dispatcher, Next, Params, RouteError, RouteErrorCode, Router};

#[derive(Clone, Default)]
struct Req {
    params: Params,
    log: Arc<Mutex<Vec<String>>>,
}

impl CarriesParams for Req {
    fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }
}

type AppRouter = Router<Req, String>;

fn trace(
    name: &str,
) -> impl Fn(Req, Next<String>) -> std::pin::Pin<Box<dyn Future<Output = Result<String, RouteError>> + Send>>
+ Clone
+ Send
+ Sync
+ 'static {
    let name = name.to_owned();
    move |req: Req, next: Next<String>| {
        let name = name.clone();
        Box::pin(async move {
            req.log.lock().await.push(name);
            next().await
        })
    }
}

fn app() -> Dispatcher<Req, String> {
    let users = AppRouter::new()
        .get("/:id", |req: Req, _next: Next<String>| async move {
            match req.params.get("id") {
                Some("0") => Err(RouteError::handler("user 0 is reserved")),
                Some(id) => Ok(format!("user {id}")),
                None => Err(RouteError::internal("no id captured")),
            }
        })
        .post("", |_req: Req, _next: Next<String>| async move {
            Ok("created".to_owned())
        });

    let api = AppRouter::new()
        .middleware("/", trace("api"))
        .mount("/users", users)
        .catch("/users", |err: RouteError, _req: Req, _next: Next<String>| async move {
            Ok(format!("handled: {}", err.message))
        });

    let router = AppRouter::new()
        .middleware("/", trace("root"))
        .mount("/api", api)
        .get("/health", |_req: Req, _next: Next<String>| async move {
            Ok("ok".to_owned())
        });

    Dispatcher::builder(router)
        .on_no_match(|_req: Req| async move { Ok("404".to_owned()) })
        .build()
}

#[tokio::test]
async fn nested_route_runs_every_layer_in_declaration_order() {
    let dispatcher = app();
    let req = Req::default();

    let out = dispatcher
        .dispatch(&Method::GET, "/api/users/42?full=1", req.clone())
        .await
        .unwrap();
    assert_eq!(out, "user 42");
    assert_eq!(req.log.lock().await.clone(), vec!["root", "api"]);
}

#[tokio::test]
async fn post_matches_the_match_all_child_route() {
    let dispatcher = app();
    let out = dispatcher
        .dispatch(&Method::POST, "/api/users", Req::default())
        .await
        .unwrap();
    assert_eq!(out, "created");
}

#[tokio::test]
async fn failures_inside_a_mount_hit_the_sibling_catch() {
    let dispatcher = app();
    let out = dispatcher
        .dispatch(&Method::GET, "/api/users/0", Req::default())
        .await
        .unwrap();
    assert_eq!(out, "handled: user 0 is reserved");
}

#[tokio::test]
async fn top_level_routes_bypass_the_mounts() {
    let dispatcher = app();
    let req = Req::default();
    let out = dispatcher
        .dispatch(&Method::GET, "/health", req.clone())
        .await
        .unwrap();
    assert_eq!(out, "ok");
    assert_eq!(req.log.lock().await.clone(), vec!["root"]);
}

#[tokio::test]
async fn unknown_paths_fall_through_to_the_configured_no_match() {
    let dispatcher = app();
    let out = dispatcher
        .dispatch(&Method::GET, "/api/unknown", Req::default())
        .await
        .unwrap();
    assert_eq!(out, "404");
}

#[tokio::test]
async fn head_requests_reach_get_handlers() {
    let dispatcher = app();
    let out = dispatcher
        .dispatch(&Method::HEAD, "/health", Req::default())
        .await
        .unwrap();
    assert_eq!(out, "ok");
}

#[tokio::test]
async fn cloned_router_extends_without_touching_the_original() {
    let base = AppRouter::new().get("/a", |_req: Req, _next: Next<String>| async move {
        Ok("a".to_owned())
    });
    let extended = base.clone().get("/b", |_req: Req, _next: Next<String>| async move {
        Ok("b".to_owned())
    });

    let base_dispatch = Dispatcher::builder(base).build();
    let extended_dispatch = Dispatcher::builder(extended).build();

    assert_eq!(
        extended_dispatch
            .dispatch(&Method::GET, "/b", Req::default())
            .await
            .unwrap(),
        "b"
    );
    let err = base_dispatch
        .dispatch(&Method::GET, "/b", Req::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, RouteErrorCode::NotFound);
}
