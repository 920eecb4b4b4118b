//! Axum router wiring.
//!
//! Operational endpoints are mounted unguarded. Every configured route is
//! mounted at its path and everything beneath it, behind an `AuthzGuard` for
//! its resource binding. A `/` binding guards the fallback.

use axum::{
    extract::Extension,
    middleware,
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::authz::{self, Authorized, AuthzGuard};
use crate::ops;

pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state.clone());

    for route in state.routes() {
        let guard = AuthzGuard::new(state.clone(), route.resource.clone());

        if route.path == "/" {
            // Root binding covers everything not matched by another route.
            let root = Router::new()
                .fallback(whoami)
                .layer(middleware::from_fn_with_state(guard, authz::authorize));
            app = app.fallback_service(root);
            continue;
        }

        let protected = Router::new()
            .route(&route.path, any(whoami))
            .route(&format!("{}/", route.path), any(whoami))
            .route(&format!("{}/*rest", route.path), any(whoami));
        app = app.merge(authz::protect(protected, guard));
    }

    app
}

/// Downstream handler for allowed requests: echoes who was let through.
async fn whoami(Extension(auth): Extension<Authorized>) -> Json<Value> {
    Json(json!({
        "identity": auth.identity,
        "resource": auth.resource.as_str(),
    }))
}
