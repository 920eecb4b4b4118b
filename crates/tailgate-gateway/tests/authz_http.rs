//! Router-level verdict -> status mapping.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use tailgate_gateway::{app_state::AppState, config, router};

const CONFIG: &str = r#"
version: 1
authz: |
  user bob resource1 resource2
  user alice *
routes:
  - path: "/r1"
    resource: "resource1"
  - path: "/r3"
    resource: "resource3"
"#;

fn app_from(yaml: &str) -> (AppState, Router) {
    let cfg = config::load_from_str(yaml).unwrap();
    let state = AppState::new(cfg).unwrap();
    let app = router::build_router(state.clone());
    (state, app)
}

async fn get(app: &Router, uri: &str, identity: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder().method("GET").uri(uri);
    if let Some(id) = identity {
        req = req.header("Tailscale-User", id);
    }
    let resp = app
        .clone()
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 64 * 1024)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn allowed_identity_is_forwarded() {
    let (_, app) = app_from(CONFIG);

    let (status, body) = get(&app, "/r1", Some("bob")).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["identity"], "bob");
    assert_eq!(v["resource"], "resource1");
}

#[tokio::test]
async fn subpaths_share_the_binding() {
    let (_, app) = app_from(CONFIG);
    let (status, _) = get(&app, "/r1/deep/path", Some("bob")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, "/r3/deep/path", Some("bob")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unentitled_identity_is_forbidden() {
    let (_, app) = app_from(CONFIG);
    let (status, body) = get(&app, "/r3", Some("bob")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, b"forbidden");

    let (status, _) = get(&app, "/r1", Some("dave")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_identity_is_unauthenticated() {
    let (_, app) = app_from(CONFIG);
    let (status, body) = get(&app, "/r1", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, b"unauthenticated");

    let (status, _) = get(&app, "/r1", Some("")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wildcard_identity_reaches_every_route() {
    let (_, app) = app_from(CONFIG);
    for uri in ["/r1", "/r3"] {
        let (status, _) = get(&app, uri, Some("alice")).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn operational_endpoints_are_not_guarded() {
    let (_, app) = app_from(CONFIG);
    let (status, body) = get(&app, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    let _ = get(&app, "/r3", Some("bob")).await;
    let (status, body) = get(&app, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains(
        "tailgate_policy_decisions_total{resource=\"resource3\",verdict=\"forbidden\"} 1"
    ));
    assert!(text.contains("tailgate_policy_users 2"));
}

#[tokio::test]
async fn unbound_paths_are_not_found() {
    let (_, app) = app_from(CONFIG);
    let (status, _) = get(&app, "/elsewhere", Some("alice")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn root_binding_guards_the_fallback() {
    let yaml = r#"
version: 1
authz: "user bob site"
routes:
  - { path: "/", resource: site }
"#;
    let (_, app) = app_from(yaml);
    let (status, _) = get(&app, "/any/thing", Some("bob")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, "/", Some("dave")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = get(&app, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn custom_identity_header() {
    let yaml = r#"
version: 1
gateway:
  identity_header: "X-Forwarded-User"
authz: "user bob site"
routes:
  - { path: "/site", resource: site }
"#;
    let (_, app) = app_from(yaml);

    // The default header is ignored once another one is configured.
    let (status, _) = get(&app, "/site", Some("bob")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/site")
        .header("X-Forwarded-User", "bob")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_policy_forbids_everyone() {
    let yaml = "version: 1\nroutes:\n  - { path: /site, resource: site }\n";
    let (_, app) = app_from(yaml);
    let (status, _) = get(&app, "/site", Some("anyone")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn trailing_slash_is_decided_like_the_route() {
    let (_, app) = app_from(CONFIG);
    let (status, _) = get(&app, "/r1/", Some("bob")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, "/r3/", Some("bob")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = get(&app, "/r1/", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
