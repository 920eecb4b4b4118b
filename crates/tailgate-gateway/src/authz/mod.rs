//! Authorization middleware.
//!
//! Each protected route carries an `AuthzGuard` (shared state + the route's
//! resource binding). The guard reads the asserted identity from the
//! configured header, decides against the currently published policy, and
//! either forwards the request or short-circuits with 403 / 401.

pub mod store;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tailgate_core::{ResourceBinding, Verdict};

use crate::app_state::AppState;

pub use store::PolicyStore;

/// Per-route guard state for `authorize`.
#[derive(Clone)]
pub struct AuthzGuard {
    state: AppState,
    resource: ResourceBinding,
}

impl AuthzGuard {
    pub fn new(state: AppState, resource: ResourceBinding) -> Self {
        Self { state, resource }
    }
}

/// Request extension set on allowed requests for downstream handlers.
#[derive(Debug, Clone)]
pub struct Authorized {
    pub identity: String,
    pub resource: ResourceBinding,
}

/// Asserted identity, or `""` when the header is missing or not valid UTF-8.
pub fn identity_from_headers<'a>(headers: &'a HeaderMap, name: &HeaderName) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

pub async fn authorize(State(guard): State<AuthzGuard>, mut req: Request, next: Next) -> Response {
    let identity =
        identity_from_headers(req.headers(), guard.state.identity_header()).to_owned();
    let verdict = guard.state.policy().decide(&identity, &guard.resource);

    guard
        .state
        .metrics()
        .record_decision(guard.resource.as_str(), verdict);
    tracing::debug!(
        identity = %identity,
        resource = %guard.resource,
        verdict = verdict.as_str(),
        "authz decision"
    );

    if verdict.is_allow() {
        req.extensions_mut().insert(Authorized {
            identity,
            resource: guard.resource.clone(),
        });
        return next.run(req).await;
    }
    deny(verdict)
}

fn deny(verdict: Verdict) -> Response {
    let status = verdict
        .status_code()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::FORBIDDEN);
    (status, verdict.as_str()).into_response()
}

/// Put every route of `router` behind `guard`.
pub fn protect<S>(router: Router<S>, guard: AuthzGuard) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(guard, authorize))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_or_opaque_header_is_empty_identity() {
        let name = HeaderName::from_static("tailscale-user");
        let mut h = HeaderMap::new();
        assert_eq!(identity_from_headers(&h, &name), "");

        h.insert(name.clone(), HeaderValue::from_static("bob@example.com"));
        assert_eq!(identity_from_headers(&h, &name), "bob@example.com");

        h.insert(name.clone(), HeaderValue::from_bytes(b"\xffbob").unwrap());
        assert_eq!(identity_from_headers(&h, &name), "");
    }
}
