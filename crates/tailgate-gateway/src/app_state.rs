//! Shared application state for the tailgate gateway.
//!
//! Built once from a validated config. The route bindings and identity header
//! are fixed for the life of the process; the policy can be swapped by
//! `reload`.

use std::sync::Arc;

use axum::http::HeaderName;
use tailgate_core::error::Result;
use tailgate_core::{Policy, ResourceBinding};

use crate::authz::PolicyStore;
use crate::config::GatewayConfig;
use crate::obs::metrics::GatewayMetrics;

/// A protected endpoint resolved from config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoute {
    pub path: String,
    pub resource: ResourceBinding,
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    identity_header: HeaderName,
    routes: Vec<ProtectedRoute>,
    policy: PolicyStore,
    metrics: GatewayMetrics,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let identity_header = cfg.gateway.identity_header_name()?;
        let routes = resolve_routes(&cfg)?;
        let policy = cfg.build_policy()?;

        let metrics = GatewayMetrics::default();
        metrics.set_policy_users(policy.len());

        tracing::info!(
            users = policy.len(),
            routes = routes.len(),
            identity_header = %identity_header,
            "authorization policy loaded"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                identity_header,
                routes,
                policy: PolicyStore::new(policy),
                metrics,
            }),
        })
    }

    pub fn identity_header(&self) -> &HeaderName {
        &self.inner.identity_header
    }

    pub fn routes(&self) -> &[ProtectedRoute] {
        &self.inner.routes
    }

    /// Currently published policy.
    pub fn policy(&self) -> Arc<Policy> {
        self.inner.policy.load()
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }

    /// Publish the policy of a freshly loaded config.
    ///
    /// Only the policy is applied; routes and the identity header stay as they
    /// were at startup. On error the current policy is left in place.
    pub fn reload(&self, cfg: &GatewayConfig) -> Result<()> {
        let policy = cfg.build_policy()?;

        if resolve_routes(cfg)? != self.inner.routes {
            tracing::warn!("route bindings changed; restart required to apply them");
        }
        if cfg.gateway.identity_header_name()? != self.inner.identity_header {
            tracing::warn!("identity header changed; restart required to apply it");
        }

        let users = policy.len();
        self.inner.policy.publish(policy);
        self.inner.metrics.set_policy_users(users);
        tracing::info!(users, "authorization policy reloaded");
        Ok(())
    }
}

fn resolve_routes(cfg: &GatewayConfig) -> Result<Vec<ProtectedRoute>> {
    cfg.routes
        .iter()
        .map(|r| {
            Ok(ProtectedRoute {
                path: r.path.clone(),
                resource: r.binding()?,
            })
        })
        .collect()
}
