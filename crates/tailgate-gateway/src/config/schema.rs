use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::HeaderName;
use serde::Deserialize;
use tailgate_core::error::{Result, TailgateError};
use tailgate_core::policy::AccessList;
use tailgate_core::{parse_policy, Policy, ResourceBinding};

/// Paths served by the gateway itself; never protected, never bindable.
pub const RESERVED_PATHS: [&str; 2] = ["/healthz", "/metrics"];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    /// Policy as directive text (`user <identity> <resource>...` per line).
    #[serde(default)]
    pub authz: Option<String>,

    /// Policy as a structured access list. Exclusive with `authz`.
    #[serde(default)]
    pub access_list: Option<AccessList>,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TailgateError::UnsupportedVersion);
        }
        if self.authz.is_some() && self.access_list.is_some() {
            return Err(TailgateError::Config(
                "authz and access_list are mutually exclusive".into(),
            ));
        }

        self.gateway.validate()?;

        let mut seen = HashSet::new();
        for r in &self.routes {
            r.validate()?;
            if !seen.insert(r.path.as_str()) {
                return Err(TailgateError::Config(format!(
                    "duplicate route path: {}",
                    r.path
                )));
            }
        }
        // Each route already owns its whole subtree.
        for a in &self.routes {
            for b in &self.routes {
                if a.path != "/" && b.path.starts_with(&format!("{}/", a.path)) {
                    return Err(TailgateError::Config(format!(
                        "route path {} is nested under {}",
                        b.path, a.path
                    )));
                }
            }
        }

        // A config whose policy does not build is rejected as a whole.
        self.build_policy()?;
        Ok(())
    }

    /// Build a fresh, immutable policy from whichever form is configured.
    /// Neither form present means the empty policy.
    pub fn build_policy(&self) -> Result<Policy> {
        let policy = match (&self.authz, &self.access_list) {
            (Some(text), _) => parse_policy(text)?,
            (None, Some(list)) => Policy::try_from(list.clone())?,
            (None, None) => Policy::empty(),
        };
        Ok(policy)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Request header carrying the identity asserted by the upstream proxy.
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            identity_header: default_identity_header(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        self.identity_header_name()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            TailgateError::Config(format!(
                "gateway.listen must be a valid socket address: {}",
                self.listen
            ))
        })
    }

    pub fn identity_header_name(&self) -> Result<HeaderName> {
        HeaderName::from_bytes(self.identity_header.as_bytes()).map_err(|_| {
            TailgateError::Config(format!(
                "gateway.identity_header is not a valid header name: {}",
                self.identity_header
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_identity_header() -> String {
    "Tailscale-User".into()
}

/// A protected endpoint: requests under `path` are decided against `resource`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    pub path: String,
    pub resource: String,
}

impl RouteConfig {
    pub fn validate(&self) -> Result<()> {
        let p = self.path.as_str();
        if !p.starts_with('/') {
            return Err(TailgateError::Config(format!(
                "route path must start with '/': {p}"
            )));
        }
        if p.len() > 1 && p.ends_with('/') {
            return Err(TailgateError::Config(format!(
                "route path must not end with '/': {p}"
            )));
        }
        if p.contains(['*', ':', '{', '}']) || p.chars().any(char::is_whitespace) {
            return Err(TailgateError::Config(format!(
                "route path contains reserved characters: {p}"
            )));
        }
        if RESERVED_PATHS.contains(&p) {
            return Err(TailgateError::Config(format!(
                "route path collides with an operational endpoint: {p}"
            )));
        }
        self.binding()?;
        Ok(())
    }

    pub fn binding(&self) -> Result<ResourceBinding> {
        Ok(self.resource.parse::<ResourceBinding>()?)
    }
}
