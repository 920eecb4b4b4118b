//! Policy Builder: directive text / access list -> validated `Policy`.
//!
//! Grants accumulate in a private map and only become a `Policy` once every
//! directive has been accepted. Any error discards the partial state.

use std::collections::HashMap;
use std::str::FromStr;

use crate::directive::{parse_directives, Directive};
use crate::error::{BuildError, BuildErrorKind};

use super::{Policy, UserEntry, WILDCARD};

const USER_DIRECTIVE: &str = "user";

/// Accumulates grants until `build` publishes them as a `Policy`.
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    users: HashMap<String, UserEntry>,
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare one identity with its granted resources (order preserved).
    pub fn add_user(
        &mut self,
        identity: String,
        resources: Vec<String>,
    ) -> Result<&mut Self, BuildErrorKind> {
        if identity.is_empty() {
            return Err(BuildErrorKind::EmptyIdentity);
        }
        if self.users.contains_key(&identity) {
            return Err(BuildErrorKind::DuplicateUser(identity));
        }
        if resources.is_empty() {
            return Err(BuildErrorKind::NoResources(identity));
        }
        if resources.len() > 1 && resources.iter().any(|r| r == WILDCARD) {
            return Err(BuildErrorKind::WildcardCombined(identity));
        }

        self.users.insert(
            identity,
            UserEntry {
                allowed_resources: resources,
            },
        );
        Ok(self)
    }

    /// Apply a single parsed directive.
    pub fn apply(&mut self, d: &Directive<'_>) -> Result<&mut Self, BuildError> {
        match d.name {
            USER_DIRECTIVE => {
                let Some((identity, resources)) = d.args.split_first() else {
                    return Err(BuildError::at(
                        d.line,
                        BuildErrorKind::ArgumentCount(USER_DIRECTIVE.into()),
                    ));
                };
                let resources = resources.iter().map(|r| r.to_string()).collect();
                self.add_user(identity.to_string(), resources)
                    .map_err(|kind| BuildError::at(d.line, kind))
            }
            other => Err(BuildError::at(
                d.line,
                BuildErrorKind::UnrecognizedDirective(other.into()),
            )),
        }
    }

    /// Finish. Consumes the builder, so nothing can mutate the result.
    pub fn build(self) -> Policy {
        Policy { users: self.users }
    }
}

/// Parse a policy block (zero or more `user <identity> <resource>...` lines).
pub fn parse_policy(text: &str) -> Result<Policy, BuildError> {
    let mut b = PolicyBuilder::new();
    for d in parse_directives(text) {
        b.apply(&d)?;
    }
    let policy = b.build();
    tracing::debug!(users = policy.len(), "policy built");
    Ok(policy)
}

impl FromStr for Policy {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_policy(s)
    }
}
