//! Authorization policy: a flat allow-list of identity -> granted resources.
//!
//! `builder` turns directive text or a structured access list into a
//! validated `Policy`; `decide` evaluates a request against it.

pub mod binding;
pub mod builder;
pub mod decide;

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

pub use binding::ResourceBinding;
pub use builder::{parse_policy, PolicyBuilder};
pub use decide::{decide, Verdict};

use crate::error::BuildError;

/// Grant sentinel meaning "every resource".
pub const WILDCARD: &str = "*";

/// Per-identity grant list. Never empty; `*` only ever appears alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserEntry {
    allowed_resources: Vec<String>,
}

impl UserEntry {
    /// Granted resources in declaration order.
    pub fn allowed_resources(&self) -> &[String] {
        &self.allowed_resources
    }

    pub fn is_wildcard(&self) -> bool {
        self.allowed_resources.iter().any(|r| r == WILDCARD)
    }

    /// Exact, case-sensitive match; `*` matches anything.
    pub fn grants(&self, resource: &str) -> bool {
        self.allowed_resources
            .iter()
            .any(|r| r == WILDCARD || r == resource)
    }
}

/// Immutable, validated authorization policy.
///
/// Serializes to the structured access-list shape
/// `{"users": {"<identity>": {"allowed_resources": [...]}}}` and deserializes
/// from it through the same validation as directive text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AccessList")]
pub struct Policy {
    users: HashMap<String, UserEntry>,
}

impl Policy {
    /// The empty policy: nobody is authorized for anything.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn users(&self) -> impl Iterator<Item = (&str, &UserEntry)> {
        self.users.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn user(&self, identity: &str) -> Option<&UserEntry> {
        self.users.get(identity)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Access-list predicate: unknown identities are never allowed.
    pub fn is_allowed(&self, identity: &str, resource: &str) -> bool {
        self.users
            .get(identity)
            .is_some_and(|entry| entry.grants(resource))
    }
}

/// Raw structured access list, as found in JSON/YAML config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessList {
    /// Entries in document order. Repeated identities are kept so the
    /// builder can reject them instead of the map silently overwriting.
    #[serde(default, deserialize_with = "users_in_order")]
    pub users: Vec<(String, AccessListUser)>,
}

fn users_in_order<'de, D>(d: D) -> Result<Vec<(String, AccessListUser)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UsersVisitor;

    impl<'de> Visitor<'de> for UsersVisitor {
        type Value = Vec<(String, AccessListUser)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of identity -> {allowed_resources}")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, AccessListUser>()? {
                out.push(entry);
            }
            Ok(out)
        }
    }

    d.deserialize_map(UsersVisitor)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessListUser {
    #[serde(default)]
    pub allowed_resources: Vec<String>,
}

impl TryFrom<AccessList> for Policy {
    type Error = BuildError;

    fn try_from(raw: AccessList) -> Result<Self, Self::Error> {
        let mut b = PolicyBuilder::new();
        for (identity, user) in raw.users {
            b.add_user(identity, user.allowed_resources)
                .map_err(BuildError::new)?;
        }
        Ok(b.build())
    }
}
