//! Resource bindings: the single resource name a protected endpoint maps to.

use std::fmt;
use std::str::FromStr;

use crate::error::{BuildError, BuildErrorKind};

use super::WILDCARD;

const BINDING_KEYWORD: &str = "resource";

/// Validated resource name: exactly one token, never `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceBinding(String);

impl ResourceBinding {
    /// Build from the argument tokens that follow `keyword` in a binding
    /// directive (`<keyword> <resource>`).
    pub fn from_args(keyword: &str, args: &[&str]) -> Result<Self, BuildError> {
        let [name] = args else {
            return Err(BuildError::new(BuildErrorKind::ArgumentCount(
                keyword.into(),
            )));
        };
        if *name == WILDCARD {
            return Err(BuildError::new(BuildErrorKind::WildcardBinding));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ResourceBinding {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let args: Vec<&str> = s.split_whitespace().collect();
        Self::from_args(BINDING_KEYWORD, &args)
    }
}

impl AsRef<str> for ResourceBinding {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
