use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Canonical repository name: `<owner>/<name>`.
///
/// Parsing enforces exactly two non-empty segments; anything else is a
/// [`CoreError::MalformedName`]. `Ord` makes ordered sets of names
/// deterministic, which keeps refresh cycles and test output stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoName {
    owner: String,
    name: String,
}

impl RepoName {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_owned(),
                name: name.to_owned(),
            }),
            _ => Err(CoreError::MalformedName { name: s.to_owned() }),
        }
    }
}
