//! Fixed role enumeration and capability sets.
//!
//! Authorization checks compare the caller's set against a required set
//! exactly once, at authorization-check time, instead of scanning string
//! lists inline at every call site.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The fixed enumeration of roles known to the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// May author and manage content
    Editor,
    /// May read and interact with content
    Reader,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Reader => "reader",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "reader" => Ok(Role::Reader),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A set of roles held by a principal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    /// Creates an empty role set
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a role set from a slice
    pub fn from_roles(roles: &[Role]) -> Self {
        Self(roles.iter().copied().collect())
    }

    pub fn insert(&mut self, role: Role) {
        self.0.insert(role);
    }

    pub fn remove(&mut self, role: Role) {
        self.0.remove(&role);
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// True when every required role is held
    pub fn contains_all(&self, required: &[Role]) -> bool {
        required.iter().all(|r| self.0.contains(r))
    }

    /// True when at least one required role is held
    pub fn contains_any(&self, required: &[Role]) -> bool {
        required.iter().any(|r| self.0.contains(r))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

impl FromStr for RoleSet {
    type Err = String;

    /// Parses a comma-separated role list (storage representation)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = BTreeSet::new();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            set.insert(part.parse()?);
        }
        Ok(Self(set))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_all() {
        let set = RoleSet::from_roles(&[Role::Reader, Role::Editor]);
        assert!(set.contains_all(&[Role::Reader]));
        assert!(set.contains_all(&[Role::Reader, Role::Editor]));
        assert!(!set.contains_all(&[Role::Reader, Role::Admin]));
    }

    #[test]
    fn test_contains_any() {
        let set = RoleSet::from_roles(&[Role::Reader]);
        assert!(set.contains_any(&[Role::Admin, Role::Reader]));
        assert!(!set.contains_any(&[Role::Admin, Role::Editor]));
        assert!(!set.contains_any(&[]));
    }

    #[test]
    fn test_round_trip_storage_format() {
        let set = RoleSet::from_roles(&[Role::Editor, Role::Admin]);
        let encoded = set.to_string();
        let decoded: RoleSet = encoded.parse().unwrap();
        assert_eq!(set, decoded);
    }

    #[test]
    fn test_parse_rejects_unknown_role() {
        assert!("admin,owner".parse::<RoleSet>().is_err());
    }

    #[test]
    fn test_parse_empty_string() {
        let set: RoleSet = "".parse().unwrap();
        assert!(set.is_empty());
    }
}
