//! Bidirectional mapping between login strings and vertex indices.
//!
//! Indices are assigned by sorting the distinct logins lexicographically
//! (byte order) and numbering them from 0, so the same set of logins always
//! yields the same assignment.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

/// Login ↔ vertex index bijection. Both directions resolve in O(1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentityMap {
    logins: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl IdentityMap {
    /// Build the map from any collection of logins. Duplicates collapse.
    #[must_use]
    pub fn from_logins<I, S>(logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = logins.into_iter().map(Into::into).collect();
        let logins: Vec<String> = sorted.into_iter().collect();
        let index = logins
            .iter()
            .enumerate()
            .map(|(i, login)| (login.clone(), i))
            .collect();
        Self { logins, index }
    }

    /// Number of identities (= number of graph vertices).
    #[must_use]
    pub fn len(&self) -> usize {
        self.logins.len()
    }

    /// `true` if no identities are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logins.is_empty()
    }

    /// Vertex index of `login`, if known.
    #[must_use]
    pub fn vertex(&self, login: &str) -> Option<usize> {
        self.index.get(login).copied()
    }

    /// Login of vertex `v`, if in range.
    #[must_use]
    pub fn login(&self, v: usize) -> Option<&str> {
        self.logins.get(v).map(String::as_str)
    }

    /// Logins in index order.
    pub fn logins(&self) -> impl Iterator<Item = &str> {
        self.logins.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_lexicographic_order() {
        let map = IdentityMap::from_logins(["carol", "alice", "bob", "alice"]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.vertex("alice"), Some(0));
        assert_eq!(map.vertex("bob"), Some(1));
        assert_eq!(map.vertex("carol"), Some(2));
        assert_eq!(map.login(1), Some("bob"));
        assert_eq!(map.login(3), None);
        assert_eq!(map.vertex("dave"), None);
    }

    #[test]
    fn assignment_is_independent_of_input_order() {
        let a = IdentityMap::from_logins(["x", "b", "Z", "a"]);
        let b = IdentityMap::from_logins(["a", "Z", "x", "b"]);
        assert_eq!(a, b);
        // Byte order: uppercase sorts before lowercase.
        assert_eq!(a.logins().collect::<Vec<_>>(), vec!["Z", "a", "b", "x"]);
    }

    #[test]
    fn empty_map() {
        let map = IdentityMap::from_logins(Vec::<String>::new());
        assert!(map.is_empty());
        assert_eq!(map.login(0), None);
    }
}
