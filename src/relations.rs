use std::collections::HashSet;

use thiserror::Error;

use crate::post_list::{INDEX_FILE, POST_EXTENSION};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelationalViolation {
    #[error("related post does not exist: {0}")]
    Dangling(String),

    #[error("post lists itself as related: {0}")]
    SelfReference(String),
}

/// Known post keys, used to resolve `related` identifiers.
pub struct RelationIndex<'a> {
    keys: HashSet<&'a str>,
}

impl<'a> RelationIndex<'a> {
    pub fn new(keys: &'a [String]) -> Self {
        RelationIndex {
            keys: keys.iter().map(String::as_str).collect(),
        }
    }

    /// `b` resolves to `b.md`, or to `b/index.md` when only the directory
    /// form exists.
    fn resolve(&self, id: &str) -> String {
        let flat = format!("{}{}", id, POST_EXTENSION);
        if self.keys.contains(flat.as_str()) {
            return flat;
        }

        let dir = format!("{}/{}", id, INDEX_FILE);
        if self.keys.contains(dir.as_str()) {
            return dir;
        }

        flat
    }

    pub fn check(&self, key: &str, related: &[&str]) -> Vec<RelationalViolation> {
        let mut violations = vec![];
        for id in related {
            let candidate = self.resolve(id);
            if candidate == key || format!("{}{}", id, POST_EXTENSION) == key {
                violations.push(RelationalViolation::SelfReference(id.to_string()));
            } else if !self.keys.contains(candidate.as_str()) {
                violations.push(RelationalViolation::Dangling(id.to_string()));
            }
        }
        violations
    }
}
