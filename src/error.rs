use std::io;

use thiserror::Error;

use crate::relations::RelationalViolation;
use crate::schema::Violation;

/// Everything that can go wrong while checking posts.
///
/// `NotFound`, `Config` and `Io` abort a run. The per-post kinds are turned
/// into report findings and never stop sibling posts from being checked.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed front matter: {0}")]
    MalformedFrontmatter(String),

    #[error("Invalid front matter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{}", join_violations(.0))]
    Validation(Vec<Violation>),

    #[error(transparent)]
    Relational(#[from] RelationalViolation),

    #[error("Title not found in README: {0}")]
    Sync(String),

    #[error("README error: {0}")]
    Readme(String),

    #[error("Post already exists: {0}")]
    PostExists(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedFrontmatter(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, Error>;
