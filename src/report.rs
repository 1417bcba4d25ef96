use std::fmt;
use std::fmt::{Display, Formatter};

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Read,
    FrontMatter,
    Schema,
    Relational,
    Sync,
}

impl Display for CheckKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckKind::Read => "read",
            CheckKind::FrontMatter => "front matter",
            CheckKind::Schema => "schema",
            CheckKind::Relational => "related posts",
            CheckKind::Sync => "readme",
        };
        write!(f, "{}", name)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Finding {
    pub key: String,
    pub kind: CheckKind,
    pub message: String,
}

/// Outcome of a whole run: which posts were looked at and every failed check.
#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct Report {
    pub checked: Vec<String>,
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn add(&mut self, key: &str, kind: CheckKind, message: impl Into<String>) {
        self.findings.push(Finding {
            key: key.to_string(),
            kind,
            message: message.into(),
        });
    }

    pub fn is_success(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn findings_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.key == key)
    }

    pub fn failed_posts(&self) -> usize {
        self.checked.iter()
            .filter(|key| self.findings_for(key).next().is_some())
            .count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for key in &self.checked {
            let mut findings = self.findings_for(key).peekable();
            if findings.peek().is_none() {
                writeln!(f, "ok    {}", key)?;
                continue;
            }
            writeln!(f, "FAIL  {}", key)?;
            for finding in findings {
                writeln!(f, "      [{}] {}", finding.kind, finding.message)?;
            }
        }
        write!(f, "{} posts checked, {} failed, {} problems",
               self.checked.len(),
               self.failed_posts(),
               self.findings.len()
        )
    }
}
