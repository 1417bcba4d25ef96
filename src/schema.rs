use std::fmt;
use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};
use crate::front_matter::ParsedPost;

const TITLE: &str = "title";
const DATE: &str = "date";
const SPOILER: &str = "spoiler";
const TOC: &str = "toc";
const RELATED: &str = "related";

/// Which variant of the front matter contract is enforced.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SchemaOptions {
    pub related_enabled: bool,
    pub max_related: Option<usize>,
    pub allow_unknown: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        SchemaOptions {
            related_enabled: true,
            max_related: None,
            allow_unknown: false,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Violation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    pub date: String,
    pub spoiler: String,
    pub toc: bool,
    pub related: Vec<String>,
}

/// A post whose metadata satisfied the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub key: String,
    pub front_matter: FrontMatter,
    pub body: String,
    pub raw_front_matter: String,
}

pub struct Schema {
    pub options: SchemaOptions,
}

impl Schema {
    pub fn new(options: SchemaOptions) -> Self {
        Schema { options }
    }

    /// Checks every rule and reports all violations at once.
    pub fn validate(&self, key: &str, parsed: &ParsedPost) -> Result<Post> {
        let mut checker = Checker::default();
        let attrs = &parsed.attributes;

        let title = checker.required_string(attrs, TITLE);
        let date = checker.required_string(attrs, DATE);
        if let Some(ref date) = date {
            if !is_valid_date(date) {
                checker.fail(DATE, "must match the YYYY-MM-DD pattern");
            }
        }
        let spoiler = checker.required_string(attrs, SPOILER);
        let toc = checker.optional_bool(attrs, TOC);
        let related = if self.options.related_enabled {
            checker.string_list(attrs, RELATED, self.options.max_related)
        } else {
            vec![]
        };

        if !self.options.allow_unknown {
            checker.unknown_keys(attrs, self.known_keys());
        }

        if parsed.body.is_empty() {
            checker.violations.push(Violation::new("body", "is not allowed to be empty"));
        }
        if parsed.raw_front_matter.is_empty() {
            checker.violations.push(Violation::new("raw_front_matter", "is not allowed to be empty"));
        }

        match (title, date, spoiler) {
            (Some(title), Some(date), Some(spoiler)) if checker.violations.is_empty() => Ok(Post {
                key: key.to_string(),
                front_matter: FrontMatter {
                    title,
                    date,
                    spoiler,
                    toc,
                    related,
                },
                body: parsed.body.clone(),
                raw_front_matter: parsed.raw_front_matter.clone(),
            }),
            _ => Err(Error::Validation(checker.violations)),
        }
    }

    fn known_keys(&self) -> &'static [&'static str] {
        if self.options.related_enabled {
            &[TITLE, DATE, SPOILER, TOC, RELATED]
        } else {
            &[TITLE, DATE, SPOILER, TOC]
        }
    }
}

/// Syntactic only: `2024-02-30` passes, there is no calendar lookup.
/// Month and day digits are range checked so `2023-13-45` is rejected.
pub fn is_valid_date(date: &str) -> bool {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap();
    }

    let Some(caps) = DATE_REGEX.captures(date) else {
        return false;
    };
    let month: u32 = caps[2].parse().unwrap_or(0);
    let day: u32 = caps[3].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

#[derive(Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn fail(&mut self, name: &str, message: impl Into<String>) {
        self.violations.push(Violation::new(format!("attributes.{}", name), message));
    }

    fn required_string(&mut self, attrs: &Mapping, name: &str) -> Option<String> {
        match attrs.get(name) {
            None | Some(Value::Null) => self.fail(name, "is required"),
            Some(Value::String(s)) if s.is_empty() => self.fail(name, "is not allowed to be empty"),
            Some(Value::String(s)) => return Some(s.clone()),
            Some(_) => self.fail(name, "must be a string"),
        }
        None
    }

    fn optional_bool(&mut self, attrs: &Mapping, name: &str) -> bool {
        match attrs.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                self.fail(name, "must be a boolean");
                false
            }
        }
    }

    fn string_list(&mut self, attrs: &Mapping, name: &str, max_len: Option<usize>) -> Vec<String> {
        let items = match attrs.get(name) {
            None | Some(Value::Null) => return vec![],
            Some(Value::Sequence(items)) => items,
            Some(_) => {
                self.fail(name, "must be an array");
                return vec![];
            }
        };

        if let Some(max_len) = max_len {
            if items.len() > max_len {
                self.fail(name, format!("must contain at most {} items", max_len));
            }
        }

        let mut list = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) if !s.is_empty() => list.push(s.clone()),
                _ => self.fail(&format!("{}[{}]", name, i), "must be a non-empty string"),
            }
        }
        list
    }

    fn unknown_keys(&mut self, attrs: &Mapping, known: &[&str]) {
        for key in attrs.keys() {
            match key.as_str() {
                Some(key) if known.contains(&key) => {}
                Some(key) => self.fail(key, "is not allowed"),
                None => self.violations.push(Violation::new("attributes", "keys must be strings")),
            }
        }
    }
}
