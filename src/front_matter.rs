use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

const YAML_DELIMITERS: [&str; 2] = ["---", "= yaml ="];
const ALT_CLOSING: &str = "...";

/// A post split into its metadata block and markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPost {
    pub attributes: Mapping,
    pub body: String,
    pub raw_front_matter: String,
    /// 1-based line where the body starts
    pub body_begin: usize,
}

impl ParsedPost {
    pub fn from_file(file_name: &Path) -> Result<ParsedPost> {
        let content = fs::read_to_string(file_name)?;
        Self::from_string(&content)
    }

    /// Example of post
    /// ---
    /// title: Things I wish I knew
    /// date: 2024-01-01
    /// spoiler: Fewer than you would think
    /// ---
    ///
    /// Body starts here.
    pub fn from_string(content: &str) -> Result<ParsedPost> {
        let text = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = text.split_inclusive('\n');

        let Some(first) = lines.next() else {
            return Err(Error::malformed("file is empty"));
        };
        let delimiter = trim_eol(first);
        if !YAML_DELIMITERS.contains(&delimiter) {
            return Err(Error::malformed("front matter delimiter not found"));
        }

        let block_start = first.len();
        let mut offset = block_start;
        let mut line_no = 1;
        while let Some(line) = lines.next() {
            line_no += 1;
            if Self::is_closing(trim_eol(line), delimiter) {
                let raw_front_matter = text[block_start..offset].trim().to_string();

                // Blank lines after the closing delimiter belong to neither part
                let mut body_start = offset + line.len();
                let mut body_begin = line_no + 1;
                for blank in lines.by_ref().take_while(|l| l.trim().is_empty()) {
                    body_start += blank.len();
                    body_begin += 1;
                }

                let body = text[body_start..].to_string();
                let attributes = Self::parse_attributes(&raw_front_matter)?;

                return Ok(ParsedPost {
                    attributes,
                    body,
                    raw_front_matter,
                    body_begin,
                });
            }
            offset += line.len();
        }

        Err(Error::malformed("front matter block is not closed"))
    }

    fn is_closing(line: &str, delimiter: &str) -> bool {
        let rest = line.strip_prefix(delimiter).or_else(|| line.strip_prefix(ALT_CLOSING));
        matches!(rest, Some(rest) if rest.trim().is_empty())
    }

    fn parse_attributes(raw: &str) -> Result<Mapping> {
        if raw.is_empty() {
            return Ok(Mapping::new());
        }

        match serde_yaml::from_str::<Value>(raw)? {
            Value::Mapping(map) => Ok(map),
            Value::Null => Ok(Mapping::new()),
            _ => Err(Error::malformed("front matter must be a mapping of keys to values")),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn title(&self) -> Option<&str> {
        self.attribute("title")
            .and_then(Value::as_str)
            .filter(|title| !title.is_empty())
    }

    /// String entries of `related`, ignoring anything of the wrong shape.
    pub fn related(&self) -> Vec<&str> {
        match self.attribute("related") {
            Some(Value::Sequence(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => vec![],
        }
    }
}

fn trim_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}
