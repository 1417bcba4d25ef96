use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use spdlog::info;

use crate::error::{Error, Result};
use crate::post_list::{INDEX_FILE, POST_EXTENSION};

#[derive(Serialize)]
struct NewFrontMatter<'a> {
    title: &'a str,
    spoiler: &'a str,
    date: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostLayout {
    /// `slug.md`, posts without images
    File,
    /// `slug/index.md`, posts with images
    Dir,
}

/// URL-safe slug: ASCII, lowercase, words joined by `-`.
pub fn slugify(title: &str) -> String {
    let ascii = unidecode::unidecode(title);
    let mut slug = String::new();
    let mut prev_dash = true;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if (c.is_whitespace() || c == '-') && !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Front matter for a fresh post followed by an empty body.
pub fn render_post(title: &str, spoiler: &str, date: &NaiveDate) -> Result<String> {
    let front_matter = NewFrontMatter {
        title,
        spoiler,
        date: date.format("%Y-%m-%d").to_string(),
    };
    let yaml = serde_yaml::to_string(&front_matter)?;

    Ok(format!("---\n{}\n---\n\n", yaml.trim()))
}

pub fn post_path(posts_dir: &Path, slug: &str, layout: PostLayout) -> PathBuf {
    match layout {
        PostLayout::File => posts_dir.join(format!("{}{}", slug, POST_EXTENSION)),
        PostLayout::Dir => posts_dir.join(slug).join(INDEX_FILE),
    }
}

/// Writes the post, never replacing an existing one.
pub fn create_post(posts_dir: &Path, slug: &str, layout: PostLayout, content: &str) -> Result<PathBuf> {
    if slug.is_empty() {
        return Err(Error::config("slug must not be empty"));
    }

    let path = post_path(posts_dir, slug, layout);
    if path.exists() {
        return Err(Error::PostExists(path.display().to_string()));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    info!("Created post {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::front_matter::ParsedPost;
    use crate::schema::{Schema, SchemaOptions, Violation};

    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("It's  a -- test"), "its-a-test");
        assert_eq!(slugify("Post title of mine Ábaco"), "post-title-of-mine-abaco");
        assert_eq!(slugify("  trailing  "), "trailing");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_rendered_post_needs_a_body() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let content = render_post("A title: with colon", "Short teaser", &date).unwrap();
        assert!(content.starts_with("---\n"));
        assert!(content.ends_with("---\n\n"));

        let parsed = ParsedPost::from_string(&content).unwrap();
        assert_eq!(parsed.title(), Some("A title: with colon"));
        assert_eq!(parsed.attribute("date").and_then(serde_yaml::Value::as_str), Some("2024-01-05"));
        assert_eq!(parsed.attribute("spoiler").and_then(serde_yaml::Value::as_str), Some("Short teaser"));

        let schema = Schema::new(SchemaOptions::default());
        match schema.validate("a-title-with-colon.md", &parsed) {
            Err(Error::Validation(violations)) => {
                assert_eq!(violations, [Violation::new("body", "is not allowed to be empty")]);
            }
            other => panic!("unexpected result {:?}", other),
        }

        let written = format!("{}Now with words.\n", content);
        assert!(schema.validate("a-title-with-colon.md", &ParsedPost::from_string(&written).unwrap()).is_ok());
    }

    #[test]
    fn test_create_post() {
        let temp = TempDir::new().unwrap();
        let path = create_post(temp.path(), "hello", PostLayout::File, "content").unwrap();
        assert_eq!(path, temp.path().join("hello.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");

        let res = create_post(temp.path(), "hello", PostLayout::File, "other");
        assert!(matches!(res, Err(Error::PostExists(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_create_dir_post() {
        let temp = TempDir::new().unwrap();
        let path = create_post(temp.path(), "gallery", PostLayout::Dir, "content").unwrap();
        assert_eq!(path, temp.path().join("gallery").join("index.md"));
        assert!(path.is_file());
    }

    #[test]
    fn test_empty_slug() {
        let temp = TempDir::new().unwrap();
        assert!(create_post(temp.path(), "", PostLayout::File, "content").is_err());
    }
}
