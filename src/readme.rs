use std::fs;
use std::path::Path;

use regex::{NoExpand, Regex};
use serde::Deserialize;
use serde_yaml::Value;
use spdlog::{info, warn};

use crate::error::{Error, Result};
use crate::front_matter::ParsedPost;
use crate::post_list::{slug_of, PostList};

pub const START_MARKER: &str = "<!--START_POSTS-->";
pub const END_MARKER: &str = "<!--END_POSTS-->";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReadmeOptions {
    pub site_url: String,
    pub start_marker: String,
    pub end_marker: String,
}

impl Default for ReadmeOptions {
    fn default() -> Self {
        ReadmeOptions {
            site_url: String::new(),
            start_marker: START_MARKER.to_string(),
            end_marker: END_MARKER.to_string(),
        }
    }
}

/// Literal containment, no whitespace or case folding.
pub fn check_title(readme: &str, title: &str) -> Result<()> {
    if readme.contains(title) {
        Ok(())
    } else {
        Err(Error::Sync(title.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadmeEntry {
    pub title: String,
    pub date: String,
    pub slug: String,
}

pub fn collect_entries(post_list: &PostList) -> Result<Vec<ReadmeEntry>> {
    let mut keys = post_list.retrieve_keys()?;
    // Posts sharing a date keep key order, not listing order
    keys.sort();

    let mut entries = vec![];
    for key in keys {
        let parsed = match ParsedPost::from_file(&post_list.path_of(&key)) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Leaving {} out of the README: {}", key, e);
                continue;
            }
        };

        let Some(title) = parsed.title() else {
            warn!("Leaving {} out of the README: no title", key);
            continue;
        };
        let date = parsed.attribute("date").and_then(Value::as_str).unwrap_or_default();

        entries.push(ReadmeEntry {
            title: title.to_string(),
            date: date.to_string(),
            slug: slug_of(&key).to_string(),
        });
    }
    Ok(entries)
}

/// Newest first, one `- [title](url)` line per post.
pub fn generate_list(mut entries: Vec<ReadmeEntry>, site_url: &str) -> String {
    entries.sort_by(|a, b| b.date.cmp(&a.date));

    let site_url = site_url.trim_end_matches('/');
    entries.iter()
        .map(|entry| format!("- [{}]({}/posts/{})", entry.title, site_url, entry.slug))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn replace_block(readme: &str, list: &str, options: &ReadmeOptions) -> Result<String> {
    let pattern = format!("(?s){}.*{}", regex::escape(&options.start_marker), regex::escape(&options.end_marker));
    let block_regex = Regex::new(&pattern).map_err(|e| Error::Readme(e.to_string()))?;

    if !block_regex.is_match(readme) {
        return Err(Error::Readme(format!("markers {} and {} not found", options.start_marker, options.end_marker)));
    }

    let fenced = format!("{}\n{}\n{}", options.start_marker, list, options.end_marker);
    Ok(block_regex.replace(readme, NoExpand(&fenced)).into_owned())
}

/// Rewrites the post list block of the README. With `dry_run` the file is
/// left untouched and the new contents are only returned.
pub fn compile_readme(post_list: &PostList, readme_path: &Path, options: &ReadmeOptions, dry_run: bool) -> Result<String> {
    let readme = match fs::read_to_string(readme_path) {
        Ok(readme) => readme,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::not_found(format!("README {}", readme_path.display())));
        }
        Err(e) => return Err(e.into()),
    };

    let entries = collect_entries(post_list)?;
    let count = entries.len();
    let list = generate_list(entries, &options.site_url);
    let contents = replace_block(&readme, &list, options)?;

    if !dry_run {
        fs::write(readme_path, &contents)?;
        info!("README {} now lists {} posts", readme_path.display(), count);
    }
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::test_data::{POST_A, POST_B, POST_NO_FRONT_MATTER, README};

    use super::*;

    fn entry(title: &str, date: &str, slug: &str) -> ReadmeEntry {
        ReadmeEntry {
            title: title.to_string(),
            date: date.to_string(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn test_check_title() {
        assert!(check_title(README, "A").is_ok());
        assert!(check_title(README, "B").is_ok());
        assert!(matches!(check_title(README, "Zebra"), Err(Error::Sync(t)) if t == "Zebra"));
    }

    #[test]
    fn test_check_title_is_literal() {
        let readme = "- [Hello  World](x)";
        assert!(check_title(readme, "Hello World").is_err());
        assert!(check_title(readme, "hello  world").is_err());
    }

    #[test]
    fn test_generate_list_newest_first() {
        let entries = vec![
            entry("Old", "2020-05-01", "old"),
            entry("New", "2024-01-02", "new"),
            entry("Mid", "2022-11-30", "mid"),
        ];
        let list = generate_list(entries, "https://example.com/");
        assert_eq!(list, "- [New](https://example.com/posts/new)\n- [Mid](https://example.com/posts/mid)\n- [Old](https://example.com/posts/old)");
    }

    #[test]
    fn test_replace_block() {
        let list = "- [C](https://example.com/posts/c)";
        let res = replace_block(README, list, &ReadmeOptions::default()).unwrap();
        assert!(res.starts_with("# My blog\n"));
        assert!(res.contains("<!--START_POSTS-->\n- [C](https://example.com/posts/c)\n<!--END_POSTS-->"));
        assert!(!res.contains("- [A]"));
        assert!(res.ends_with("Thanks for reading.\n"));
    }

    #[test]
    fn test_replace_block_keeps_dollars() {
        let res = replace_block(README, "- [Save $1](u)", &ReadmeOptions::default()).unwrap();
        assert!(res.contains("- [Save $1](u)"));
    }

    #[test]
    fn test_replace_block_without_markers() {
        let res = replace_block("# Nothing here", "- [A](a)", &ReadmeOptions::default());
        assert!(matches!(res, Err(Error::Readme(_))));
    }

    #[test]
    fn test_compile_readme() {
        let temp = TempDir::new().unwrap();
        let posts = temp.path().join("posts");
        fs::create_dir_all(posts.join("b")).unwrap();
        fs::write(posts.join("a.md"), POST_A).unwrap();
        fs::write(posts.join("b").join("index.md"), POST_B).unwrap();
        fs::write(posts.join("broken.md"), POST_NO_FRONT_MATTER).unwrap();
        let readme_path = temp.path().join("README.md");
        fs::write(&readme_path, "intro\n<!--START_POSTS-->\n<!--END_POSTS-->\n").unwrap();

        let options = ReadmeOptions { site_url: "https://blog.test".to_string(), ..ReadmeOptions::default() };
        let list = PostList::new(&posts);

        let preview = compile_readme(&list, &readme_path, &options, true).unwrap();
        assert_eq!(fs::read_to_string(&readme_path).unwrap(), "intro\n<!--START_POSTS-->\n<!--END_POSTS-->\n");

        let written = compile_readme(&list, &readme_path, &options, false).unwrap();
        assert_eq!(preview, written);
        assert_eq!(written, "intro\n<!--START_POSTS-->\n- [B](https://blog.test/posts/b)\n- [A](https://blog.test/posts/a)\n<!--END_POSTS-->\n");
        assert_eq!(fs::read_to_string(&readme_path).unwrap(), written);
    }

    #[test]
    fn test_same_date_posts_in_key_order() {
        let temp = TempDir::new().unwrap();
        let posts = temp.path().join("posts");
        fs::create_dir(&posts).unwrap();
        for slug in ["zebra", "apple", "mango"] {
            let post = format!("---\ntitle: {}\ndate: 2024-03-03\nspoiler: s\n---\n\nbody\n", slug);
            fs::write(posts.join(format!("{}.md", slug)), post).unwrap();
        }

        let entries = collect_entries(&PostList::new(&posts)).unwrap();
        let slugs: Vec<&str> = entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, ["apple", "mango", "zebra"]);
        assert_eq!(generate_list(entries, "u"), "- [apple](u/posts/apple)\n- [mango](u/posts/mango)\n- [zebra](u/posts/zebra)");
    }

    #[test]
    fn test_compile_readme_missing_file() {
        let temp = TempDir::new().unwrap();
        let list = PostList::new(temp.path());
        let res = compile_readme(&list, &temp.path().join("README.md"), &ReadmeOptions::default(), true);
        assert!(matches!(res, Err(Error::NotFound(_))));
    }
}
