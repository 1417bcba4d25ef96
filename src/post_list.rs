use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use spdlog::{debug, warn};

use crate::error::{Error, Result};

pub const POST_EXTENSION: &str = ".md";
pub const INDEX_FILE: &str = "index.md";

/// Finds the posts living in `root_dir`, either as `slug.md` files or as
/// `slug/index.md` directories.
pub struct PostList {
    pub root_dir: PathBuf,
    pub index_file: String,
}

impl PostList {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        PostList {
            root_dir: root_dir.into(),
            index_file: INDEX_FILE.to_string(),
        }
    }

    /// Keys of every post, relative to `root_dir` and `/` separated.
    /// Order is whatever the directory listing returns.
    pub fn retrieve_keys(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::not_found(format!("posts directory {}", self.root_dir.display())));
            }
            Err(e) => return Err(e.into()),
        };

        let mut keys = vec![];
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                warn!("Skipping non UTF-8 entry {}", entry.path().display());
                continue;
            };

            // Follows symlinks, a linked post counts like a regular one
            let path = entry.path();
            if path.is_file() {
                if file_name.ends_with(POST_EXTENSION) {
                    keys.push(file_name.to_string());
                }
            } else if path.is_dir() && Self::contains_file(&path, &self.index_file) {
                keys.push(format!("{}/{}", file_name, self.index_file));
            }
        }

        debug!("Found {} posts in {}", keys.len(), self.root_dir.display());
        Ok(keys)
    }

    pub fn path_of(&self, key: &str) -> PathBuf {
        key.split('/').fold(self.root_dir.clone(), |path, part| path.join(part))
    }

    fn contains_file(dir: &Path, base_name: &str) -> bool {
        dir.join(base_name).is_file()
    }
}

/// Slug of a post key: the file stem for `slug.md`, the directory for
/// `slug/index.md`.
pub fn slug_of(key: &str) -> &str {
    match key.split_once('/') {
        Some((dir, _)) => dir,
        None => key.strip_suffix(POST_EXTENSION).unwrap_or(key),
    }
}
