use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use spdlog::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::front_matter::ParsedPost;
use crate::post_list::PostList;
use crate::readme::check_title;
use crate::relations::RelationIndex;
use crate::report::{CheckKind, Report};
use crate::schema::Schema;

/// Runs every check against every post. Only a missing posts directory or
/// README stops the run, anything wrong with a single post lands in the report.
pub struct Validator {
    pub post_list: PostList,
    pub schema: Schema,
    pub readme: Option<PathBuf>,
}

impl Validator {
    pub fn new(config: &Config) -> Self {
        Validator {
            post_list: PostList::new(&config.paths.posts_dir),
            schema: Schema::new(config.schema),
            readme: config.paths.readme.clone(),
        }
    }

    pub fn run(&self) -> Result<Report> {
        let mut keys = self.post_list.retrieve_keys()?;
        // Listing order is not stable across filesystems
        keys.sort();

        let readme = match self.readme {
            Some(ref path) => Some(Self::read_readme(path)?),
            None => None,
        };

        info!("Checking {} posts in {}", keys.len(), self.post_list.root_dir.display());
        let mut report = Report {
            checked: keys.clone(),
            findings: vec![],
        };

        let index = RelationIndex::new(&keys);
        for key in &keys {
            let parsed = match ParsedPost::from_file(&self.post_list.path_of(key)) {
                Ok(parsed) => parsed,
                Err(Error::Io(e)) => {
                    report.add(key, CheckKind::Read, e.to_string());
                    continue;
                }
                Err(e) => {
                    report.add(key, CheckKind::FrontMatter, e.to_string());
                    continue;
                }
            };
            self.check_post(key, &parsed, &index, readme.as_deref(), &mut report);
        }

        info!("{} of {} posts passed", keys.len() - report.failed_posts(), keys.len());
        Ok(report)
    }

    /// Schema, related posts and README presence, each reported on its own.
    pub fn check_post(&self, key: &str, parsed: &ParsedPost, index: &RelationIndex, readme: Option<&str>, report: &mut Report) {
        debug!("Checking {}", key);

        match self.schema.validate(key, parsed) {
            Ok(_) => {}
            Err(Error::Validation(violations)) => {
                for violation in violations {
                    report.add(key, CheckKind::Schema, violation.to_string());
                }
            }
            Err(e) => report.add(key, CheckKind::Schema, e.to_string()),
        }

        if self.schema.options.related_enabled {
            for violation in index.check(key, &parsed.related()) {
                report.add(key, CheckKind::Relational, violation.to_string());
            }
        }

        if let (Some(readme), Some(title)) = (readme, parsed.title()) {
            if let Err(e) = check_title(readme, title) {
                report.add(key, CheckKind::Sync, e.to_string());
            }
        }
    }

    fn read_readme(path: &Path) -> Result<String> {
        match fs::read_to_string(path) {
            Ok(readme) => Ok(readme),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::not_found(format!("README {}", path.display()))),
            Err(e) => Err(e.into()),
        }
    }
}
