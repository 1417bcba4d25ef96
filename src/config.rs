use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::readme::ReadmeOptions;
use crate::schema::SchemaOptions;

const EXE_DIR_VAR: &str = "${exe_dir}";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Paths {
    pub posts_dir: PathBuf,
    pub readme: Option<PathBuf>,
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            posts_dir: PathBuf::from("posts"),
            readme: Some(PathBuf::from("README.md")),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: LogLevel::Warn,
            log_to_console: true,
            location: None,
        }
    }
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub schema: SchemaOptions,
    pub readme: ReadmeOptions,
    pub log: Log,
}

impl Config {
    /// Parses `content`, resolving relative paths against `base_dir`.
    pub fn parse(content: &str, base_dir: &Path) -> Result<Config> {
        let mut cfg = toml::from_str::<Config>(content)
            .map_err(|e| Error::config(format!("Error parsing configuration file: {}", e)))?;

        cfg.paths.posts_dir = parse_path(&cfg.paths.posts_dir, base_dir)?;
        cfg.paths.readme = match cfg.paths.readme {
            Some(ref readme) => Some(parse_path(readme, base_dir)?),
            None => None,
        };
        cfg.log.location = match cfg.log.location {
            Some(ref location) => Some(parse_path(location, base_dir)?),
            None => None,
        };

        Ok(cfg)
    }
}

fn parse_path(path: &Path, base_dir: &Path) -> Result<PathBuf> {
    if let Ok(rest) = path.strip_prefix(EXE_DIR_VAR) {
        let cur_exe = env::current_exe()?;
        let exe_dir = cur_exe.parent()
            .ok_or_else(|| Error::config(format!("Cannot expand {} for {}", EXE_DIR_VAR, cur_exe.display())))?;
        return Ok(exe_dir.join(rest));
    }

    if path.is_relative() {
        Ok(base_dir.join(path))
    } else {
        Ok(path.to_path_buf())
    }
}

pub fn read_config(cfg_path: &Path) -> Result<Config> {
    let cfg_content = fs::read_to_string(cfg_path)
        .map_err(|e| Error::config(format!("Error opening configuration file {}: {}", cfg_path.display(), e)))?;

    let base_dir = cfg_path.parent().unwrap_or_else(|| Path::new("."));
    Config::parse(&cfg_content, base_dir)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_full_config() {
        let toml_str = r##"
[paths]
posts_dir = "src/pages/posts"
readme = "/abs/README.md"

[schema]
related_enabled = true
max_related = 2

[readme]
site_url = "https://example.com"

[log]
level = "Debug"
location = "logs/postcheck.log"
"##;
        let cfg = Config::parse(toml_str, Path::new("/blog")).unwrap();
        assert_eq!(cfg.paths.posts_dir, PathBuf::from("/blog/src/pages/posts"));
        assert_eq!(cfg.paths.readme, Some(PathBuf::from("/abs/README.md")));
        assert_eq!(cfg.schema, SchemaOptions { related_enabled: true, max_related: Some(2), allow_unknown: false });
        assert_eq!(cfg.readme.site_url, "https://example.com");
        assert_eq!(cfg.readme.start_marker, "<!--START_POSTS-->");
        assert_eq!(cfg.log.level, LogLevel::Debug);
        assert!(cfg.log.log_to_console);
        assert_eq!(cfg.log.location, Some(PathBuf::from("/blog/logs/postcheck.log")));
    }

    #[test]
    fn test_empty_config_is_default() {
        let cfg = Config::parse("", Path::new("/blog")).unwrap();
        assert_eq!(cfg.paths.posts_dir, PathBuf::from("/blog/posts"));
        assert_eq!(cfg.paths.readme, Some(PathBuf::from("/blog/README.md")));
        assert_eq!(cfg.schema, SchemaOptions::default());
        assert_eq!(cfg.log, Log::default());
    }

    #[test]
    fn test_exe_dir() {
        let cfg = Config::parse("[paths]\nposts_dir = \"${exe_dir}/posts\"\n", Path::new("/blog")).unwrap();
        let exe_dir = env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(cfg.paths.posts_dir, exe_dir.join("posts"));
    }

    #[test]
    fn test_bad_config() {
        let res = Config::parse("[schema]\nmax_related = \"two\"\n", Path::new("."));
        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[test]
    fn test_read_config() {
        let temp = TempDir::new().unwrap();
        let cfg_path = temp.path().join("postcheck.toml");
        fs::write(&cfg_path, "[paths]\nposts_dir = \"content\"\n").unwrap();

        let cfg = read_config(&cfg_path).unwrap();
        assert_eq!(cfg.paths.posts_dir, temp.path().join("content"));

        let res = read_config(&temp.path().join("missing.toml"));
        assert!(matches!(res, Err(Error::Config(_))));
    }
}
