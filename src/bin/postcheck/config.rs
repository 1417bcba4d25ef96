use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use spdlog::debug;

use postcheck::config::{read_config, Config};

use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    let cur_dir = env::current_dir().ok();
    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()));
    let cfg_dir = dirs::config_dir().map(|dir| dir.join("postcheck"));

    [cur_dir, exe_dir, cfg_dir].into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

/// Configuration from `cfg_path`, from the first config file found, or the
/// defaults relative to the current dir.
pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    let config_path = match cfg_path {
        Some(path) if !path.exists() => return Err(anyhow!("Config file {} does not exist", path.display())),
        Some(path) => Some(path),
        None => get_config_path(),
    };

    match config_path {
        Some(path) => {
            debug!("Reading config from {}", path.display());
            Ok(read_config(&path)?)
        }
        None => {
            debug!("No {} found, using defaults", CFG_FILE_NAME);
            Ok(Config::default())
        }
    }
}
