use serde::{Deserialize, Serialize};
use std::{fs::File, io, path::PathBuf};

use cph_core::Config;

use crate::{cmd::GlobalArgs, util};

pub const APP_NAME: &str = "cph";

/// Per-user settings, used where the repository's `cph.toml` says nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
}

impl GlobalConfig {
    pub const FILENAME: &str = "cph-cli.toml";

    pub fn filepath() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(Self::FILENAME))
    }

    pub fn from_file_or_default() -> Self {
        let Some(path) = Self::filepath() else {
            return GlobalConfig::default();
        };
        let toml_str = match File::open(&path).and_then(io::read_to_string) {
            Ok(toml) => toml,
            _ => return GlobalConfig::default(),
        };
        toml::from_str(&toml_str).unwrap_or_else(|e| {
            log::error!(
                "Invalid config '{:?}': {:#}",
                util::replace_homedir_to_tilde(path),
                e
            );
            std::process::exit(1)
        })
    }
}

/// Repository config (or the defaults), with user-level settings applied.
///
/// `--api-url` beats `cph.toml`, which beats the user config.
pub fn load_config(args: &GlobalArgs) -> anyhow::Result<Config> {
    let mut cfg = Config::load_or_default(util::current_dir())?;
    let user_cfg = GlobalConfig::from_file_or_default();

    let url = match (&args.api_url, &cfg.source_config_file, user_cfg.api_base_url) {
        (Some(url), _, _) => Some(url.clone()),
        (None, None, Some(url)) => Some(url),
        _ => None,
    };
    if let Some(url) = url {
        cfg.execution.api_base_url = url;
    }
    Ok(cfg)
}
