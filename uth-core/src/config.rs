//! # Configuration Module
//!
//! Handles loading the run options of uth from a `uth.toml` file and from
//! `UTH_*` environment variables.
//!
//! ## Configuration Loading Flow (block diagram)
//!
//! ```text
//! +-------------------+     +-------------------+     +-------------------+
//! | UTH_CONFIG env    | --> | Path resolution   | --> | uth.toml file     |
//! | (optional)        |     | or default ./     |     | (optional)        |
//! +-------------------+     +-------------------+     +-------------------+
//!                                                              |
//!                                                              v
//! +-------------------+     +-------------------+     +-------------------+
//! | UTH_<KEY>=value   | --> | Overrides         | --> | Config            |
//! | (and .env file)   |     |                   |     | get_config()      |
//! +-------------------+     +-------------------+     +-------------------+
//! ```
//!
//! ## Config File Location
//!
//! 1. If `UTH_CONFIG` environment variable is set, load from that path
//! 2. Otherwise, load from `uth.toml` in the current directory, falling back
//!    to the defaults when the file does not exist
//!
//! **Note:** `UTH_CONFIG` is reserved for the config file path. A value that
//! does not look like a path (e.g. `UTH_CONFIG=true`) is rejected.
//!
//! ## Keys
//!
//! ```toml
//! verbosity = "default"        # none | light | default | max, or "successes | group_end"
//! console_log = true
//! file_log = false
//! log_dir = "Logs"
//! exit_on_failure = false
//! seed = 1700000000            # optional, seed of the runner's random values
//! ```
//!
//! Each key can be overridden with the upper-cased `UTH_<KEY>` variable,
//! e.g. `UTH_VERBOSITY=light` or `UTH_FILE_LOG=true`.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::{
    io::Read,
    path::{Path, PathBuf},
};
use tracing::*;

use crate::{Error, Result, Verbosity};

/// Environment variable name for specifying the config file path.
const UTH_CONFIG_ENV: &str = "UTH_CONFIG";

const DEFAULT_LOG_DIR: &str = "Logs";

static CONFIG: Lazy<Config> = Lazy::new(|| {
    let _ = dotenv::dotenv();
    Config::load().unwrap_or_else(|e| {
        error!("{e}");
        Config::default()
    })
});

/// Get the process-wide configuration, loaded on first access.
pub fn get_config() -> &'static Config {
    &CONFIG
}

/// uth's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub verbosity: Verbosity,
    /// Echo reports to the terminal.
    pub console_log: bool,
    /// Append reports to a log file created in `log_dir`.
    pub file_log: bool,
    pub log_dir: PathBuf,
    /// Terminate the process on the first failing check.
    pub exit_on_failure: bool,
    /// Seed of the runner's random values. Picked from the clock when unset.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            verbosity: Verbosity::DEFAULT,
            console_log: true,
            file_log: false,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            exit_on_failure: false,
            seed: None,
        }
    }
}

impl Config {
    /// Load uth configuration from path. A missing file yields the defaults.
    fn load_from(path: &Path) -> Result<Config> {
        let mut file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{path:?} not found, using default configuration");
                let mut cfg = Config::default();
                cfg.load_env()?;
                return Ok(cfg);
            }
            Err(e) => return Err(Error::LoadError(format!("failed to open {path:?}: {e}"))),
        };

        let mut buf = String::new();
        file.read_to_string(&mut buf)
            .map_err(|e| Error::LoadError(e.to_string()))?;

        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigHelper {
            verbosity: Option<String>,
            console_log: Option<bool>,
            file_log: Option<bool>,
            log_dir: Option<PathBuf>,
            exit_on_failure: Option<bool>,
            seed: Option<u64>,
        }

        let helper: ConfigHelper = toml::from_str(&buf).map_err(|e| {
            Error::LoadError(format!("failed to deserialize uth.toml into uth::Config: {e}"))
        })?;

        let defaults = Config::default();
        let mut cfg = Config {
            verbosity: match helper.verbosity {
                Some(s) => s.parse()?,
                None => defaults.verbosity,
            },
            console_log: helper.console_log.unwrap_or(defaults.console_log),
            file_log: helper.file_log.unwrap_or(defaults.file_log),
            log_dir: helper.log_dir.unwrap_or(defaults.log_dir),
            exit_on_failure: helper.exit_on_failure.unwrap_or(defaults.exit_on_failure),
            seed: helper.seed.or(defaults.seed),
        };

        debug!("uth.toml was successfully loaded: {cfg:#?}");

        cfg.load_env()?;

        Ok(cfg)
    }

    /// Load uth configuration.
    ///
    /// Loading order:
    /// 1. If `UTH_CONFIG` env var is set, load from that path
    /// 2. Otherwise, load from `uth.toml` in the current directory
    pub fn load() -> Result<Config> {
        match std::env::var(UTH_CONFIG_ENV) {
            Ok(path) => {
                let path = Path::new(&path);

                if !looks_like_path(path) {
                    return Err(Error::LoadError(format!(
                        "{UTH_CONFIG_ENV} should be a path to a config file, not a config value. \
                         Got: {path:?}. Use UTH_<KEY>=value for config values instead."
                    )));
                }

                if !path.exists() {
                    return Err(Error::LoadError(format!(
                        "Config file specified by {UTH_CONFIG_ENV} not found: {path:?}"
                    )));
                }

                debug!("Loading config from {UTH_CONFIG_ENV}={path:?}");
                Config::load_from(path)
            }
            Err(_) => Config::load_from(Path::new("uth.toml")),
        }
    }

    /// Apply `UTH_<KEY>` environment overrides.
    fn load_env(&mut self) -> Result<()> {
        if let Some(v) = env_var("VERBOSITY") {
            self.verbosity = v.parse()?;
        }
        if let Some(v) = env_var("CONSOLE_LOG") {
            self.console_log = parse_bool("console_log", &v)?;
        }
        if let Some(v) = env_var("FILE_LOG") {
            self.file_log = parse_bool("file_log", &v)?;
        }
        if let Some(v) = env_var("LOG_DIR") {
            self.log_dir = PathBuf::from(v);
        }
        if let Some(v) = env_var("EXIT_ON_FAILURE") {
            self.exit_on_failure = parse_bool("exit_on_failure", &v)?;
        }
        if let Some(v) = env_var("SEED") {
            self.seed = Some(v.trim().parse().map_err(|e| Error::ValueError {
                key: "seed".to_string(),
                reason: format!("expected an unsigned integer, got {v:?}: {e}"),
            })?);
        }

        debug!("uth configuration loaded from env: {self:#?}");
        Ok(())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(format!("UTH_{key}")).ok()
}

fn looks_like_path(path: &Path) -> bool {
    let s = path.to_string_lossy();
    path.extension().is_some_and(|ext| ext == "toml")
        || s.contains(std::path::MAIN_SEPARATOR)
        || s.contains('/')
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::ValueError {
            key: key.to_string(),
            reason: format!("expected a boolean, got {value:?}"),
        }),
    }
}
