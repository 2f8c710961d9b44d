use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Occurs when `uth.toml` fails to load.
    #[error("failed to load uth.toml: {0}")]
    LoadError(String),
    /// Occurs when a configuration value has an unexpected shape.
    #[error("invalid value for \"{key}\": {reason}")]
    ValueError { key: String, reason: String },
    /// Occurs when a verbosity string names neither a preset nor a flag.
    #[error("unknown verbosity \"{0}\"")]
    UnknownVerbosity(String),
    /// Occurs when a group is ended while no group is open.
    #[error("group end requested but no group is open")]
    NoOpenGroup,
    /// Occurs when the run log file cannot be created.
    #[error("failed to open log file {path:?}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
