use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain a usage percentage for one path.
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("could not parse usage percentage from output {output:?}")]
    Unparsable { output: String },

    #[error("usage percentage {value} is out of range (0-100)")]
    OutOfRange { value: u64 },

    #[error("statvfs({path}) failed: {source}")]
    Statvfs {
        path: PathBuf,
        #[source]
        source: nix::Error,
    },
}

/// Failure to hand an alert to the notification service.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("failed to encode notification payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("publish to {topic} failed: {reason}")]
    Publish { topic: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0} (run with --init-config to create one)")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("refusing to overwrite existing config at {0}")]
    AlreadyExists(PathBuf),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no config directory available on this platform")]
    NoConfigDir,
}

/// A per-target failure as seen by the driver.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("sampling {label} failed: {source}")]
    Sampling {
        label: String,
        #[source]
        source: SamplingError,
    },

    #[error("notifying for {label} failed: {source}")]
    Notification {
        label: String,
        #[source]
        source: NotificationError,
    },
}

impl RunError {
    pub fn label(&self) -> &str {
        match self {
            RunError::Sampling { label, .. } | RunError::Notification { label, .. } => label,
        }
    }
}
