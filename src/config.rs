use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_THRESHOLD: u8 = 80;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Alert when used percentage is strictly greater than this value (0-100).
    #[serde(default = "default_threshold")]
    pub threshold: u8,

    /// SNS topic ARN that alerts are published to.
    #[serde(default)]
    pub topic: String,

    /// AWS region of the topic, e.g. "ap-southeast-2".
    #[serde(default)]
    pub region: String,

    /// What to do when one target fails to sample or notify.
    #[serde(default)]
    pub on_error: ErrorPolicy,

    /// How usage is measured.
    #[serde(default)]
    pub sampler: SamplerKind,

    /// Mount targets, evaluated in file order.
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// One monitored mount point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Target {
    pub label: String,
    pub path:  PathBuf,
}

impl Target {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { label: label.into(), path: path.into() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the whole run at the first failing target.
    #[default]
    Abort,
    /// Record the failure and move on to the next target.
    Continue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplerKind {
    /// Shell out to `df --output=pcent`.
    #[default]
    Df,
    /// Call statvfs(2) directly.
    Statvfs,
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

const TEMPLATE: &str = r#"# diskwatch configuration

# Alert when a target's used percentage is strictly greater than this (0-100).
threshold = 80

# SNS topic that receives alerts, and the region it lives in.
topic  = "arn:aws:sns:ap-southeast-2:123456789012:disk-space-alerts"
region = "ap-southeast-2"

# "abort" stops at the first failing target; "continue" reports it and moves on.
on_error = "abort"

# "df" runs `df --output=pcent`; "statvfs" asks the kernel directly.
sampler = "df"

[[targets]]
label = "ROOT DRIVE"
path  = "/"

[[targets]]
label = "MNT DATA DRIVE"
path  = "/mnt/data"
"#;

// ── Load / Validate ───────────────────────────────────────────────────

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("diskwatch").join("diskwatch.toml"))
    }

    /// Load and validate the config at `path`, or at the default location.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None    => Self::config_path().ok_or(ConfigError::NoConfigDir)?,
        };
        let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path.clone()),
            _ => ConfigError::Read { path: path.clone(), source: e },
        })?;
        Self::parse(&text, &path)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold > 100 {
            return Err(invalid(format!("threshold {} is outside 0-100", self.threshold)));
        }
        if self.topic.trim().is_empty() {
            return Err(invalid("topic is required"));
        }
        if self.region.trim().is_empty() {
            return Err(invalid("region is required"));
        }
        if self.targets.is_empty() {
            return Err(invalid("at least one [[targets]] entry is required"));
        }
        for (i, t) in self.targets.iter().enumerate() {
            if t.label.trim().is_empty() {
                return Err(invalid(format!("targets[{}] has an empty label", i)));
            }
            if t.path.as_os_str().is_empty() {
                return Err(invalid(format!("targets[{}] ({}) has an empty path", i, t.label)));
            }
        }
        Ok(())
    }

    /// Render the resolved config back to TOML, as `--print-config` shows it.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

/// Write a commented starter config. Never overwrites an existing file.
pub fn write_template(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    let write_err = |source| ConfigError::Write { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, TEMPLATE).map_err(write_err)
}
