use crate::error::CheckerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pod Security Standards level to check pods against.
///
/// Ordered from least to most strict. `privileged` is not accepted: it allows
/// everything, so a scan against it can never report anything.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Baseline,
    Restricted,
}

impl Level {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Restricted => "restricted",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = CheckerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baseline" => Ok(Self::Baseline),
            "restricted" => Ok(Self::Restricted),
            other => Err(CheckerError::Configuration(format!(
                "unrecognized level {:?} (expected baseline or restricted)",
                other
            ))),
        }
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per violation.
    #[default]
    Text,
    /// One JSON object per violation line.
    Json,
}

impl FromStr for OutputFormat {
    type Err = CheckerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(CheckerError::Configuration(format!(
                "unrecognized output format {:?} (expected text or json)",
                other
            ))),
        }
    }
}

/// Defaults read from a `.psa-checker.toml` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub level: Option<String>,
    pub context: Option<String>,
    pub namespace: Option<String>,
    pub format: Option<String>,
}

/// Raw selectors as given on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub level: Option<String>,
    pub context: Option<String>,
    pub namespace: Option<String>,
    pub format: Option<String>,
}

/// Validated configuration for a single run. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub level: Level,
    /// Kubeconfig context override; `None` uses the current context.
    pub context: Option<String>,
    /// Namespace to scan; `None` scans every namespace.
    pub namespace: Option<String>,
    pub format: OutputFormat,
}
