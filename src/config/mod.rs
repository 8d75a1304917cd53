//! Configuration Resolver.
//!
//! Turns the raw level, context, namespace and format selectors into a
//! validated [`RunConfig`]. Values come from, in order of precedence, the
//! command line (or its environment variables), an optional TOML config file,
//! and built-in defaults. Resolution never touches the cluster.

pub mod types;

pub use types::{FileConfig, Level, OutputFormat, RawInputs, RunConfig};

use crate::error::{CheckerError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".psa-checker.toml";

/// Get the global config file path (~/.psa-checker.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Load the config file.
///
/// An explicit path must exist and parse. Without one, the global file is
/// used when present and defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return read_config_file(path);
    }

    match global_config_path() {
        Some(global) if global.exists() => read_config_file(&global),
        _ => Ok(FileConfig::default()),
    }
}

/// Parse config file contents.
pub fn parse_config(content: &str) -> Result<FileConfig> {
    toml::from_str(content).map_err(|e| CheckerError::Configuration(e.to_string()))
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        CheckerError::Configuration(format!("cannot read {}: {}", path.display(), e))
    })?;
    log::debug!("Loaded config file {}", path.display());
    parse_config(&content)
}

/// Empty strings mean "use the default".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl RunConfig {
    /// Validate raw selectors against the config file defaults.
    pub fn resolve(inputs: RawInputs, file: FileConfig) -> Result<Self> {
        let level = match inputs.level.or(file.level) {
            Some(level) => level.parse()?,
            None => Level::default(),
        };

        let format = match inputs.format.or(file.format) {
            Some(format) => format.parse()?,
            None => OutputFormat::default(),
        };

        Ok(Self {
            level,
            context: non_empty(inputs.context.or(file.context)),
            namespace: non_empty(inputs.namespace.or(file.namespace)),
            format,
        })
    }
}
