//! `tl.toml` loading.
//!
//! Every table and key is optional. Values from the file fill in whatever
//! the command line leaves unset.

use serde::Deserialize;
use std::path::Path;
use tl_core::ParseOptions;

/// Looked up in the current directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG: &str = "tl.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub parse: ParseOptions,
    pub check: CheckConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CheckConfig {
    /// Analyses run by `tl check` when `--analysis` is absent.
    pub analyses: Option<Vec<String>>,
}

/// Load the explicit config file, or `tl.toml` if one exists, or defaults.
///
/// An explicit path that cannot be read is an error; a missing default
/// file is not.
pub(crate) fn load(explicit: Option<&Path>) -> Result<Config, String> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG);
            if path.is_file() {
                read_config(path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

pub(crate) fn read_config(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read config '{}': {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("invalid config '{}': {}", path.display(), e))
}
