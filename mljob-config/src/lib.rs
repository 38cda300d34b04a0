use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The default name of the config file.
pub const CONFIG_FILENAME: &str = "mljob.toml";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("couldn't load config file at '{}': {}", .0.display(), .1)]
    MissingConfig(PathBuf, std::io::Error),
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
}

/// Defaults for assembling training jobs.
///
/// Everything here can be overridden on the command line; the config file
/// just saves retyping the values that rarely change between submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// The ID of the project to submit jobs under.
    #[serde(default)]
    pub project_id: Option<String>,
    /// The compute region to run training jobs in.
    #[serde(default)]
    pub region: Option<String>,
    /// The service runtime version to train with.
    #[serde(default)]
    pub runtime_version: Option<String>,
    /// The language runtime version to train with.
    #[serde(default)]
    pub python_version: Option<String>,
    /// Seconds to wait between job status checks.
    #[serde(default = "default_wait_interval")]
    pub wait_interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: None,
            region: None,
            runtime_version: None,
            python_version: None,
            wait_interval: default_wait_interval(),
        }
    }
}

impl Config {
    /// Load the config file from disk given an absolute or relative path.
    fn load_inner(path: impl AsRef<Path>) -> Result<Self, Error> {
        let full_path = std::path::absolute(path).map_err(Error::IO)?;
        let contents = std::fs::read_to_string(&full_path)
            .map_err(|err| Error::MissingConfig(full_path, err))?;
        toml::from_str(&contents).map_err(Error::Parse)
    }

    /// Compute the path of the config file with an optional override for its
    /// location.
    fn get_path(maybe_override: Option<&PathBuf>) -> Result<PathBuf, Error> {
        if let Some(ref relpath) = maybe_override {
            std::path::absolute(relpath).map_err(Error::IO)
        } else {
            std::env::current_dir()
                .map_err(Error::IO)
                .map(|p| p.join(CONFIG_FILENAME))
        }
    }

    /// Load the config file from disk from either the default location or a
    /// user-supplied override location.
    pub fn load(path_override: Option<&PathBuf>) -> Result<Self, Error> {
        let path = Self::get_path(path_override)?;
        Self::load_inner(path)
    }

    /// Load the config file if it exists, falling back to defaults when the
    /// default-location file is absent.
    ///
    /// A config file is optional for the CLI: every value it carries can also
    /// be supplied as a flag. An explicitly overridden path is still required
    /// to exist.
    pub fn load_or_default(path_override: Option<&PathBuf>) -> Result<Self, Error> {
        match Self::load(path_override) {
            Err(Error::MissingConfig(_, _)) if path_override.is_none() => Ok(Self::default()),
            other => other,
        }
    }
}

fn default_wait_interval() -> u64 {
    30
}
