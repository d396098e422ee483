use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures of the external programs (`gh`, `git`) and of reading the
/// projects root.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to run `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("unexpected output from `{program}`")]
    Output {
        program: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read projects root {path}")]
    ProjectsRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
