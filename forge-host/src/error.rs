use std::path::PathBuf;

use thiserror::Error;

/// Failures at the boundary with the host application.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host file '{path}' does not exist")]
    MissingFile { path: PathBuf },

    #[error("could not locate {region} in '{path}'")]
    RegionNotFound { path: PathBuf, region: &'static str },

    #[error("'{path}' is not valid JSON")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{command}` exited with status {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },
}
