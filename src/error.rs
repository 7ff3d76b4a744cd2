use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::scheme::SecretError;

#[derive(Debug, Error)]
pub enum HostfigError {
    #[error("Config file name is required")]
    ConfigFileRequired,

    #[error("File '{name}' not found in [{}]", join_paths(.searched))]
    FileNotFound { name: String, searched: Vec<PathBuf> },

    #[error("Failed to parse hostmap {path}: {source}")]
    HostmapParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read file source {path}: {source}")]
    FileSource {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Environment variable not set: {name}")]
    EnvVarNotSet { name: String },

    #[error("Secret provider not configured, unable to expand: {value}")]
    SecretProviderMissing { value: String },

    #[error("Unable to load secret '{name}': {source}")]
    SecretResolution { name: String, source: SecretError },

    #[error("Unable to resolve variables: {value}")]
    UnresolvedVariable { value: String },

    #[error("Unknown key '{key}' in {path}")]
    UnknownKey { key: String, path: PathBuf },

    #[error("Unknown keys in configuration")]
    UnknownKeys(Vec<HostfigError>),

    #[error("Failed to convert configuration: {reason}")]
    Serialize { reason: String },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl HostfigError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        HostfigError::IoError {
            path: path.to_path_buf(),
            source,
        }
    }
}
