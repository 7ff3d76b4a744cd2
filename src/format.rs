//! Document formats and the file-level serialization helpers.
//!
//! The format is chosen by file extension: `.json` is JSON, `.toml` is TOML,
//! anything else is YAML. Layers of different formats can be mixed; each is
//! parsed into a `serde_yaml::Value` tree before merging.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::error::HostfigError;
use crate::expand::Expander;
use crate::scheme::SecretProvider;
use crate::vars::VariableContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Yaml,
    Json,
    Toml,
}

impl DocFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocFormat::Toml,
            _ => DocFormat::Yaml,
        }
    }
}

/// Parse one layer into a document tree. Documents without data (blank,
/// comments only, a bare `---`) are empty mappings.
pub fn parse_document(path: &Path, content: &str) -> Result<Value, HostfigError> {
    if content.trim().is_empty() {
        return Ok(Value::Mapping(Mapping::new()));
    }

    let parsed = match DocFormat::from_path(path) {
        DocFormat::Json => serde_json::from_str::<Value>(content).map_err(|e| e.to_string()),
        DocFormat::Toml => toml::from_str::<Value>(content).map_err(|e| e.to_string()),
        DocFormat::Yaml => serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string()),
    };

    match parsed {
        Ok(Value::Null) => Ok(Value::Mapping(Mapping::new())),
        Ok(doc) => Ok(doc),
        Err(reason) => Err(HostfigError::ConfigParse {
            path: path.to_path_buf(),
            reason,
        }),
    }
}

/// Read a JSON, TOML or YAML file into `T`.
pub fn unmarshal<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, HostfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| HostfigError::io(path, e))?;

    let parsed = match DocFormat::from_path(path) {
        DocFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
        DocFormat::Toml => toml::from_str(&content).map_err(|e| e.to_string()),
        DocFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
    };

    parsed.map_err(|reason| HostfigError::ConfigParse {
        path: path.to_path_buf(),
        reason,
    })
}

/// Write `value` to a JSON (two-space indented), TOML or YAML file.
/// Creates parent directories if needed.
pub fn marshal<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), HostfigError> {
    let path = path.as_ref();

    let encoded = match DocFormat::from_path(path) {
        DocFormat::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        DocFormat::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
        DocFormat::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
    }
    .map_err(|reason| HostfigError::Serialize { reason })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| HostfigError::io(parent, e))?;
    }

    std::fs::write(path, encoded).map_err(|e| HostfigError::io(path, e))
}

/// [`unmarshal`] followed by expansion with an empty variable table.
///
/// Scheme prefixes and `${NAME}` placeholders resolve against the process
/// environment and `secrets`.
pub fn unmarshal_and_expand<T>(
    path: impl AsRef<Path>,
    secrets: Option<Arc<dyn SecretProvider>>,
) -> Result<T, HostfigError>
where
    T: Serialize + DeserializeOwned,
{
    let mut value: T = unmarshal(path)?;
    Expander::new(VariableContext::new(), secrets).expand_all(&mut value)?;
    Ok(value)
}
