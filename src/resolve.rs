//! Pure resolution: turns pre-loaded layer contents into a populated target.
//! No I/O happens here.
//!
//! Steps:
//!
//! 1. Parse each layer into a document tree (format chosen by extension)
//! 2. Deep-merge layers on top of the defaults tree (later overrides earlier)
//! 3. Deserialize the merged tree into the target, strictly if requested

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::error::HostfigError;
use crate::format;
use crate::merge::merge_documents;
use crate::validate;

/// All pre-loaded data needed to resolve a config.
pub struct ResolveInput {
    /// Lowest-priority tree, usually the caller's pre-populated target.
    pub defaults: Value,
    /// Layer contents in precedence order: first = lowest priority, last = highest.
    pub layers: Vec<(PathBuf, String)>,
    /// Whether to reject keys the target does not know.
    pub strict: bool,
}

impl Default for ResolveInput {
    fn default() -> Self {
        Self {
            defaults: Value::Mapping(Mapping::new()),
            layers: Vec::new(),
            strict: false,
        }
    }
}

/// Resolve configuration from pre-loaded inputs.
pub fn resolve<T: DeserializeOwned>(input: ResolveInput) -> Result<T, HostfigError> {
    let mut docs: Vec<(PathBuf, Value)> = Vec::with_capacity(input.layers.len());
    for (path, content) in input.layers {
        let doc = format::parse_document(&path, &content)?;
        docs.push((path, doc));
    }

    let merged = docs
        .iter()
        .fold(input.defaults, |merged, (_, doc)| {
            merge_documents(merged, doc.clone())
        });

    if input.strict {
        return validate::deserialize_strict(merged, &docs);
    }

    serde_yaml::from_value(merged).map_err(|e| HostfigError::ConfigParse {
        path: docs
            .last()
            .map(|(path, _)| path.clone())
            .unwrap_or_else(|| validate::defaults_path().to_path_buf()),
        reason: e.to_string(),
    })
}
