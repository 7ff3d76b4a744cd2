//! Strict-mode validation: detect unknown keys in config files.
//!
//! Uses `serde_ignored` while deserializing the merged tree into the target,
//! capturing every key the target doesn't consume. Each unknown key is
//! reported against the last layer that defines it, since that is the layer
//! whose value would have been used.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::error::HostfigError;

/// Deserialize `merged` into `T`, rejecting keys `T` does not know.
///
/// `layers` are the parsed documents that were merged to produce `merged`, in
/// precedence order; they are only used to attribute unknown keys to a file.
pub fn deserialize_strict<T: DeserializeOwned>(
    merged: Value,
    layers: &[(PathBuf, Value)],
) -> Result<T, HostfigError> {
    let mut unknown_keys: Vec<String> = Vec::new();

    let value: T = serde_ignored::deserialize(merged, |ignored_path| {
        unknown_keys.push(ignored_path.to_string());
    })
    .map_err(|e| HostfigError::ConfigParse {
        path: last_layer(layers),
        reason: e.to_string(),
    })?;

    if unknown_keys.is_empty() {
        return Ok(value);
    }

    let errors: Vec<HostfigError> = unknown_keys
        .into_iter()
        .map(|key| {
            let path = layers
                .iter()
                .rev()
                .find(|(_, doc)| contains_key(doc, &key))
                .map(|(path, _)| path.clone())
                .unwrap_or_else(|| last_layer(layers));
            HostfigError::UnknownKey { key, path }
        })
        .collect();

    Err(HostfigError::UnknownKeys(errors))
}

fn last_layer(layers: &[(PathBuf, Value)]) -> PathBuf {
    layers
        .last()
        .map(|(path, _)| path.clone())
        .unwrap_or_else(|| defaults_path().to_path_buf())
}

/// Whether `doc` has a value at the dotted path `key`.
///
/// Numeric segments index into sequences.
fn contains_key(doc: &Value, key: &str) -> bool {
    find_key(doc, key).is_some()
}

fn find_key<'a>(doc: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(doc, |node, segment| match node {
        Value::Mapping(map) => map.get(segment),
        Value::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Tagged(tagged) => find_key(&tagged.value, segment),
        _ => None,
    })
}

/// Path used in errors when the failing document is not a file.
pub(crate) fn defaults_path() -> &'static Path {
    Path::new("<defaults>")
}
