//! Scheme-prefixed value sources: `file://`, `env://` and `secret://`.
//!
//! A string leaf that starts with one of these prefixes is replaced wholesale
//! by the content it points at. Unlike `${NAME}` placeholders, every scheme
//! fails loudly: an unreadable file, an unset variable or a missing secret is
//! an error, never an empty string.

use std::path::PathBuf;

use crate::error::HostfigError;

/// Read the value from the named file.
pub const FILE_SOURCE: &str = "file://";
/// Read the value from the named environment variable.
pub const ENV_SOURCE: &str = "env://";
/// Ask the [`SecretProvider`] for the named secret.
pub const SECRET_SOURCE: &str = "secret://";

/// Error type returned by secret providers.
pub type SecretError = Box<dyn std::error::Error + Send + Sync>;

/// Resolves secret names to their values.
///
/// The name is everything after `secret://`. Segments after the first `/`
/// are provider-specific.
pub trait SecretProvider: Send + Sync {
    fn get_secret(&self, name: &str) -> Result<String, SecretError>;
}

impl<F> SecretProvider for F
where
    F: Fn(&str) -> Result<String, SecretError> + Send + Sync,
{
    fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        self(name)
    }
}

/// Resolve a leading scheme prefix on `value`.
///
/// Values without a recognized prefix are returned unchanged.
pub fn resolve_value(
    value: &str,
    secrets: Option<&dyn SecretProvider>,
) -> Result<String, HostfigError> {
    if let Some(path) = value.strip_prefix(FILE_SOURCE) {
        return std::fs::read_to_string(path).map_err(|source| HostfigError::FileSource {
            path: PathBuf::from(path),
            source,
        });
    }

    if let Some(name) = value.strip_prefix(ENV_SOURCE) {
        return match std::env::var(name) {
            Ok(v) if !v.is_empty() => Ok(v),
            _ => Err(HostfigError::EnvVarNotSet {
                name: name.to_string(),
            }),
        };
    }

    if let Some(name) = value.strip_prefix(SECRET_SOURCE) {
        let provider = secrets.ok_or_else(|| HostfigError::SecretProviderMissing {
            value: value.to_string(),
        })?;
        return provider
            .get_secret(name)
            .map_err(|source| HostfigError::SecretResolution {
                name: name.to_string(),
                source,
            });
    }

    Ok(value.to_string())
}
