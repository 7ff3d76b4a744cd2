//! Host-specific override selection through a `.hostmap` sidecar.
//!
//! Next to `app.yaml` an optional `app.yaml.hostmap` document maps host names
//! to override files:
//!
//! ```yaml
//! override:
//!   web1: override/web1.yaml
//!   UNIT_TEST: /etc/app/unit.yaml
//! ```
//!
//! Relative override paths are resolved against the base config's directory.
//! A missing sidecar is not an error; a malformed one always is. Only the
//! base file's sidecar is consulted, never the sidecar of an override.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::HostfigError;
use crate::file;
use crate::types;

/// Suffix appended to the base config path to find the sidecar.
pub const HOSTMAP_SUFFIX: &str = ".hostmap";

/// Parsed `.hostmap` sidecar.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Hostmap {
    /// Host name → override file location.
    pub r#override: HashMap<String, String>,
}

/// Path of the sidecar for `config_file`, e.g. `app.yaml` → `app.yaml.hostmap`.
pub fn hostmap_path(config_file: &Path) -> PathBuf {
    let mut path = config_file.as_os_str().to_owned();
    path.push(HOSTMAP_SUFFIX);
    PathBuf::from(path)
}

/// Read and parse the sidecar of `config_file`, if there is one.
pub fn load_hostmap(config_file: &Path) -> Result<Option<Hostmap>, HostfigError> {
    let path = hostmap_path(config_file);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(HostfigError::io(&path, e)),
    };

    if content.trim().is_empty() {
        return Ok(Some(Hostmap::default()));
    }

    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|source| HostfigError::HostmapParse { path, source })
}

/// Pick the host name used for the hostmap lookup.
///
/// Priority: the explicit override, then `<prefix>HOSTNAME` (only when a
/// prefix is configured), then the OS host name. An OS lookup failure is
/// logged and yields `None`.
pub fn effective_hostname(
    explicit: Option<&str>,
    env_prefix: &str,
    env_lookup: impl Fn(&str) -> Option<String>,
    os_hostname: impl FnOnce() -> std::io::Result<String>,
) -> Option<String> {
    if let Some(name) = explicit.filter(|n| !n.is_empty()) {
        return Some(name.to_string());
    }

    if !env_prefix.is_empty()
        && let Some(name) = env_lookup(&format!("{env_prefix}HOSTNAME")).filter(|n| !n.is_empty())
    {
        return Some(name);
    }

    match os_hostname() {
        Ok(name) if !name.is_empty() => Some(name),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(reason = "hostname", err = %err, "unable to read host name");
            None
        }
    }
}

/// Resolve the host-specific override for `config_file`, if one applies.
pub fn resolve_host_override(
    config_file: &Path,
    base_dir: &Path,
    hostname: Option<&str>,
    env_prefix: &str,
) -> Result<Option<PathBuf>, HostfigError> {
    let Some(hostmap) = load_hostmap(config_file)? else {
        return Ok(None);
    };

    let host = effective_hostname(
        hostname,
        env_prefix,
        |key| std::env::var(key).ok(),
        types::os_hostname,
    );

    select_override(&hostmap, host.as_deref(), base_dir)
}

/// Look `host` up in `hostmap` and resolve the mapped file against `base_dir`.
pub fn select_override(
    hostmap: &Hostmap,
    host: Option<&str>,
    base_dir: &Path,
) -> Result<Option<PathBuf>, HostfigError> {
    let Some(host) = host.filter(|h| !h.is_empty()) else {
        return Ok(None);
    };
    let Some(target) = hostmap.r#override.get(host).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let resolved = file::resolve_config_file(target, &[base_dir.to_path_buf()])?;
    tracing::trace!(hostname = host, override_file = %resolved.path.display(), "applying host override");
    Ok(Some(resolved.path))
}
