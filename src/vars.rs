//! The variable table available to `${NAME}` placeholders.
//!
//! Built fresh for every load from the node identity, the current user, the
//! environment name and, when a prefix is configured, the prefixed process
//! environment. Takes the environment as an iterator so tests can pass
//! synthetic data instead of `std::env::vars()`.

use std::collections::BTreeMap;

use crate::types::NodeInfo;

pub const HOSTNAME: &str = "HOSTNAME";
pub const NODENAME: &str = "NODENAME";
pub const LOCALIP: &str = "LOCALIP";
pub const USER: &str = "USER";
pub const NORMALIZED_USER: &str = "NORMALIZED_USER";
pub const ENVIRONMENT: &str = "ENVIRONMENT";
pub const ENVIRONMENT_UPPERCASE: &str = "ENVIRONMENT_UPPERCASE";
pub const CONFIG_DIR: &str = "CONFIG_DIR";

/// Variable name → value.
pub type VariableContext = BTreeMap<String, String>;

/// Build the variable table.
///
/// Base keys come first, then a prefixed copy of each base key, then every
/// `env_vars` entry whose name starts with `env_prefix`. Entries already in
/// the table are never overwritten by the environment scan.
pub fn build_variables(
    environment: &str,
    env_prefix: &str,
    node: &NodeInfo,
    user: &str,
    env_vars: impl IntoIterator<Item = (String, String)>,
) -> VariableContext {
    let mut vars = VariableContext::from([
        (HOSTNAME.to_string(), node.host_name.clone()),
        (NODENAME.to_string(), node.node_name.clone()),
        (LOCALIP.to_string(), node.local_ip.clone()),
        (USER.to_string(), user.to_string()),
        (NORMALIZED_USER.to_string(), normalize_user(user)),
        (ENVIRONMENT.to_string(), environment.to_string()),
        (
            ENVIRONMENT_UPPERCASE.to_string(),
            environment.to_uppercase(),
        ),
    ]);

    if env_prefix.is_empty() {
        return vars;
    }

    let prefixed: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (format!("{env_prefix}{k}"), v.clone()))
        .collect();
    vars.extend(prefixed);

    for (key, value) in env_vars {
        if key.starts_with(env_prefix) && !vars.contains_key(&key) {
            tracing::debug!(set = %key, "merged prefixed environment variable");
            vars.insert(key, value);
        }
    }

    vars
}

/// User name with dots removed, e.g. `jane.doe` → `janedoe`.
pub fn normalize_user(user: &str) -> String {
    user.replace('.', "")
}

/// Name of the user running the process, from the usual login variables.
pub fn current_user() -> Option<String> {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|name| !name.is_empty())
}

/// Snapshot of the process environment, skipping non-UTF-8 entries.
pub fn env_snapshot() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}
