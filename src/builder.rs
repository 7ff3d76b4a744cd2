use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::error::HostfigError;
use crate::expand::{self, Expander};
use crate::file::{self, ResolvedFile};
use crate::hostmap;
use crate::resolve::{self, ResolveInput};
use crate::scheme::SecretProvider;
use crate::types::{Loaded, NodeInfo, SearchPath};
use crate::vars::{self, VariableContext};

/// Top-level key bound to the factory's environment name.
const ENVIRONMENT_FIELD: &str = "environment";

/// Loads layered, host-aware configuration into caller-supplied targets.
///
/// Immutable once built; a single factory can serve any number of loads,
/// including concurrent ones.
pub struct Factory {
    search_dirs: Vec<PathBuf>,
    env_prefix: String,
    environment: Option<String>,
    override_file: Option<String>,
    secrets: Option<Arc<dyn SecretProvider>>,
    node: NodeInfo,
    user: String,
    strict: bool,
}

impl Factory {
    pub fn builder() -> FactoryBuilder {
        FactoryBuilder::new()
    }

    /// Directories searched for config files, first match wins.
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    pub fn override_file(&self) -> Option<&str> {
        self.override_file.as_deref()
    }

    pub fn node(&self) -> &NodeInfo {
        &self.node
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn secret_provider(&self) -> Option<&Arc<dyn SecretProvider>> {
        self.secrets.as_ref()
    }

    /// Locate `name` in the search directories.
    pub fn resolve_config_file(&self, name: &str) -> Result<ResolvedFile, HostfigError> {
        file::resolve_config_file(name, &self.search_dirs)
    }

    /// Variable table for `environment`, built from this factory's node,
    /// user and prefix plus the live process environment.
    pub fn variables(&self, environment: &str) -> VariableContext {
        vars::build_variables(
            environment,
            &self.env_prefix,
            &self.node,
            &self.user,
            vars::env_snapshot(),
        )
    }

    /// Load `file` into a fresh `T::default()`.
    pub fn load<T>(&self, file: &str) -> Result<T, HostfigError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let mut target = T::default();
        self.load_into(file, &mut target)?;
        Ok(target)
    }

    /// Load `file` into `target`.
    ///
    /// Values already in `target` act as defaults beneath every file layer.
    /// On error `target` is left untouched.
    ///
    /// `target` is read and rebuilt through `Serialize`/`Deserialize`, so every
    /// field must round-trip. Skipped fields are reset to their default.
    pub fn load_into<T>(&self, file: &str, target: &mut T) -> Result<Loaded, HostfigError>
    where
        T: Serialize + DeserializeOwned,
    {
        self.load_with(file, None, target)
    }

    /// Like [`load_into`](Self::load_into), but selects the hostmap entry for
    /// `hostname` instead of detecting the host name.
    pub fn load_for_host<T>(
        &self,
        file: &str,
        hostname: &str,
        target: &mut T,
    ) -> Result<Loaded, HostfigError>
    where
        T: Serialize + DeserializeOwned,
    {
        self.load_with(file, Some(hostname), target)
    }

    fn load_with<T>(
        &self,
        file: &str,
        hostname: Option<&str>,
        target: &mut T,
    ) -> Result<Loaded, HostfigError>
    where
        T: Serialize + DeserializeOwned,
    {
        tracing::trace!(file = file, hostname = ?hostname, "loading configuration");

        let base = self.resolve_config_file(file)?;
        tracing::debug!(
            config_file = %base.path.display(),
            base_dir = %base.base_dir.display(),
            "resolved config file"
        );

        let host_override =
            hostmap::resolve_host_override(&base.path, &base.base_dir, hostname, &self.env_prefix)?;

        let explicit_override = match self.override_file.as_deref().filter(|f| !f.is_empty()) {
            Some(name) => {
                let resolved = self.resolve_config_file(name)?;
                tracing::trace!(override_file = %resolved.path.display(), "applying explicit override");
                Some(resolved.path)
            }
            None => None,
        };

        let layer_paths: Vec<PathBuf> = std::iter::once(base.path.clone())
            .chain(host_override.clone())
            .chain(explicit_override.clone())
            .collect();

        let populated: T = resolve::resolve(ResolveInput {
            defaults: expand::to_tree(&*target)?,
            layers: file::read_layers(&layer_paths)?,
            strict: self.strict,
        })?;

        let mut tree = expand::to_tree(&populated)?;
        let environment = bind_environment(&mut tree, self.environment.as_deref());

        let env = vars::env_snapshot();
        let mut variables = vars::build_variables(
            &environment,
            &self.env_prefix,
            &self.node,
            &self.user,
            env.iter().cloned(),
        );

        let config_dir_key = format!("{}{}", self.env_prefix, vars::CONFIG_DIR);
        let base_dir = base.base_dir.display().to_string();
        // Live variables are only visible through the prefix.
        let live_config_dir = if self.env_prefix.is_empty() {
            None
        } else {
            env.iter()
                .find(|(k, v)| *k == config_dir_key && !v.is_empty())
                .map(|(_, v)| v.clone())
        };

        let mut exported_env = Vec::new();
        if live_config_dir.is_none() {
            exported_env.push((config_dir_key.clone(), base_dir.clone()));
        }
        let entry = variables.entry(config_dir_key).or_default();
        if entry.is_empty() {
            *entry = live_config_dir.unwrap_or(base_dir);
        }

        Expander::new(variables, self.secrets.clone()).expand_value(&mut tree)?;
        *target = expand::from_tree(tree)?;

        Ok(Loaded {
            config_file: base.path,
            base_dir: base.base_dir,
            host_override,
            explicit_override,
            exported_env,
        })
    }
}

/// Reconcile the factory's environment name with the target's top-level
/// `environment` field and return the name to expand with.
///
/// A configured name is written into the field; without one, the field's
/// value is used.
fn bind_environment(tree: &mut Value, configured: Option<&str>) -> String {
    let configured = configured.filter(|e| !e.is_empty());

    let field = match tree {
        Value::Mapping(map) => map.get_mut(ENVIRONMENT_FIELD),
        _ => None,
    };

    match (field, configured) {
        (Some(Value::String(value)), Some(name)) => {
            *value = name.to_string();
            name.to_string()
        }
        (Some(Value::String(value)), None) => value.clone(),
        (_, configured) => configured.unwrap_or_default().to_string(),
    }
}

/// Builder for a [`Factory`].
pub struct FactoryBuilder {
    search_paths: Option<Vec<SearchPath>>,
    env_prefix: String,
    environment: Option<String>,
    override_file: Option<String>,
    secrets: Option<Arc<dyn SecretProvider>>,
    node: Option<NodeInfo>,
    user: Option<String>,
    strict: bool,
}

impl FactoryBuilder {
    fn new() -> Self {
        Self {
            search_paths: None,
            env_prefix: String::new(),
            environment: None,
            override_file: None,
            secrets: None,
            node: None,
            user: None,
            strict: false,
        }
    }

    /// Replace the search directories with explicit paths.
    ///
    /// Directories are listed in **priority-descending** order: the first
    /// directory containing the requested file wins.
    pub fn search_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = Some(
            dirs.into_iter()
                .map(|d| SearchPath::Path(d.into()))
                .collect(),
        );
        self
    }

    /// Replace the search directories. See [`SearchPath`] for the variants.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path with the lowest priority so far.
    /// If none have been set yet, starts from the default `[Cwd]`.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(|| vec![SearchPath::Cwd])
            .push(path);
        self
    }

    /// Prefix for environment-derived variables, e.g. `"MYAPP_"`
    /// (default: none). The prefix is used verbatim, no separator is added.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    /// Environment name (`prod`, `dev`, ...) exposed as `${ENVIRONMENT}` and
    /// written into the target's top-level `environment` field.
    pub fn environment(mut self, environment: &str) -> Self {
        self.environment = Some(environment.to_string());
        self
    }

    /// File applied last, on top of the base and host override layers.
    /// Resolved through the search directories.
    pub fn override_file(mut self, file: &str) -> Self {
        self.override_file = Some(file.to_string());
        self
    }

    pub fn secret_provider(mut self, provider: Arc<dyn SecretProvider>) -> Self {
        self.secrets = Some(provider);
        self
    }

    /// Use a fixed node identity instead of detecting it at build time.
    pub fn node_info(mut self, node: NodeInfo) -> Self {
        self.node = Some(node);
        self
    }

    /// Use a fixed user name instead of reading it from the environment.
    pub fn user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    /// Enable or disable strict mode (default: `false`).
    /// In strict mode, keys the target doesn't know produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolve the effective search paths.
    fn effective_search_paths(&self) -> Vec<SearchPath> {
        if let Some(paths) = &self.search_paths {
            return paths.clone();
        }
        vec![SearchPath::Cwd]
    }

    pub fn build(self) -> Factory {
        let search_dirs = file::expand_search_paths(&self.effective_search_paths());
        let node = self.node.unwrap_or_else(NodeInfo::detect);
        let user = self.user.or_else(vars::current_user).unwrap_or_else(|| {
            tracing::warn!("unable to determine current user");
            String::new()
        });

        Factory {
            search_dirs,
            env_prefix: self.env_prefix,
            environment: self.environment,
            override_file: self.override_file,
            secrets: self.secrets,
            node,
            user,
            strict: self.strict,
        }
    }
}
