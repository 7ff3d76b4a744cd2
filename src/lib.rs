//! Host-aware layered configuration for Rust applications. Point at a file,
//! hand over a typed struct, and get it back populated and expanded.
//!
//! Hostfig finds a named config file, layers a host-specific override and an
//! explicit override on top of it, deserializes the result into your struct,
//! and then expands `${VARIABLES}` and indirect value sources (`file://`,
//! `env://`, `secret://`) in every string field.
//!
//! ```ignore
//! let factory = Factory::builder()
//!     .search_dirs(["/etc/myapp", "./config"])
//!     .env_prefix("MYAPP_")
//!     .environment("prod")
//!     .build();
//!
//! let config: AppConfig = factory.load("app.yaml")?;
//! ```
//!
//! # Layer precedence
//!
//! ```text
//! Pre-set target values  whatever the struct held before loading
//!        ↑ overridden by
//! Base file              first search dir containing it
//!        ↑ overridden by
//! Host override          picked from <base>.hostmap by host name
//!        ↑ overridden by
//! Explicit override      .override_file(), resolved through the search dirs
//! ```
//!
//! Every layer is **sparse**: mappings are deep-merged key by key, and any
//! other value (scalars, sequences) from a later layer replaces the earlier
//! one. Layers may be YAML, JSON or TOML, chosen by file extension, and can
//! be mixed freely.
//!
//! # Discovery
//!
//! [`search_dirs()`](FactoryBuilder::search_dirs) and
//! [`search_paths()`](FactoryBuilder::search_paths) list directories in
//! **priority-descending** order: the first directory holding the file wins,
//! and only one base file is ever used. Absolute file names skip the search.
//! A missing file is an error naming every directory searched.
//!
//! # Host overrides
//!
//! An optional sidecar next to the base file maps host names to override
//! files:
//!
//! ```yaml
//! # app.yaml.hostmap
//! override:
//!   web1: override/web1.yaml
//!   web2: /etc/myapp/web2.yaml
//! ```
//!
//! The host name is taken from [`load_for_host()`](Factory::load_for_host),
//! else from `<prefix>HOSTNAME`, else from the OS. Relative override paths
//! are resolved against the base file's directory. Only the base file's
//! sidecar is read.
//!
//! # Expansion
//!
//! After the layers are merged, every string field is rewritten:
//!
//! | Value | Result |
//! |-------|--------|
//! | `file:///etc/myapp/motd` | contents of the file |
//! | `env://DATABASE_URL` | the variable, error if unset |
//! | `secret://db/password` | from the [`SecretProvider`], error if none |
//! | `/tmp/app-${ENVIRONMENT}` | variable-table substitution |
//! | `${secret://db}` | inline secret, empty on failure |
//! | `${ANYTHING_ELSE}` | process environment, empty if unset |
//!
//! The variable table holds `HOSTNAME`, `NODENAME`, `LOCALIP`, `USER`,
//! `NORMALIZED_USER`, `ENVIRONMENT`, `ENVIRONMENT_UPPERCASE` and
//! `<prefix>CONFIG_DIR`. With a prefix, each key is also available prefixed,
//! and every `<prefix>*` environment variable is added. A `${` that survives
//! expansion is an error.
//!
//! Expansion sees your struct through `Serialize`/`Deserialize`, so nested
//! structs, `Vec`s and maps are all walked. Map keys are never expanded.
//!
//! # Strict mode
//!
//! Strict mode is **off by default**, since config files are often shared
//! between programs. Turn it on with
//! [`.strict(true)`](FactoryBuilder::strict) to reject keys your struct
//! doesn't know, each reported with the file that set it.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) offers
//! [`FactoryArgs`], a derive struct with `--config-dir`, `--env-prefix`,
//! `--environment`, `--override` and `--hostname`. To use hostfig without
//! clap:
//!
//! ```toml
//! hostfig = { version = "...", default-features = false }
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`HostfigError`]. Errors name the file,
//! variable or secret that failed. See the [`error`] module for the full set.

pub mod error;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod expand;
mod file;
mod format;
mod hostmap;
pub(crate) mod merge;
mod resolve;
mod scheme;
mod validate;
mod vars;

#[cfg(test)]
mod fixtures;

pub use builder::{Factory, FactoryBuilder};
#[cfg(feature = "clap")]
pub use cli::FactoryArgs;
pub use error::HostfigError;
pub use expand::Expander;
pub use file::{ResolvedFile, abs_path_in, resolve_config_file};
pub use format::{DocFormat, marshal, unmarshal, unmarshal_and_expand};
pub use hostmap::{Hostmap, resolve_host_override};
pub use scheme::{
    ENV_SOURCE, FILE_SOURCE, SECRET_SOURCE, SecretError, SecretProvider, resolve_value,
};
pub use types::{Loaded, NodeInfo, SearchPath};
pub use vars::{VariableContext, build_variables};
