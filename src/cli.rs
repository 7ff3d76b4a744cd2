//! Clap adapter for hostfig.
//!
//! This module is the **optional integration layer** between hostfig's
//! framework-agnostic core and the [clap](https://docs.rs/clap) CLI parser.
//! It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! [`FactoryArgs`] is a clap derive struct you flatten into your own
//! `#[derive(Parser)]` struct to get the usual loader flags. The only bridge
//! to the core is [`FactoryArgs::apply()`], which copies the parsed flags onto
//! a [`FactoryBuilder`]. From there, everything flows through the clap-free
//! [`Factory`](crate::Factory) API.

use std::path::PathBuf;

use clap::Args;

use crate::builder::{Factory, FactoryBuilder};

/// Clap-derived loader flags.
///
/// Embed this into your app's clap derive:
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     config: FactoryArgs,
/// }
/// ```
#[derive(Debug, Clone, Default, Args)]
pub struct FactoryArgs {
    /// Directory to search for config files. Repeatable; earlier
    /// directories win.
    #[arg(long = "config-dir", value_name = "DIR")]
    pub config_dirs: Vec<PathBuf>,

    /// Prefix for environment-derived variables (e.g. "MYAPP_").
    #[arg(long, value_name = "PREFIX")]
    pub env_prefix: Option<String>,

    /// Environment name (prod, stage, dev).
    #[arg(long, value_name = "NAME")]
    pub environment: Option<String>,

    /// Override file applied on top of every other layer.
    #[arg(long = "override", value_name = "FILE")]
    pub override_file: Option<String>,

    /// Host name used to select the hostmap override.
    #[arg(long, value_name = "HOST")]
    pub hostname: Option<String>,
}

impl FactoryArgs {
    /// Copy every flag that was given onto `builder`. Flags left out keep the
    /// builder's values.
    pub fn apply(&self, mut builder: FactoryBuilder) -> FactoryBuilder {
        if !self.config_dirs.is_empty() {
            builder = builder.search_dirs(self.config_dirs.iter().cloned());
        }
        if let Some(prefix) = &self.env_prefix {
            builder = builder.env_prefix(prefix);
        }
        if let Some(environment) = &self.environment {
            builder = builder.environment(environment);
        }
        if let Some(file) = &self.override_file {
            builder = builder.override_file(file);
        }
        builder
    }

    /// A fresh [`FactoryBuilder`] carrying these flags.
    pub fn into_builder(self) -> FactoryBuilder {
        self.apply(Factory::builder())
    }

    /// Host name for [`Factory::load_for_host`], if one was given.
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref().filter(|h| !h.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeInfo;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: FactoryArgs,
    }

    fn parse(args: &[&str]) -> FactoryArgs {
        TestCli::try_parse_from(args).unwrap().config
    }

    fn build(args: &FactoryArgs) -> Factory {
        args.clone()
            .into_builder()
            .node_info(NodeInfo::new("h", "h", "127.0.0.1"))
            .user("u")
            .build()
    }

    #[test]
    fn no_flags() {
        let args = parse(&["app"]);
        assert!(args.config_dirs.is_empty());
        assert_eq!(args.env_prefix, None);
        assert_eq!(args.hostname(), None);
    }

    #[test]
    fn repeated_config_dirs_keep_order() {
        let args = parse(&["app", "--config-dir", "/etc/app", "--config-dir", "/opt/app"]);
        assert_eq!(
            args.config_dirs,
            vec![PathBuf::from("/etc/app"), PathBuf::from("/opt/app")]
        );
        assert_eq!(
            build(&args).search_dirs(),
            &[PathBuf::from("/etc/app"), PathBuf::from("/opt/app")]
        );
    }

    #[test]
    fn all_flags() {
        let args = parse(&[
            "app",
            "--env-prefix",
            "MYAPP_",
            "--environment",
            "prod",
            "--override",
            "local.yaml",
            "--hostname",
            "web1",
        ]);
        let factory = build(&args);
        assert_eq!(factory.env_prefix(), "MYAPP_");
        assert_eq!(factory.environment(), Some("prod"));
        assert_eq!(factory.override_file(), Some("local.yaml"));
        assert_eq!(args.hostname(), Some("web1"));
    }

    #[test]
    fn apply_keeps_builder_values_for_missing_flags() {
        let args = parse(&["app", "--environment", "dev"]);
        let factory = args
            .apply(Factory::builder().env_prefix("KEEP_").environment("prod"))
            .node_info(NodeInfo::default())
            .user("u")
            .build();
        assert_eq!(factory.env_prefix(), "KEEP_");
        assert_eq!(factory.environment(), Some("dev"));
    }

    #[test]
    fn empty_hostname_is_none() {
        let args = parse(&["app", "--hostname", ""]);
        assert_eq!(args.hostname(), None);
    }
}
