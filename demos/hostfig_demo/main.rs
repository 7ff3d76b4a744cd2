//! # hostfig demo application
//!
//! A sample CLI tool that showcases how to integrate hostfig into a real
//! application. This is **not** a real app; it exists purely to demonstrate
//! and manually verify hostfig's features against the files under
//! `demos/hostfig_demo/files/`.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example hostfig_demo -- --secret api-key=s3cr3t
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                | How to exercise it                                                         |
//! |------------------------|----------------------------------------------------------------------------|
//! | Base file + expansion  | `cargo run --example hostfig_demo -- --secret api-key=s3cr3t`              |
//! | Environment name       | `... -- --environment prod --secret api-key=x`                             |
//! | Host override (YAML)   | `... -- --hostname web1 --secret api-key=x`                                |
//! | Host override (JSON)   | `... -- --hostname web2 --secret api-key=x`                                |
//! | Host from env          | `HOSTFIG_DEMO_HOSTNAME=web1 cargo run --example hostfig_demo -- --secret api-key=x` |
//! | Explicit override      | `... -- --override local.toml --secret api-key=x`                          |
//! | Prefixed env variables | `HOSTFIG_DEMO_CONFIG_DIR=/etc/demo cargo run --example hostfig_demo -- --secret api-key=x` |
//! | Missing secret         | `cargo run --example hostfig_demo` (fails: `api-key` not found)             |
//! | Strict mode            | `... -- --strict --secret api-key=x` with an unknown key in `demo.yaml`    |
//! | Tracing                | `RUST_LOG=hostfig=trace cargo run --example hostfig_demo -- --secret api-key=x` |

mod config;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hostfig::{Factory, FactoryArgs, Loaded, SearchPath, SecretError};

use config::DemoConfig;

const DEMO_CONFIG_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/hostfig_demo/files");

/// hostfig demo: load, layer and expand a sample configuration.
#[derive(Parser, Debug)]
#[command(name = "hostfig-demo")]
struct Cli {
    #[command(flatten)]
    config: FactoryArgs,

    /// Config file to load.
    #[arg(long, default_value = "demo.yaml")]
    file: String,

    /// Secret made available to `secret://` references, as NAME=VALUE.
    /// Repeatable.
    #[arg(long = "secret", value_name = "NAME=VALUE", value_parser = parse_secret)]
    secrets: Vec<(String, String)>,

    /// Reject keys the config struct doesn't know.
    #[arg(long)]
    strict: bool,

    /// Print the layers that were applied before the config.
    #[arg(long)]
    verbose: bool,
}

fn parse_secret(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))
}

/// Build the demo secret provider from `--secret` flags.
///
/// `secret://api-key/web1` looks up `api-key/web1` first, then `api-key`.
fn secret_store(pairs: &[(String, String)]) -> impl Fn(&str) -> Result<String, SecretError> + use<> {
    let store: HashMap<String, String> = pairs.iter().cloned().collect();
    move |name: &str| {
        let base = name.split('/').next().unwrap_or(name);
        store
            .get(name)
            .or_else(|| store.get(base))
            .cloned()
            .ok_or_else(|| format!("secret not found: {name}").into())
    }
}

fn print_layers(loaded: &Loaded) {
    println!("# base:     {}", loaded.config_file.display());
    if let Some(path) = &loaded.host_override {
        println!("# host:     {}", path.display());
    }
    if let Some(path) = &loaded.explicit_override {
        println!("# override: {}", path.display());
    }
    for (key, value) in &loaded.exported_env {
        println!("# export:   {key}={value}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let builder = Factory::builder()
        .search_paths(vec![
            SearchPath::Cwd,
            SearchPath::Path(PathBuf::from(DEMO_CONFIG_DIR)),
        ])
        .env_prefix("HOSTFIG_DEMO_")
        .strict(cli.strict)
        .secret_provider(Arc::new(secret_store(&cli.secrets)));
    let factory = cli.config.apply(builder).build();

    let mut config = DemoConfig::default();
    let result = match cli.config.hostname() {
        Some(host) => factory.load_for_host(&cli.file, host, &mut config),
        None => factory.load_into(&cli.file, &mut config),
    };
    let loaded = result.unwrap_or_else(|e| {
        eprintln!("Failed to load config:\n{e}");
        std::process::exit(1);
    });

    if cli.verbose {
        print_layers(&loaded);
    }

    match serde_yaml::to_string(&config) {
        Ok(yaml) => print!("{yaml}"),
        Err(e) => {
            eprintln!("Failed to render config:\n{e}");
            std::process::exit(1);
        }
    }
}
