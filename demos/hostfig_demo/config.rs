//! Configuration structs for the hostfig demo application.
//!
//! The root [`DemoConfig`] holds top-level scalars plus two nested records
//! and a map, to show that expansion walks the whole struct. Every field has
//! a default, so a sparse file (or an empty one) still loads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the demo application.
#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct DemoConfig {
    /// Service name shown in the banner.
    pub service: String,

    /// Deployment environment. Set from `--environment` when given.
    pub environment: String,

    /// Region or datacenter the instance runs in.
    pub region: String,

    /// API key, usually a `secret://` reference.
    pub api_key: String,

    pub server: ServerConfig,

    pub logs: LogConfig,

    /// Free-form labels attached to every log line.
    pub labels: BTreeMap<String, String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            service: "hostfig-demo".into(),
            environment: String::new(),
            region: "local".into(),
            api_key: String::new(),
            server: ServerConfig::default(),
            logs: LogConfig::default(),
            labels: BTreeMap::new(),
        }
    }
}

/// Server-related configuration.
#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to.
    pub host: String,

    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

/// Log output settings.
#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct LogConfig {
    /// Where to store log files; empty means stderr.
    pub directory: String,

    pub max_age_days: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: String::new(),
            max_age_days: 7,
        }
    }
}
