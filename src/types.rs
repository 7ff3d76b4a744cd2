//! Plain data types shared by the factory and the pipeline stages.

use std::net::UdpSocket;
use std::path::PathBuf;

/// A directory to search for config files.
///
/// Search paths are listed in **priority-descending** order: the first
/// directory that contains the requested file wins.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory for the named app (XDG on Linux,
    /// ~/Library/Application Support on macOS).
    Platform(&'static str),
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit directory. Relative paths are taken against the CWD.
    Path(PathBuf),
}

/// Identity of the machine the process runs on.
///
/// Feeds the `HOSTNAME`, `NODENAME` and `LOCALIP` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInfo {
    pub host_name: String,
    pub node_name: String,
    pub local_ip: String,
}

impl NodeInfo {
    pub fn new(
        host_name: impl Into<String>,
        node_name: impl Into<String>,
        local_ip: impl Into<String>,
    ) -> Self {
        Self {
            host_name: host_name.into(),
            node_name: node_name.into(),
            local_ip: local_ip.into(),
        }
    }

    /// Detect the identity of the current machine.
    ///
    /// The node name is the first label of the host name. A host name that
    /// cannot be read is logged and left empty.
    pub fn detect() -> Self {
        let host_name = match os_hostname() {
            Ok(name) => name,
            Err(err) => {
                tracing::warn!(reason = "hostname", err = %err, "unable to read host name");
                String::new()
            }
        };
        let node_name = host_name
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();

        Self {
            host_name,
            node_name,
            local_ip: detect_local_ip(),
        }
    }
}

pub(crate) fn os_hostname() -> std::io::Result<String> {
    hostname::get().map(|name| name.to_string_lossy().into_owned())
}

/// Connecting a UDP socket sends nothing; it only asks the OS which local
/// address would be used for outbound traffic.
fn detect_local_ip() -> String {
    UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("192.0.2.1:80")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string())
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    /// Absolute path of the base config file.
    pub config_file: PathBuf,
    /// Directory the base file was found in.
    pub base_dir: PathBuf,
    /// Host-specific override applied from the hostmap, if any.
    pub host_override: Option<PathBuf>,
    /// Explicit override file applied last, if configured.
    pub explicit_override: Option<PathBuf>,
    /// Environment variables the loader derived but did not write, currently
    /// only `<prefix>CONFIG_DIR` when it was not already set.
    pub exported_env: Vec<(String, String)>,
}

impl Loaded {
    /// Write [`exported_env`](Self::exported_env) into the process
    /// environment, skipping variables that are already present.
    ///
    /// # Safety
    ///
    /// Mutates the process environment; see [`std::env::set_var`]. The caller
    /// must ensure no other thread reads or writes the environment
    /// concurrently.
    pub unsafe fn export_env(&self) {
        for (key, value) in &self.exported_env {
            if std::env::var_os(key).is_none() {
                // SAFETY: upheld by the caller per this function's contract.
                unsafe { std::env::set_var(key, value) };
            }
        }
    }
}
