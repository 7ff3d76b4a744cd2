#[cfg(test)]
pub mod test {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    use serde::{Deserialize, Serialize};

    use crate::scheme::{SecretError, SecretProvider};

    #[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
    #[serde(default)]
    pub struct TestConfig {
        /// Region or datacenter the instance runs in.
        pub region: String,

        /// Deployment environment: prod, stage, dev.
        pub environment: String,

        /// Service name used in logs and metrics.
        pub service: String,

        pub cluster: String,

        pub client_api_key: String,

        /// Audit logger settings.
        pub audit: Logger,

        /// Application logger settings.
        pub logs: Logger,

        pub templates: HashMap<String, String>,

        pub list: Vec<String>,

        pub map_log: HashMap<String, Logger>,
    }

    #[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
    #[serde(default)]
    pub struct Logger {
        /// Where to store log files; empty means stderr.
        pub directory: String,

        pub max_age_days: u32,

        pub max_size_mb: u32,
    }

    /// Secret store keyed by the first path segment of the secret name.
    pub struct MockSecrets {
        secrets: HashMap<String, String>,
    }

    impl MockSecrets {
        pub fn new(pairs: &[(&str, &str)]) -> Self {
            Self {
                secrets: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl SecretProvider for MockSecrets {
        fn get_secret(&self, name: &str) -> Result<String, SecretError> {
            let key = name.split('/').next().unwrap_or(name);
            match self.secrets.get(key) {
                Some(v) if !v.is_empty() => Ok(v.clone()),
                _ => Err(format!("secret not found: {name}").into()),
            }
        }
    }

    /// Write `content` to `dir/name`, creating parent directories.
    pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn mock_secrets_ignore_extra_segments() {
        let secrets = MockSecrets::new(&[("secret1", "api-key1")]);
        assert_eq!(secrets.get_secret("secret1/api-key").unwrap(), "api-key1");
        assert!(secrets.get_secret("secret2").is_err());
    }
}
