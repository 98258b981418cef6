use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Knobs for the batch-job target's artifact store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Login user on the storage server (default: "ichiba").
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Storage server address (default: "storage").
    #[serde(default = "default_servername")]
    pub servername: String,
    /// Base upload directory on the server.
    #[serde(default = "default_target")]
    pub target: String,
    /// In-container root for out-direction scratch directories.
    #[serde(default = "default_scratch_root")]
    pub scratch_root: String,
}

fn default_hostname() -> String {
    "ichiba".to_string()
}

fn default_servername() -> String {
    "storage".to_string()
}

fn default_target() -> String {
    "/var/www/html/pub/ichiba".to_string()
}

fn default_scratch_root() -> String {
    "/tmp/var/run/ichiba".to_string()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            servername: default_servername(),
            target: default_target(),
            scratch_root: default_scratch_root(),
        }
    }
}
