//! hostmig.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_STORE_PATH: &str = "provider_hosts.dat";
pub const DEFAULT_BACKUP_PATH: &str = "ingresses_backup.json";
pub const DEFAULT_TARGET_NAMESPACE: &str = "lease";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    /// Record store written by `backup`, read by `create` and `purge`.
    pub store_path: PathBuf,
    /// Newline-delimited JSON copy of every ingress seen during `backup`.
    pub backup_path: PathBuf,
    /// Namespace the ProviderHost resources are applied into.
    pub target_namespace: String,
    pub kubectl: KubectlConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubectlConfig {
    pub binary: PathBuf,
    pub context: Option<String>,
    pub kubeconfig: Option<PathBuf>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        MigrateConfig {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            backup_path: PathBuf::from(DEFAULT_BACKUP_PATH),
            target_namespace: DEFAULT_TARGET_NAMESPACE.to_string(),
            kubectl: KubectlConfig::default(),
        }
    }
}

impl Default for KubectlConfig {
    fn default() -> Self {
        KubectlConfig {
            binary: PathBuf::from("kubectl"),
            context: None,
            kubeconfig: None,
        }
    }
}

impl MigrateConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MigrateConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
