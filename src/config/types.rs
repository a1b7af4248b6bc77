// config/types.rs
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};

/// Settings for a bootstrap run. Everything is optional; an empty config
/// means "discover the kubeconfig and infer what we can".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Explicit kubeconfig path. `~` is expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<String>,
    /// Cloud project id for the default target. Wins over the context name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Cluster location for the default target. Wins over the context name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    pub debug: bool,
}

impl BootstrapConfig {
    pub fn load_from_file(path: &str) -> io::Result<Self> {
        let config_str = fs::read_to_string(path)?;
        serde_json::from_str(&config_str).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save_to_file(&self, path: &str) -> io::Result<()> {
        let config_str = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, config_str)
    }

    pub fn validate(&self) -> io::Result<()> {
        if let Some(kubeconfig) = &self.kubeconfig {
            if !Path::new(&shellexpand::tilde(kubeconfig).to_string()).is_file() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("kubeconfig not found at: {}", kubeconfig),
                ));
            }
        }
        Ok(())
    }
}
