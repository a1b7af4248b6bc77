// kubeconfig/loader.rs
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::KubeConfig;
use crate::error::{DecodeError, LoadError};

pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

impl KubeConfig {
    pub fn from_yaml(text: &str) -> Result<Self, DecodeError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Decodes either format. Text starting with `{` is tried as JSON first
    /// and falls back to YAML, since flow-style YAML looks the same; the
    /// JSON error is reported when both fail.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        if !text.trim_start().starts_with('{') {
            return Self::from_yaml(text);
        }
        Self::from_json(text).or_else(|json_err| Self::from_yaml(text).map_err(|_| json_err))
    }
}

/// Finds the kubeconfig to use: the explicit path, then the first entry of
/// `$KUBECONFIG`, then `~/.kube/config`. Returns `None` if the chosen file
/// does not exist.
pub fn locate_kubeconfig(explicit: Option<&str>) -> Option<PathBuf> {
    locate_kubeconfig_with(explicit, env::var_os(KUBECONFIG_ENV), dirs::home_dir())
}

pub(crate) fn locate_kubeconfig_with(
    explicit: Option<&str>,
    env_value: Option<OsString>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    let candidate = match explicit.filter(|p| !p.is_empty()) {
        Some(path) => Some(expand(path)),
        None => env_value
            .filter(|v| !v.is_empty())
            .and_then(|v| env::split_paths(&v).find(|p| !p.as_os_str().is_empty()))
            .or_else(|| home.map(|h| h.join(".kube").join("config"))),
    }?;

    candidate.is_file().then_some(candidate)
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

pub fn load_kubeconfig(path: &Path) -> Result<KubeConfig, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(KubeConfig::parse(&text)?)
}
