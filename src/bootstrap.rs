// src/bootstrap.rs
use std::path::Path;

use crate::config::BootstrapConfig;
use crate::error::LoadError;
use crate::kubeconfig::{load_kubeconfig, locate_kubeconfig, KubeConfig};
use crate::resolve::{Registry, RegistryBuilder};
use crate::utils::logging::Logger;

fn builder(config: &BootstrapConfig, logger: Box<dyn Logger>) -> RegistryBuilder {
    RegistryBuilder::new(logger)
        .project_id(config.project_id.clone())
        .location(config.location.clone())
}

/// Builds a registry from an already decoded document, applying the
/// explicit metadata in `config`.
pub fn bootstrap(config: &BootstrapConfig, logger: Box<dyn Logger>, doc: &KubeConfig) -> Registry {
    builder(config, logger).build(doc)
}

/// Reads the kubeconfig at `path` and builds a registry from it.
pub fn bootstrap_from_path(
    config: &BootstrapConfig,
    mut logger: Box<dyn Logger>,
    path: &Path,
) -> Result<Registry, LoadError> {
    logger.debug_log(&format!("Loading kubeconfig from {}", path.display()));
    let doc = load_kubeconfig(path)?;
    Ok(bootstrap(config, logger, &doc))
}

/// Locates the kubeconfig (explicit path, `$KUBECONFIG`, `~/.kube/config`)
/// and builds a registry. `Ok(None)` means no kubeconfig was found.
pub fn bootstrap_from_env(
    config: &BootstrapConfig,
    mut logger: Box<dyn Logger>,
) -> Result<Option<Registry>, LoadError> {
    match locate_kubeconfig(config.kubeconfig.as_deref()) {
        Some(path) => bootstrap_from_path(config, logger, &path).map(Some),
        None => {
            logger.log("No kubeconfig found");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::logging::MemoryLogger;
    use std::fs;

    #[test]
    fn bootstraps_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(
            &path,
            r#"
current-context: gke_p_us-east1_c
clusters: [{name: k, cluster: {server: "https://k"}}]
users: [{name: u, user: {token: t}}]
contexts: [{name: gke_p_us-east1_c, context: {cluster: k, user: u}}]
"#,
        )
        .unwrap();

        let config = BootstrapConfig {
            kubeconfig: Some(path.display().to_string()),
            location: Some("us-east1-b".to_string()),
            ..Default::default()
        };
        let registry = bootstrap_from_env(&config, Box::new(MemoryLogger::new()))
            .unwrap()
            .unwrap();

        let def = registry.default_target().unwrap();
        assert_eq!(def.project_id.as_deref(), Some("p"));
        assert_eq!(def.location.as_deref(), Some("us-east1-b"));
    }

    #[test]
    fn missing_kubeconfig_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = BootstrapConfig {
            kubeconfig: Some(dir.path().join("absent").display().to_string()),
            ..Default::default()
        };
        let logger = MemoryLogger::new();
        let result = bootstrap_from_env(&config, Box::new(logger.clone())).unwrap();
        assert!(result.is_none());
        assert_eq!(logger.lines(), vec!["No kubeconfig found"]);
    }

    #[test]
    fn malformed_kubeconfig_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "clusters: [").unwrap();
        let err = bootstrap_from_path(&BootstrapConfig::default(), Box::new(MemoryLogger::new()), &path)
            .unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }
}
