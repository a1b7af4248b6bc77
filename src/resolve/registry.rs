// src/resolve/registry.rs
use std::collections::BTreeMap;

use super::credentials::{load_trust_material, materialize, Credential};
use super::naming::parse_context_name;
use super::reference::ReferenceIndex;
use crate::auth::{Destination, TokenSource};
use crate::error::{ResolveError, TokenError};
use crate::kubeconfig::{KubeConfig, NamedContext};
use crate::utils::logging::Logger;

/// A context resolved into something a client can connect with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Context name; the registry key.
    pub context: String,
    pub cluster: String,
    pub user: String,
    pub namespace: String,
    pub destination: Destination,
    pub credential: Credential,
    /// Only set on the default target, from explicit configuration or the
    /// context naming convention.
    pub project_id: Option<String>,
    pub location: Option<String>,
}

impl TokenSource for ResolvedTarget {
    fn token(&self, audience: &str) -> Result<String, TokenError> {
        self.credential.token(audience)
    }
}

/// A context that was left out of the registry, and why.
#[derive(Debug)]
pub struct SkippedContext {
    pub context: String,
    pub error: ResolveError,
}

/// Resolved targets keyed by context name. Read-only once built.
#[derive(Debug, Default)]
pub struct Registry {
    entries: BTreeMap<String, ResolvedTarget>,
    default: Option<String>,
    skipped: Vec<SkippedContext>,
}

impl Registry {
    pub fn get(&self, context: &str) -> Option<&ResolvedTarget> {
        self.entries.get(context)
    }

    /// The target selected by `current-context`. `None` when the pointer is
    /// empty or names a context that did not resolve.
    pub fn default_target(&self) -> Option<&ResolvedTarget> {
        self.default.as_deref().and_then(|name| self.entries.get(name))
    }

    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Context names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn targets(&self) -> impl Iterator<Item = &ResolvedTarget> {
        self.entries.values()
    }

    pub fn skipped(&self) -> &[SkippedContext] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct RegistryBuilder {
    logger: Box<dyn Logger>,
    project_id: Option<String>,
    location: Option<String>,
}

impl RegistryBuilder {
    pub fn new(logger: Box<dyn Logger>) -> Self {
        Self {
            logger,
            project_id: None,
            location: None,
        }
    }

    /// Explicit project id for the default target. Wins over the value
    /// inferred from the context name.
    pub fn project_id(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id.filter(|p| !p.is_empty());
        self
    }

    /// Explicit location for the default target. Wins over inference.
    pub fn location(mut self, location: Option<String>) -> Self {
        self.location = location.filter(|l| !l.is_empty());
        self
    }

    /// Resolves every context in document order. Contexts that fail are
    /// logged, recorded in [`Registry::skipped`] and left out; they never
    /// abort the build.
    pub fn build(&mut self, doc: &KubeConfig) -> Registry {
        let index = ReferenceIndex::new(doc);
        let mut registry = Registry::default();

        for named in &doc.contexts {
            match resolve_context(&index, named) {
                Ok(target) => {
                    self.logger.debug_log(&format!(
                        "Resolved context {} -> {} ({})",
                        named.name,
                        target.destination.addr,
                        target.credential.mechanism()
                    ));
                    registry.entries.insert(named.name.clone(), target);
                }
                Err(error) => {
                    self.logger.log(&format!(
                        "Skipping incompatible context {}: {}",
                        named.name, error
                    ));
                    registry.skipped.push(SkippedContext {
                        context: named.name.clone(),
                        error,
                    });
                }
            }
        }

        let current = doc.current_context.as_str();
        match registry.entries.get_mut(current) {
            Some(target) => {
                self.enrich_default(target);
                registry.default = Some(current.to_string());
            }
            None if current.is_empty() => {
                self.logger.debug_log("No current context selected");
            }
            None => {
                self.logger
                    .log(&format!("Current context {} is not available", current));
            }
        }

        registry
    }

    fn enrich_default(&mut self, target: &mut ResolvedTarget) {
        target.project_id = self.project_id.clone();
        target.location = self.location.clone();

        if let Some(parts) = parse_context_name(&target.context) {
            self.logger.debug_log(&format!(
                "Context {} follows the {:?} naming convention",
                target.context, parts.provider
            ));
            target.project_id.get_or_insert(parts.project);
            target.location.get_or_insert(parts.location);
        }
    }
}

fn resolve_context(
    index: &ReferenceIndex<'_>,
    named: &NamedContext,
) -> Result<ResolvedTarget, ResolveError> {
    let refs = index.resolve(&named.context)?;
    let credential = materialize(&named.context.user, refs.user)?;
    let ca_cert_pem = load_trust_material(&named.context.cluster, refs.cluster)?;

    Ok(ResolvedTarget {
        context: named.name.clone(),
        cluster: named.context.cluster.clone(),
        user: named.context.user.clone(),
        namespace: refs.namespace,
        destination: Destination {
            addr: refs.cluster.server.clone(),
            ca_cert_pem,
            insecure_skip_tls_verify: refs.cluster.insecure_skip_tls_verify,
        },
        credential,
        project_id: None,
        location: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReferenceKind;
    use crate::utils::logging::MemoryLogger;

    const DOC: &str = r#"
current-context: gke_myproj_us-central1-a_mycluster
clusters:
- name: gke-cluster
  cluster:
    server: https://35.1.2.3
    certificate-authority-data: LS0tLS1CRUdJTi0tLS0t
- name: local
  cluster:
    server: https://127.0.0.1:6443
    insecure-skip-tls-verify: true
users:
- name: gke-user
  user:
    token: gke-token
- name: basic
  user:
    username: admin
    password: admin
contexts:
- name: gke_myproj_us-central1-a_mycluster
  context:
    cluster: gke-cluster
    user: gke-user
- name: local
  context:
    cluster: local
    user: gke-user
    namespace: dev
- name: basic-only
  context:
    cluster: local
    user: basic
- name: dangling
  context:
    cluster: nowhere
    user: gke-user
"#;

    fn build(doc: &KubeConfig) -> (Registry, MemoryLogger) {
        let logger = MemoryLogger::new();
        let registry = RegistryBuilder::new(Box::new(logger.clone())).build(doc);
        (registry, logger)
    }

    #[test]
    fn resolves_usable_contexts_and_skips_the_rest() {
        let doc = KubeConfig::parse(DOC).unwrap();
        let (registry, logger) = build(&doc);

        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["gke_myproj_us-central1-a_mycluster", "local"]);

        let local = registry.get("local").unwrap();
        assert_eq!(local.destination.addr, "https://127.0.0.1:6443");
        assert!(local.destination.insecure_skip_tls_verify);
        assert_eq!(local.destination.ca_cert_pem, None);
        assert_eq!(local.namespace, "dev");
        assert_eq!(local.token("any").unwrap(), "gke-token");

        let skipped: Vec<&str> = registry.skipped().iter().map(|s| s.context.as_str()).collect();
        assert_eq!(skipped, vec!["basic-only", "dangling"]);
        assert!(matches!(
            registry.skipped()[0].error,
            ResolveError::NoUsableCredential { .. }
        ));
        assert!(matches!(
            registry.skipped()[1].error,
            ResolveError::UnresolvedReference { kind: ReferenceKind::Cluster, .. }
        ));

        let lines = logger.lines();
        assert!(lines
            .iter()
            .any(|l| l.starts_with("Skipping incompatible context dangling")));
    }

    #[test]
    fn default_target_is_enriched_from_its_name() {
        let doc = KubeConfig::parse(DOC).unwrap();
        let (registry, _) = build(&doc);

        let def = registry.default_target().unwrap();
        assert_eq!(def.context, "gke_myproj_us-central1-a_mycluster");
        assert_eq!(def.project_id.as_deref(), Some("myproj"));
        assert_eq!(def.location.as_deref(), Some("us-central1-a"));
        assert_eq!(def.namespace, "default");
        assert_eq!(def.destination.ca_cert_pem.as_deref(), Some(&b"-----BEGIN-----"[..]));

        // Non-default entries are not enriched.
        assert_eq!(registry.get("local").unwrap().project_id, None);
    }

    #[test]
    fn explicit_metadata_wins_over_inference() {
        let doc = KubeConfig::parse(DOC).unwrap();
        let registry = RegistryBuilder::new(Box::new(MemoryLogger::new()))
            .project_id(Some("explicit-proj".to_string()))
            .build(&doc);

        let def = registry.default_target().unwrap();
        assert_eq!(def.project_id.as_deref(), Some("explicit-proj"));
        assert_eq!(def.location.as_deref(), Some("us-central1-a"));
    }

    #[test]
    fn unrecognized_current_context_name_leaves_metadata_empty() {
        let mut doc = KubeConfig::parse(DOC).unwrap();
        doc.current_context = "local".to_string();
        let (registry, _) = build(&doc);

        let def = registry.default_target().unwrap();
        assert_eq!(def.context, "local");
        assert_eq!(def.project_id, None);
        assert_eq!(def.location, None);
    }

    #[test]
    fn empty_current_context_means_no_default() {
        let mut doc = KubeConfig::parse(DOC).unwrap();
        doc.current_context = String::new();
        let (registry, _) = build(&doc);

        assert!(registry.default_target().is_none());
        assert!(registry.default_name().is_none());
        assert!(registry.get("local").is_some());
    }

    #[test]
    fn current_context_that_failed_means_no_default() {
        let mut doc = KubeConfig::parse(DOC).unwrap();
        doc.current_context = "dangling".to_string();
        let (registry, logger) = build(&doc);

        assert!(registry.default_target().is_none());
        assert!(logger
            .lines()
            .contains(&"Current context dangling is not available".to_string()));
    }

    #[test]
    fn empty_document_builds_empty_registry() {
        let (registry, _) = build(&KubeConfig::default());
        assert!(registry.is_empty());
        assert!(registry.default_target().is_none());
        assert!(registry.skipped().is_empty());
    }

    #[test]
    fn registry_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
        assert_send_sync::<ResolvedTarget>();
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let doc = KubeConfig::parse(DOC).unwrap();
        let mut builder = RegistryBuilder::new(Box::new(MemoryLogger::new()));
        let first = builder.build(&doc);
        let second = builder.build(&doc);

        assert_eq!(
            first.targets().collect::<Vec<_>>(),
            second.targets().collect::<Vec<_>>()
        );
        assert_eq!(first.default_name(), second.default_name());
    }
}
