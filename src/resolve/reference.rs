// src/resolve/reference.rs
use std::collections::HashMap;

use crate::error::{ReferenceKind, ResolveError};
use crate::kubeconfig::{Cluster, Context, KubeConfig, User};

pub const DEFAULT_NAMESPACE: &str = "default";

/// Name lookups over one document.
///
/// Built by folding each list in order, so when a name repeats the later
/// entry replaces the earlier one, matching a linear scan that keeps the last
/// match.
pub struct ReferenceIndex<'a> {
    clusters: HashMap<&'a str, &'a Cluster>,
    users: HashMap<&'a str, &'a User>,
}

/// A context joined with the records it names.
#[derive(Debug)]
pub struct ResolvedRefs<'a> {
    pub cluster: &'a Cluster,
    pub user: &'a User,
    pub namespace: String,
}

impl<'a> ReferenceIndex<'a> {
    pub fn new(doc: &'a KubeConfig) -> Self {
        let clusters = doc.clusters.iter().fold(HashMap::new(), |mut acc, c| {
            acc.insert(c.name.as_str(), &c.cluster);
            acc
        });
        let users = doc.users.iter().fold(HashMap::new(), |mut acc, u| {
            acc.insert(u.name.as_str(), &u.user);
            acc
        });
        Self { clusters, users }
    }

    pub fn resolve(&self, context: &Context) -> Result<ResolvedRefs<'a>, ResolveError> {
        let cluster = self
            .clusters
            .get(context.cluster.as_str())
            .copied()
            .ok_or_else(|| ResolveError::unresolved(ReferenceKind::Cluster, &context.cluster))?;
        let user = self
            .users
            .get(context.user.as_str())
            .copied()
            .ok_or_else(|| ResolveError::unresolved(ReferenceKind::User, &context.user))?;

        Ok(ResolvedRefs {
            cluster,
            user,
            namespace: namespace_or_default(&context.namespace),
        })
    }
}

pub fn namespace_or_default(namespace: &str) -> String {
    if namespace.is_empty() {
        DEFAULT_NAMESPACE.to_string()
    } else {
        namespace.to_string()
    }
}
