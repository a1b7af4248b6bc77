// src/resolve/naming.rs

/// Cloud providers whose tooling writes structured context names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudProvider {
    /// `gcloud container clusters get-credentials` writes
    /// `gke_<project>_<location>_<cluster>`.
    Gke,
}

impl CloudProvider {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "gke" => Some(Self::Gke),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextNameParts {
    pub provider: CloudProvider,
    pub project: String,
    pub location: String,
    /// Everything after the location, underscores included.
    pub cluster: String,
}

/// Splits `<tag>_<project>_<location>_<cluster>` into its parts. Returns
/// `None` for unknown tags or names with fewer than four segments.
pub fn parse_context_name(name: &str) -> Option<ContextNameParts> {
    let mut parts = name.splitn(4, '_');
    let provider = CloudProvider::from_tag(parts.next()?)?;
    let project = parts.next()?;
    let location = parts.next()?;
    let cluster = parts.next()?;

    if project.is_empty() || location.is_empty() || cluster.is_empty() {
        return None;
    }

    Some(ContextNameParts {
        provider,
        project: project.to_string(),
        location: location.to_string(),
        cluster: cluster.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gke_name() {
        let parts = parse_context_name("gke_myproj_us-central1-a_mycluster").unwrap();
        assert_eq!(parts.provider, CloudProvider::Gke);
        assert_eq!(parts.project, "myproj");
        assert_eq!(parts.location, "us-central1-a");
        assert_eq!(parts.cluster, "mycluster");
    }

    #[test]
    fn cluster_name_keeps_extra_underscores() {
        let parts = parse_context_name("gke_p_europe-west1_my_long_cluster").unwrap();
        assert_eq!(parts.cluster, "my_long_cluster");
    }

    #[test]
    fn plain_names_are_opaque() {
        assert_eq!(parse_context_name("mycluster"), None);
        assert_eq!(parse_context_name(""), None);
    }

    #[test]
    fn too_few_segments() {
        assert_eq!(parse_context_name("gke_myproj_us-central1"), None);
        assert_eq!(parse_context_name("gke_myproj"), None);
    }

    #[test]
    fn unknown_tag() {
        assert_eq!(parse_context_name("eks_acct_us-east-1_c"), None);
        assert_eq!(parse_context_name("GKE_p_l_c"), None);
    }

    #[test]
    fn empty_segments() {
        assert_eq!(parse_context_name("gke__us-central1_c"), None);
        assert_eq!(parse_context_name("gke_p_l_"), None);
    }
}
