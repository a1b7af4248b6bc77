//! Turns a decoded kubeconfig into a registry of connection targets.

mod credentials;
mod naming;
mod reference;
mod registry;

pub use credentials::{
    load_trust_material, materialize, AuthProviderKind, CertSource, ClientCertificate, Credential,
    TokenSourceDescriptor,
};
pub use naming::{parse_context_name, CloudProvider, ContextNameParts};
pub use reference::{namespace_or_default, ReferenceIndex, ResolvedRefs, DEFAULT_NAMESPACE};
pub use registry::{Registry, RegistryBuilder, ResolvedTarget, SkippedContext};
