mod loader;
mod types;

pub use loader::{load_kubeconfig, locate_kubeconfig, KUBECONFIG_ENV};
pub use types::{
    AuthProviderRef, Cluster, Context, Extra, KubeConfig, NamedCluster, NamedContext, NamedUser,
    User,
};
pub(crate) use types::non_empty;
