//! Bootstraps multi-cluster access from a kubeconfig: decodes the document,
//! joins each context to its cluster and user, turns user credentials into
//! token sources and picks the default target from `current-context`.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod kubeconfig;
pub mod resolve;
pub mod utils;

pub use bootstrap::{bootstrap, bootstrap_from_env, bootstrap_from_path};
pub use config::BootstrapConfig;
pub use error::{DecodeError, LoadError, ResolveError, TokenError};
pub use kubeconfig::KubeConfig;
pub use resolve::{Registry, RegistryBuilder, ResolvedTarget};
