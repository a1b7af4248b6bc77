// src/error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The kubeconfig text could not be decoded. Fatal for a build.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid kubeconfig yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid kubeconfig json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reading a kubeconfig from disk failed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read kubeconfig {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Which side of a context reference could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Cluster,
    User,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cluster => write!(f, "cluster"),
            Self::User => write!(f, "user"),
        }
    }
}

/// Why a user entry offered nothing we can turn into a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialGap {
    /// The user entry has no credential fields at all.
    Empty,
    BasicAuthOnly,
    AuthProvider(crate::resolve::AuthProviderKind),
}

impl std::fmt::Display for CredentialGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "no credential fields set"),
            Self::BasicAuthOnly => write!(f, "basic auth is not supported"),
            Self::AuthProvider(kind) => write!(f, "auth provider '{}' is not supported", kind),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrustMaterialError {
    #[error("certificate-authority-data for cluster '{cluster}' is not valid base64: {source}")]
    InvalidBase64 {
        cluster: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("failed to read {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Per-context failure. The context is skipped, the build continues.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{kind} '{name}' not found")]
    UnresolvedReference { kind: ReferenceKind, name: String },

    #[error("user '{user}' has no usable credential: {gap}")]
    NoUsableCredential { user: String, gap: CredentialGap },

    #[error(transparent)]
    TrustMaterial(#[from] TrustMaterialError),
}

impl ResolveError {
    pub fn unresolved(kind: ReferenceKind, name: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind,
            name: name.into(),
        }
    }

    pub fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::TrustMaterial(TrustMaterialError::UnreadableFile {
            path: path.into(),
            source,
        })
    }
}

/// Failure to produce a bearer token at use time.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to read token file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("token file {0} is empty")]
    EmptyTokenFile(PathBuf),

    #[error("credential has no bearer token (client certificate only)")]
    NoBearerToken,
}
