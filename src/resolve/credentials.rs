// src/resolve/credentials.rs
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use base64::{engine::general_purpose, Engine as _};

use crate::auth::{FileTokenSource, StaticTokenSource, TokenSource};
use crate::error::{CredentialGap, ResolveError, TokenError, TrustMaterialError};
use crate::kubeconfig::{non_empty, Cluster, User};

/// Auth plugins a kubeconfig may name. None of them is executed here; the
/// tag only makes the rejection explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthProviderKind {
    Gcp,
    Oidc,
    Azure,
    Other(String),
}

impl AuthProviderKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "gcp" => Self::Gcp,
            "oidc" => Self::Oidc,
            "azure" => Self::Azure,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AuthProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gcp => write!(f, "gcp"),
            Self::Oidc => write!(f, "oidc"),
            Self::Azure => write!(f, "azure"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Client certificate or key material, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertSource {
    /// Base64 PEM as found in the `*-data` field.
    Inline(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCertificate {
    pub cert: CertSource,
    pub key: Option<CertSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSourceDescriptor {
    Static(StaticTokenSource),
    File(FileTokenSource),
}

impl TokenSource for TokenSourceDescriptor {
    fn token(&self, audience: &str) -> Result<String, TokenError> {
        match self {
            Self::Static(s) => s.token(audience),
            Self::File(f) => f.token(audience),
        }
    }
}

/// What a user entry materialized into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// `None` when the user authenticates with a client certificate only.
    pub token_source: Option<TokenSourceDescriptor>,
    pub client_certificate: Option<ClientCertificate>,
}

impl Credential {
    /// Short label for the mechanism that won.
    pub fn mechanism(&self) -> &'static str {
        match &self.token_source {
            Some(TokenSourceDescriptor::Static(_)) => "token",
            Some(TokenSourceDescriptor::File(_)) => "token-file",
            None => "client-certificate",
        }
    }
}

impl TokenSource for Credential {
    fn token(&self, audience: &str) -> Result<String, TokenError> {
        self.token_source
            .as_ref()
            .ok_or(TokenError::NoBearerToken)?
            .token(audience)
    }
}

type Build = fn(&User) -> Result<Option<TokenSourceDescriptor>, ResolveError>;

struct Mechanism {
    applies: fn(&User) -> bool,
    build: Build,
}

/// Supported mechanisms, highest precedence first. The first one that
/// applies decides the token source. Basic auth and auth providers are
/// deliberately absent.
const PRECEDENCE: [Mechanism; 3] = [
    Mechanism {
        applies: has_token,
        build: static_token,
    },
    Mechanism {
        applies: has_token_file,
        build: file_token,
    },
    Mechanism {
        applies: has_client_certificate,
        build: no_bearer_token,
    },
];

fn has_token(user: &User) -> bool {
    non_empty(&user.token).is_some()
}

fn has_token_file(user: &User) -> bool {
    non_empty(&user.token_file).is_some()
}

fn has_client_certificate(user: &User) -> bool {
    client_certificate(user).is_some()
}

fn static_token(user: &User) -> Result<Option<TokenSourceDescriptor>, ResolveError> {
    let token = non_empty(&user.token).unwrap_or_default();
    Ok(Some(TokenSourceDescriptor::Static(StaticTokenSource::new(
        token,
    ))))
}

fn file_token(user: &User) -> Result<Option<TokenSourceDescriptor>, ResolveError> {
    let path = PathBuf::from(non_empty(&user.token_file).unwrap_or_default());
    match FileTokenSource::open(&path) {
        Ok(source) => Ok(Some(TokenSourceDescriptor::File(source))),
        Err(TokenError::Io { path, source }) => Err(ResolveError::unreadable(path, source)),
        Err(err) => Err(ResolveError::unreadable(
            path,
            io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
        )),
    }
}

fn no_bearer_token(_user: &User) -> Result<Option<TokenSourceDescriptor>, ResolveError> {
    Ok(None)
}

fn cert_source(data: &Option<String>, path: &Option<String>) -> Option<CertSource> {
    non_empty(data)
        .map(|d| CertSource::Inline(d.to_string()))
        .or_else(|| non_empty(path).map(|p| CertSource::File(PathBuf::from(p))))
}

fn client_certificate(user: &User) -> Option<ClientCertificate> {
    let cert = cert_source(&user.client_certificate_data, &user.client_certificate)?;
    Some(ClientCertificate {
        cert,
        key: cert_source(&user.client_key_data, &user.client_key),
    })
}

/// Turns a user entry into a credential.
///
/// Precedence: `token` > `tokenFile` > client certificate. Users offering
/// only basic auth, only an auth provider, or nothing at all are rejected
/// with [`ResolveError::NoUsableCredential`].
pub fn materialize(user_name: &str, user: &User) -> Result<Credential, ResolveError> {
    let Some(mechanism) = PRECEDENCE.iter().find(|m| (m.applies)(user)) else {
        return Err(ResolveError::NoUsableCredential {
            user: user_name.to_string(),
            gap: credential_gap(user),
        });
    };

    Ok(Credential {
        token_source: (mechanism.build)(user)?,
        client_certificate: client_certificate(user),
    })
}

fn credential_gap(user: &User) -> CredentialGap {
    match &user.auth_provider {
        Some(provider) if !provider.name.is_empty() => {
            CredentialGap::AuthProvider(AuthProviderKind::from_name(&provider.name))
        }
        _ if user.has_basic_auth() => CredentialGap::BasicAuthOnly,
        _ => CredentialGap::Empty,
    }
}

/// CA bytes for a cluster. Inline data wins over the file path; a bad
/// encoding or unreadable file rejects the cluster.
pub fn load_trust_material(
    cluster_name: &str,
    cluster: &Cluster,
) -> Result<Option<Vec<u8>>, ResolveError> {
    if let Some(data) = non_empty(&cluster.certificate_authority_data) {
        let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
        return general_purpose::STANDARD
            .decode(compact)
            .map(Some)
            .map_err(|source| {
                TrustMaterialError::InvalidBase64 {
                    cluster: cluster_name.to_string(),
                    source,
                }
                .into()
            });
    }

    if let Some(path) = non_empty(&cluster.certificate_authority) {
        let pem = fs::read(path).map_err(|e| ResolveError::unreadable(path, e))?;
        return Ok(Some(pem));
    }

    Ok(None)
}
