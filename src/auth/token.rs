// src/auth/token.rs
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TokenError;

/// Yields a bearer token for an audience.
///
/// The sources built from a kubeconfig ignore the audience: a kubeconfig
/// token is issued for the API server it sits next to. Exchanging it for an
/// audience-bound token is left to wrappers implementing this trait.
pub trait TokenSource: Send + Sync {
    fn token(&self, audience: &str) -> Result<String, TokenError>;
}

/// A literal token copied from the kubeconfig.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

// Keep tokens out of debug logs.
impl fmt::Debug for StaticTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenSource")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TokenSource for StaticTokenSource {
    fn token(&self, _audience: &str) -> Result<String, TokenError> {
        Ok(self.token.clone())
    }
}

/// A token kept in a file, re-read on every request so rotated tokens
/// (projected service account tokens, for instance) are picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTokenSource {
    path: PathBuf,
}

impl FileTokenSource {
    /// Opens the token file once so unreadable files fail at bootstrap
    /// instead of on first use.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TokenError> {
        let source = Self { path: path.into() };
        source.read()?;
        Ok(source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<String, TokenError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| TokenError::Io {
            path: self.path.clone(),
            source,
        })?;
        let token = raw.trim();
        if token.is_empty() {
            return Err(TokenError::EmptyTokenFile(self.path.clone()));
        }
        Ok(token.to_string())
    }
}

impl TokenSource for FileTokenSource {
    fn token(&self, _audience: &str) -> Result<String, TokenError> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn static_source_ignores_audience() {
        let source = StaticTokenSource::new("abc");
        assert_eq!(source.token("istio-ca").unwrap(), "abc");
        assert_eq!(source.token("").unwrap(), "abc");
    }

    #[test]
    fn static_source_debug_hides_token() {
        let source = StaticTokenSource::new("very-secret");
        assert!(!format!("{:?}", source).contains("very-secret"));
    }

    #[test]
    fn file_source_rereads_on_each_request() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first").unwrap();
        let source = FileTokenSource::open(file.path()).unwrap();
        assert_eq!(source.token("aud").unwrap(), "first");

        fs::write(file.path(), "second\n").unwrap();
        assert_eq!(source.token("aud").unwrap(), "second");
    }

    #[test]
    fn file_source_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileTokenSource::open(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, TokenError::Io { .. }));
    }

    #[test]
    fn file_source_rejects_blank_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "  \n").unwrap();
        let err = FileTokenSource::open(file.path()).unwrap_err();
        assert!(matches!(err, TokenError::EmptyTokenFile(_)));
    }
}
