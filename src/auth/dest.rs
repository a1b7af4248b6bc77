// src/auth/dest.rs
use url::Url;

/// Where to connect and what to trust. Handed to the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    pub addr: String,
    /// Raw PEM bytes of the cluster CA, if the kubeconfig carried one.
    pub ca_cert_pem: Option<Vec<u8>>,
    pub insecure_skip_tls_verify: bool,
}

impl Destination {
    pub fn url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.addr)
    }

    /// Host part of the address, falling back to the raw address when it
    /// does not parse as a URL.
    pub fn host(&self) -> String {
        self.url()
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.addr.clone())
    }
}
