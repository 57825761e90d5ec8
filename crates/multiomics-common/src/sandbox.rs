use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use tracing::warn;
use url::Url;
use crate::error::CensusError;

/// Default request timeout for E-utilities calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An HTTP client that only issues requests to approved hosts.
/// The census only ever talks to NCBI, plus loopback for local mirrors and tests.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    pub fn new() -> Result<Self, CensusError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, CensusError> {
        let allowlist = [
            "eutils.ncbi.nlm.nih.gov", // PubMed E-utilities
            "localhost",
            "127.0.0.1",
        ]
        .iter()
        .map(|d| d.to_string())
        .collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("multiomics-census/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CensusError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Validates if a URL is permitted under the current policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else { return false };
        let Some(host) = parsed.host_str() else { return false };
        // Exact match or subdomain of an allowed host
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    /// Builds a GET request, refusing hosts outside the allowlist.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, CensusError> {
        if !self.is_allowed(url) {
            warn!(%url, "Refusing request to host outside the allowlist");
            return Err(CensusError::Security(format!(
                "Network capabilities capped: domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}
