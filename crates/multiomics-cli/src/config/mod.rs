//! Configuration loading for the census.
//! Reads multiomics.toml from the path given on the command line, the
//! MULTIOMICS_CONFIG env var, or the current directory. A missing default
//! file means built-in defaults.

use multiomics_common::keywords::DEFAULT_RETMAX;
use multiomics_common::sandbox::SandboxClient;
use multiomics_ingestion::sources::pubmed::ESEARCH_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pubmed: PubMedConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubMedConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_retmax")]
    pub retmax: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Hosts added to the sandbox allowlist, e.g. a local E-utilities mirror.
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
}

fn default_base_url()     -> String { ESEARCH_URL.to_string() }
fn default_retmax()       -> u64    { DEFAULT_RETMAX }
fn default_timeout_secs() -> u64    { 30 }

impl Default for PubMedConfig {
    fn default() -> Self {
        Self {
            api_key:      String::new(),
            base_url:     default_base_url(),
            retmax:       default_retmax(),
            timeout_secs: default_timeout_secs(),
            allowed_hosts: Vec::new(),
        }
    }
}

impl PubMedConfig {
    /// Sandbox client for esearch: NCBI and loopback plus `allowed_hosts`.
    /// `base_url` must resolve to an allowed host.
    pub fn http_client(&self) -> anyhow::Result<SandboxClient> {
        let mut client = SandboxClient::with_timeout(Duration::from_secs(self.timeout_secs))?;
        for host in &self.allowed_hosts {
            client.allow_domain(host);
        }
        if !client.is_allowed(&self.base_url) {
            anyhow::bail!(
                "pubmed.base_url {} is outside the allowlist; add its host to pubmed.allowed_hosts",
                self.base_url
            );
        }
        Ok(client)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// 0 retries forever.
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

fn default_retry_delay_secs() -> u64 { 1000 }

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 0, retry_delay_secs: default_retry_delay_secs() }
    }
}


impl Config {
    /// Load configuration.
    /// An explicit path must exist; the default `multiomics.toml` is optional.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => match std::env::var("MULTIOMICS_CONFIG") {
                Ok(p) => (PathBuf::from(p), true),
                Err(_) => (PathBuf::from("multiomics.toml"), false),
            },
        };

        if !path.exists() {
            if required {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.pubmed.retmax == 0 {
            anyhow::bail!("pubmed.retmax must be positive");
        }
        if config.pubmed.timeout_secs == 0 {
            anyhow::bail!("pubmed.timeout_secs must be positive");
        }
        Ok(config)
    }

    /// API key precedence: command line, then config file, then MULTIOMICS_API_KEY.
    pub fn resolve_api_key(&self, from_cli: Option<String>) -> Option<String> {
        from_cli
            .filter(|k| !k.is_empty())
            .or_else(|| Some(self.pubmed.api_key.clone()).filter(|k| !k.is_empty()))
            .or_else(|| std::env::var("MULTIOMICS_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}
