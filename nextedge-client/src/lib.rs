//! NextEdge Smoke-Test Client
//!
//! A small HTTP client that confirms a deployed endpoint answers with a
//! success status. Used by the `verify` command after a stage deploys.
//!
//! # Example
//!
//! ```no_run
//! use nextedge_client::SmokeClient;
//!
//! #[tokio::main]
//! async fn main() -> nextedge_client::Result<()> {
//!     let client = SmokeClient::new()?;
//!     let report = client.check("app.example.com").await?;
//!     println!("{} answered {}", report.url, report.status);
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ClientError, Result};

use reqwest::Client;
use std::time::Duration;

/// Request timeout applied by [`SmokeClient::new`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of a successful check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeReport {
    pub url: String,
    pub status: u16,
}

/// HTTP client for post-deploy endpoint checks
#[derive(Debug, Clone)]
pub struct SmokeClient {
    client: Client,
}

impl SmokeClient {
    /// Create a client with [`DEFAULT_TIMEOUT`]
    ///
    /// Fails if the HTTP client cannot be initialised (e.g. no TLS backend).
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Create a client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Check that `target` answers a GET with a 2xx status
    ///
    /// A bare domain is checked over https. Redirects are followed by the
    /// underlying client.
    pub async fn check(&self, target: &str) -> Result<SmokeReport> {
        let url = endpoint_url(target)?;
        tracing::info!("Checking {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!("{} responded with {}", url, status);
            return Err(ClientError::unhealthy(url, status.as_u16()));
        }

        Ok(SmokeReport {
            url,
            status: status.as_u16(),
        })
    }
}

/// Turn a domain or URL into the URL to check
///
/// `app.example.com` becomes `https://app.example.com`; explicit `http://`
/// and `https://` URLs are kept. Trailing slashes are trimmed.
pub fn endpoint_url(target: &str) -> Result<String> {
    let target = target.trim().trim_end_matches('/');
    if target.is_empty() {
        return Err(ClientError::InvalidTarget("empty domain".to_string()));
    }
    if target.contains(char::is_whitespace) {
        return Err(ClientError::InvalidTarget(target.to_string()));
    }

    if target.starts_with("https://") || target.starts_with("http://") {
        Ok(target.to_string())
    } else {
        Ok(format!("https://{}", target))
    }
}
