// reqwest-backed fetcher with origin-based response classification

use super::Fetch;
use crate::config::FetchConfig;
use crate::error::{Result, WorkerError};
use crate::models::{Request, Response, StoredType};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Live network fetcher.
///
/// Path-only URLs (`/index.html`) are resolved against the configured base
/// origin before dispatch, the way a worker resolves requests against its
/// own scope.
pub struct HttpFetcher {
    http_client: Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| WorkerError::Internal(format!("failed to create HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| WorkerError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    fn resolve(&self, raw: &str) -> Result<Url> {
        if raw.starts_with('/') {
            self.base_url
                .join(raw)
                .map_err(|e| WorkerError::InvalidUrl(format!("{}: {}", raw, e)))
        } else {
            Url::parse(raw).map_err(|e| WorkerError::InvalidUrl(format!("{}: {}", raw, e)))
        }
    }

    /// Same-origin final URL → `Basic`; anything that ended up on another
    /// origin (cross-origin target or redirect) → `Opaque`.
    fn classify(requested: &Url, final_url: &Url) -> StoredType {
        let same_origin = requested.scheme() == final_url.scheme()
            && requested.host_str() == final_url.host_str()
            && requested.port_or_known_default() == final_url.port_or_known_default();
        if same_origin {
            StoredType::Basic
        } else {
            StoredType::Opaque
        }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        let url = self.resolve(&request.url)?;
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| WorkerError::Internal(format!("bad method: {}", request.method)))?;

        debug!(method = %method, url = %url, "live fetch");

        let response = self.http_client.request(method, url.clone()).send().await?;

        let status = response.status().as_u16();
        let kind = Self::classify(&url, response.url());
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        Ok(Response::new(status, kind, headers, body))
    }
}
