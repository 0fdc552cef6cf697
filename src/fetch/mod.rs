// src/fetch/mod.rs

use crate::config::Config;
use crate::error::{DashboardError, Result};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

/// Build the HTTP client used for the upstream fetch.
pub fn build_client(config: &Config) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .build()
        .map_err(|e| DashboardError::Config(format!("building HTTP client: {}", e)))
}

/// GET `url` once and return the body. No retry: any connection failure,
/// timeout or non-success status is a `Network` error.
#[instrument(level = "info", skip(client, url), fields(url = %url))]
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String> {
    let network = |source| DashboardError::Network {
        url: url.to_string(),
        source,
    };

    let resp = client
        .get(url.clone())
        .send()
        .await
        .map_err(network)?
        .error_for_status()
        .map_err(network)?;
    debug!(status = %resp.status(), "upstream responded");

    let body = resp.text().await.map_err(network)?;
    debug!(bytes = body.len(), "read body");
    Ok(body)
}
