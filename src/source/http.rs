//! HTTP transport for the roster service
//!
//! Wraps a `reqwest::Client` configured from [`ApiConfig`]. Non-2xx
//! responses become [`DashboardError::Server`] carrying the server's
//! `detail`/`message` text when one is present; transport failures become
//! [`DashboardError::Network`] or [`DashboardError::Timeout`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{server_message, ApiRequest, Method, RosterApi};
use crate::config::ApiConfig;
use crate::error::{DashboardError, Result};

/// [`RosterApi`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpDataSource {
    /// Build a client from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DashboardError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Absolute URL of an API path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> DashboardError {
        if err.is_timeout() {
            DashboardError::Timeout(self.timeout)
        } else if err.is_decode() {
            DashboardError::Decode(err.to_string())
        } else {
            DashboardError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl RosterApi for HttpDataSource {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let url = self.url(&request.path);
        tracing::debug!("{} {} {:?}", request.method, url, request.params);

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
        };
        let builder = if request.params.is_empty() {
            builder
        } else {
            builder.query(&request.params)
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|body| server_message(&body))
                .or_else(|| {
                    let text = String::from_utf8_lossy(&bytes).trim().to_string();
                    (!text.is_empty() && text.len() <= 200).then_some(text)
                });
            tracing::warn!("{} {} responded {}", request.method, url, status);
            return Err(DashboardError::Server {
                status: status.as_u16(),
                message,
            });
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| DashboardError::Decode(format!("{} {}: {}", request.method, url, e)))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:8000/".to_string(),
            ..ApiConfig::default()
        };
        let source = HttpDataSource::new(&config).unwrap();
        assert_eq!(source.url("/flights"), "http://127.0.0.1:8000/flights");
        assert_eq!(source.url("approvals"), "http://127.0.0.1:8000/approvals");
        assert_eq!(source.describe(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_unreachable_server_is_network_error() {
        let config = ApiConfig {
            // Port 9 (discard) on localhost is closed in test environments.
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..ApiConfig::default()
        };
        let source = HttpDataSource::new(&config).unwrap();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let err = rt
            .block_on(source.send(ApiRequest::get("/crew-members/")))
            .unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Network(_) | DashboardError::Timeout(_)
        ));
    }
}
