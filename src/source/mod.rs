//! Remote data sources
//!
//! Two layers of traits sit between a list view and the network:
//!
//! - [`RosterApi`] - raw JSON transport for the roster service. Implemented
//!   by [`HttpDataSource`] (reqwest) and [`InMemoryDataSource`] (fixtures,
//!   used for offline demo mode and tests).
//! - [`DataSource`] - typed page access for one resource. Implemented per
//!   resource in [`crate::resources`] on top of a [`RosterApi`].
//!
//! Both are async traits so they can be driven from a tokio runtime and
//! mocked in unit tests.

pub mod http;
pub mod memory;

pub use http::HttpDataSource;
pub use memory::InMemoryDataSource;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{DashboardError, Result};
use crate::list::QueryState;
use crate::types::ResourcePage;

/// HTTP method of an API request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Patch => write!(f, "PATCH"),
        }
    }
}

/// A single request against the roster service
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`
    pub path: String,
    /// Query parameters
    pub params: Vec<(String, String)>,
    /// JSON body for POST/PATCH
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            params: Vec::new(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self {
            method: Method::Patch,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    /// Look up a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Raw JSON transport for the roster service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterApi: Send + Sync {
    /// Send a request and return the decoded JSON body of a 2xx response
    async fn send(&self, request: ApiRequest) -> Result<Value>;

    /// Short description for the status bar ("http://127.0.0.1:8000", "offline demo")
    fn describe(&self) -> String;
}

/// Page access for one resource
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch one page for the given query
    async fn fetch_page(&self, query: &QueryState) -> Result<ResourcePage>;

    /// Run a payload-style query (POST body instead of parameters)
    async fn submit_payload(&self, payload: &Value) -> Result<ResourcePage> {
        let _ = payload;
        Err(DashboardError::Validation(
            "This view does not accept custom payloads".to_string(),
        ))
    }
}

/// Extract the server-provided message of an error body
///
/// FastAPI-style services put it under `detail`, others under `message`.
pub fn server_message(body: &Value) -> Option<String> {
    ["detail", "message", "error"]
        .iter()
        .find_map(|key| match body.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_message_keys() {
        assert_eq!(
            server_message(&json!({ "detail": "Roster creation failed" })).as_deref(),
            Some("Roster creation failed")
        );
        assert_eq!(
            server_message(&json!({ "message": "bad flight" })).as_deref(),
            Some("bad flight")
        );
        assert_eq!(server_message(&json!({ "detail": null })), None);
        assert_eq!(server_message(&json!([1, 2])), None);
    }

    #[test]
    fn test_request_display_and_params() {
        let request = ApiRequest::get("/flights")
            .with_params(vec![("page".to_string(), "2".to_string())]);
        assert_eq!(request.to_string(), "GET /flights");
        assert_eq!(request.param("page"), Some("2"));
        assert_eq!(request.param("limit"), None);
    }
}
