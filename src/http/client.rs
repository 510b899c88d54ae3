use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, HeaderValue};
use tracing::debug;

use crate::environment::Variables;
use crate::error::CheckError;

use super::request::RequestSpec;
use super::response::HttpResponse;

/// HTTP client bound to the API under test.
///
/// Every call carries the same timeout; an elapsed timeout surfaces as a
/// [`CheckError::Network`] for that call only.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `request` against the base URL.
    ///
    /// Placeholders are interpolated per path segment, so a captured value
    /// is percent-encoded and always stays inside its own segment.
    pub fn url_for(&self, request: &RequestSpec, vars: &Variables) -> Result<reqwest::Url, CheckError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| CheckError::Network(format!("Invalid URL `{}`: {e}", self.base_url)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| CheckError::Network(format!("Invalid URL `{}`: cannot be a base", self.base_url)))?;
            segments.pop_if_empty();
            for segment in request.path.split('/').skip(1) {
                segments.push(&vars.interpolate(segment));
            }
        }

        if !request.query.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                query_pairs.append_pair(key, &vars.interpolate(value));
            }
        }

        Ok(url)
    }

    pub async fn send(&self, request: &RequestSpec, vars: &Variables) -> Result<HttpResponse, CheckError> {
        let url = self.url_for(request, vars)?;
        debug!(method = %request.method, %url, "dispatching request");

        let mut req_builder = self
            .client
            .request(request.method.into(), url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(body) = &request.body {
            req_builder = req_builder.json(&vars.interpolate_json(body));
        }

        let started = Instant::now();
        let response = req_builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let duration_ms = started.elapsed().as_millis() as u64;

        debug!(%url, status, duration_ms, "response received");

        Ok(HttpResponse {
            status,
            duration_ms,
            size_bytes: bytes.len(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
