//! Raw endpoint probing: print what came back, judge nothing.

use serde::Serialize;
use tracing::debug;

use crate::environment::Variables;
use crate::http::client::ApiClient;
use crate::http::request::RequestSpec;

#[derive(Debug, Clone)]
pub struct Probe {
    pub label: String,
    pub request: RequestSpec,
    pub preview_chars: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub label: String,
    pub status: Option<u16>,
    pub preview: Option<String>,
    pub size_bytes: Option<usize>,
    pub duration_ms: Option<u64>,
    pub error: Option<String>,
}

/// Send every probe in order. Failures are captured, never propagated.
pub async fn run_probes(client: &ApiClient, probes: &[Probe], vars: &Variables) -> Vec<ProbeResult> {
    let mut results = Vec::with_capacity(probes.len());

    for probe in probes {
        let result = match client.send(&probe.request, vars).await {
            Ok(response) => ProbeResult {
                label: probe.label.clone(),
                status: Some(response.status),
                preview: Some(response.preview(probe.preview_chars)),
                size_bytes: Some(response.size_bytes),
                duration_ms: Some(response.duration_ms),
                error: None,
            },
            Err(err) => ProbeResult {
                label: probe.label.clone(),
                status: None,
                preview: None,
                size_bytes: None,
                duration_ms: None,
                error: Some(err.describe()),
            },
        };
        debug!(probe = %result.label, status = ?result.status, "probe finished");
        results.push(result);
    }

    results
}
