//! Sequential conformance checks for the CareOrbit HTTP API.
//!
//! [`run`] drives the fixed suite against a base URL and returns the
//! [`RunReport`]; [`probe`] dumps raw responses from a handful of endpoints.

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod http;
pub mod suite;
pub mod testing;

use anyhow::Context;

use config::HarnessConfig;
use environment::Variables;
use http::client::ApiClient;
use testing::RunReport;
use testing::probe::{ProbeResult, run_probes};
use testing::runner::{Reporter, run_cases};

pub async fn run(config: &HarnessConfig, reporter: &mut dyn Reporter) -> anyhow::Result<RunReport> {
    let client = ApiClient::new(&config.base_url, config.timeout).context("failed to build HTTP client")?;
    let cases = suite::conformance_suite(&config.fallback_patient_id);
    let mut vars = Variables::new();

    run_cases(&client, &cases, &mut vars, reporter)
        .await
        .context("failed to write report")
}

pub async fn probe(config: &HarnessConfig) -> anyhow::Result<Vec<ProbeResult>> {
    let client = ApiClient::new(&config.base_url, config.timeout).context("failed to build HTTP client")?;
    let mut vars = Variables::new();
    vars.set(suite::PATIENT_ID, config.fallback_patient_id.as_str());
    Ok(run_probes(&client, &suite::probes(&config.fallback_patient_id), &vars).await)
}
