use std::io;
use std::time::Instant;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::environment::Variables;
use crate::error::CheckError;
use crate::http::client::ApiClient;

use super::{Outcome, RunReport, TestCase, TestResult};

/// Receives progress as the run advances.
///
/// An I/O error from a reporter is the only thing that stops a run early.
pub trait Reporter {
    fn run_started(&mut self, _base_url: &str, _started_at: DateTime<Local>) -> io::Result<()> {
        Ok(())
    }

    fn case_started(&mut self, _index: usize, _case: &TestCase) -> io::Result<()> {
        Ok(())
    }

    fn case_finished(&mut self, _index: usize, _result: &TestResult) -> io::Result<()> {
        Ok(())
    }

    fn run_finished(&mut self, _report: &RunReport) -> io::Result<()> {
        Ok(())
    }
}

/// Reporter that prints nothing.
#[derive(Debug, Default)]
pub struct Silent;

impl Reporter for Silent {}

/// Execute `cases` one at a time, in order, against `client`.
///
/// Exactly one [`TestResult`] is recorded per case. A failing case never
/// prevents the following ones from executing.
pub async fn run_cases(
    client: &ApiClient,
    cases: &[TestCase],
    vars: &mut Variables,
    reporter: &mut dyn Reporter,
) -> io::Result<RunReport> {
    let started_at = Local::now();
    let started = Instant::now();
    let mut report = RunReport::new(client.base_url(), started_at);
    reporter.run_started(client.base_url(), started_at)?;

    for (index, case) in cases.iter().enumerate() {
        reporter.case_started(index, case)?;
        debug!(case = %case.name, "case started");

        let case_started = Instant::now();
        let outcome = execute(client, case, vars).await;
        let elapsed = case_started.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(outcome) => {
                for (key, value) in &outcome.captures {
                    debug!(%key, %value, "captured variable");
                    vars.set(key.clone(), value.clone());
                }
                TestResult::pass(&case.name, &outcome, elapsed)
            }
            Err(err) => {
                if let Some((key, value)) = &case.fallback {
                    if !vars.contains(key) {
                        warn!(case = %case.name, %key, %value, "case failed, binding fallback value");
                        vars.set(key.clone(), value.clone());
                    }
                }
                TestResult::fail(&case.name, &err, elapsed)
            }
        };

        info!(case = %result.name, passed = result.passed, elapsed_ms = elapsed, "case finished");
        reporter.case_finished(index, &result)?;
        report.record(result);
    }

    report.duration_ms = started.elapsed().as_millis() as u64;
    reporter.run_finished(&report)?;
    Ok(report)
}

async fn execute(client: &ApiClient, case: &TestCase, vars: &Variables) -> Result<Outcome, CheckError> {
    let response = client.send(&case.request, vars).await?;
    if response.status != case.expected_status {
        return Err(CheckError::HttpStatus {
            expected: case.expected_status,
            actual: response.status,
        });
    }
    (case.check)(&response)
}
