//! # Conformance Testing
//!
//! Test cases pair one HTTP request with a validation step over the
//! response. The [`runner`] executes them strictly in declaration order and
//! folds each outcome into a [`RunReport`].

pub mod expect;
pub mod probe;
pub mod runner;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::CheckError;
use crate::http::request::RequestSpec;
use crate::http::response::HttpResponse;

/// Validation over a response whose status already matched.
pub type Check = fn(&HttpResponse) -> Result<Outcome, CheckError>;

/// What a passing check reports back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub summary: String,
    pub details: Vec<String>,
    /// Variables bound for later cases, applied only when the case passes.
    pub captures: Vec<(String, String)>,
}

impl Outcome {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    pub fn detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }

    pub fn capture(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.captures.push((key.into(), value.into()));
        self
    }
}

/// One declared step of the suite.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub request: RequestSpec,
    pub expected_status: u16,
    pub check: Check,
    /// Bound when the case fails and the variable is still unset, so that
    /// dependent cases can run anyway.
    pub fallback: Option<(String, String)>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, request: RequestSpec, check: Check) -> Self {
        Self {
            name: name.into(),
            request,
            expected_status: 200,
            check,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fallback = Some((key.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    /// Summary line on success, `"<category>: <message>"` on failure.
    pub detail: String,
    pub details: Vec<String>,
    pub error_category: Option<&'static str>,
    pub duration_ms: u64,
}

impl TestResult {
    pub fn pass(name: &str, outcome: &Outcome, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            detail: outcome.summary.clone(),
            details: outcome.details.clone(),
            error_category: None,
            duration_ms,
        }
    }

    pub fn fail(name: &str, error: &CheckError, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            detail: error.describe(),
            details: Vec::new(),
            error_category: Some(error.category()),
            duration_ms,
        }
    }
}

/// Ordered results of one run plus aggregate counts.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub base_url: String,
    pub started_at: DateTime<Local>,
    pub duration_ms: u64,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<TestResult>,
}

impl RunReport {
    pub fn new(base_url: impl Into<String>, started_at: DateTime<Local>) -> Self {
        Self {
            base_url: base_url.into(),
            started_at,
            duration_ms: 0,
            total: 0,
            passed: 0,
            failed: 0,
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, result: TestResult) {
        if result.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.total += 1;
        self.results.push(result);
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn exit_code(&self) -> u8 {
        if self.all_passed() { 0 } else { 1 }
    }
}
