use std::io::{self, Write};

use chrono::{DateTime, Local, SecondsFormat};

use crate::testing::probe::ProbeResult;
use crate::testing::runner::Reporter;
use crate::testing::{RunReport, TestCase, TestResult};

const RULE_WIDTH: usize = 60;
const PROBE_RULE_WIDTH: usize = 50;

/// Human-readable console report, printed as the run progresses.
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn run_started(&mut self, base_url: &str, started_at: DateTime<Local>) -> io::Result<()> {
        self.rule()?;
        writeln!(self.out, "CareOrbit API Test Suite")?;
        self.rule()?;
        writeln!(self.out, "Testing: {base_url}")?;
        writeln!(self.out, "Time: {}", started_at.to_rfc3339_opts(SecondsFormat::Secs, false))?;
        self.rule()
    }

    fn case_started(&mut self, index: usize, case: &TestCase) -> io::Result<()> {
        writeln!(self.out, "\n[TEST {}] {}", index + 1, case.name)?;
        self.out.flush()
    }

    fn case_finished(&mut self, _index: usize, result: &TestResult) -> io::Result<()> {
        if result.passed {
            writeln!(self.out, "  ✅ PASSED - {}", result.detail)?;
            for line in &result.details {
                writeln!(self.out, "     {line}")?;
            }
        } else {
            writeln!(self.out, "  ❌ FAILED - {}", result.detail)?;
        }
        Ok(())
    }

    fn run_finished(&mut self, report: &RunReport) -> io::Result<()> {
        writeln!(self.out)?;
        self.rule()?;
        writeln!(self.out, "TEST SUMMARY")?;
        self.rule()?;
        writeln!(self.out, "  Passed: {}", report.passed)?;
        writeln!(self.out, "  Failed: {}", report.failed)?;
        writeln!(self.out, "  Total:  {}", report.total)?;
        self.rule()?;

        if report.all_passed() {
            writeln!(self.out, "\n🎉 All tests passed! Your CareOrbit API is working correctly.")?;
        } else {
            writeln!(
                self.out,
                "\n⚠️  {} test(s) failed. Please check your configuration.",
                report.failed
            )?;
        }
        self.out.flush()
    }
}

pub fn write_probe_report<W: Write>(out: &mut W, base_url: &str, results: &[ProbeResult]) -> io::Result<()> {
    writeln!(out, "Testing CareOrbit API...")?;
    writeln!(out, "URL: {base_url}")?;
    writeln!(out, "{}", "-".repeat(PROBE_RULE_WIDTH))?;

    for (index, result) in results.iter().enumerate() {
        writeln!(out, "\n[{}] Testing {}", index + 1, result.label)?;
        match (&result.status, &result.error) {
            (Some(status), _) => {
                writeln!(out, "    Status: {status}")?;
                writeln!(out, "    Response: {}", result.preview.as_deref().unwrap_or_default())?;
                if let (Some(size), Some(ms)) = (result.size_bytes, result.duration_ms) {
                    writeln!(out, "    Size: {size} bytes in {ms} ms")?;
                }
            }
            (None, Some(error)) => writeln!(out, "    ERROR: {error}")?,
            (None, None) => writeln!(out, "    ERROR: no response")?,
        }
    }

    writeln!(out, "\n{}", "-".repeat(PROBE_RULE_WIDTH))?;
    writeln!(out, "Debug test complete!")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckError;
    use crate::testing::Outcome;

    fn render(results: Vec<TestResult>) -> String {
        let mut report = RunReport::new("http://localhost:8001", Local::now());
        let mut reporter = TextReporter::new(Vec::new());
        for (index, result) in results.into_iter().enumerate() {
            reporter.case_finished(index, &result).unwrap();
            report.record(result);
        }
        reporter.run_finished(&report).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn passed_case_prints_details() {
        let outcome = Outcome::new("Status: healthy").detail("Agents: [a]");
        let out = render(vec![TestResult::pass("Health Check", &outcome, 4)]);
        assert!(out.contains("  ✅ PASSED - Status: healthy\n     Agents: [a]\n"));
        assert!(out.contains("  Passed: 1\n  Failed: 0\n  Total:  1\n"));
        assert!(out.contains("🎉 All tests passed!"));
    }

    #[test]
    fn failed_case_prints_category() {
        let err = CheckError::HttpStatus {
            expected: 200,
            actual: 404,
        };
        let out = render(vec![TestResult::fail("Get Patients", &err, 4)]);
        assert!(out.contains("  ❌ FAILED - HTTPStatusError: expected status 200, got 404\n"));
        assert!(out.contains("⚠️  1 test(s) failed."));
    }

    #[test]
    fn probe_report_shows_status_or_error() {
        let results = vec![
            ProbeResult {
                label: "/api/health".into(),
                status: Some(200),
                preview: Some("{\"status\":\"healthy\"}".into()),
                size_bytes: Some(20),
                duration_ms: Some(7),
                error: None,
            },
            ProbeResult {
                label: "/api/patients".into(),
                status: None,
                preview: None,
                size_bytes: None,
                duration_ms: None,
                error: Some("NetworkError: Request failed".into()),
            },
        ];
        let mut out = Vec::new();
        write_probe_report(&mut out, "http://localhost:8001", &results).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("[1] Testing /api/health\n    Status: 200\n    Response: {\"status\":\"healthy\"}\n    Size: 20 bytes in 7 ms\n"));
        assert!(out.contains("[2] Testing /api/patients\n    ERROR: NetworkError: Request failed\n"));
        assert!(out.ends_with("Debug test complete!\n"));
    }
}
