//! # Command Line
//!
//! `careorbit-check [BASE_URL]` runs the conformance suite and exits 0 when
//! every case passed, 1 otherwise. Flags only refine that behaviour.

pub mod json;
pub mod text;

use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::Level;

use crate::config::{
    DEFAULT_BASE_URL, DEFAULT_FALLBACK_PATIENT_ID, DEFAULT_TIMEOUT_SECS, HarnessConfig,
    PROBE_TIMEOUT_SECS,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "careorbit-check", version, about = "Conformance checks for the CareOrbit API")]
pub struct CliArgs {
    /// Base URL of the API under test.
    #[arg(default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds (30 for the suite, 10 for --probe).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout: Option<u64>,

    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Dump raw responses from a few endpoints instead of running the suite.
    #[arg(long)]
    pub probe: bool,

    /// Patient id used when the patient listing cannot provide one.
    #[arg(long, default_value = DEFAULT_FALLBACK_PATIENT_ID)]
    pub fallback_patient: String,

    /// Log to stderr (errors only by default); repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Text
    }
}

impl CliArgs {
    pub fn harness_config(&self) -> HarnessConfig {
        let default_secs = if self.probe { PROBE_TIMEOUT_SECS } else { DEFAULT_TIMEOUT_SECS };
        HarnessConfig {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.timeout.unwrap_or(default_secs)),
            fallback_patient_id: self.fallback_patient.clone(),
        }
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
