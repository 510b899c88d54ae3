use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";
pub const DEFAULT_FALLBACK_PATIENT_ID: &str = "patient-001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const PROBE_TIMEOUT_SECS: u64 = 10;

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub fallback_patient_id: String,
}

impl HarnessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fallback_patient_id: DEFAULT_FALLBACK_PATIENT_ID.to_string(),
        }
    }
}
