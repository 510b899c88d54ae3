use thiserror::Error;

/// Everything that can go wrong inside a single test case.
///
/// Errors never cross the test case boundary: the runner converts them into a
/// failed [`crate::testing::TestResult`] and moves on.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{0}")]
    Network(String),

    #[error("expected status {expected}, got {actual}")]
    HttpStatus { expected: u16, actual: u16 },

    #[error("{0}")]
    Schema(String),

    #[error("{0}")]
    Assertion(String),
}

impl CheckError {
    pub fn category(&self) -> &'static str {
        match self {
            CheckError::Network(_) => "NetworkError",
            CheckError::HttpStatus { .. } => "HTTPStatusError",
            CheckError::Schema(_) => "SchemaError",
            CheckError::Assertion(_) => "AssertionError",
        }
    }

    /// `"<category>: <message>"`, the form shown in reports.
    pub fn describe(&self) -> String {
        format!("{}: {self}", self.category())
    }
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CheckError::Network(format!("Request timed out: {err}"))
        } else if err.is_decode() {
            CheckError::Schema(format!("Failed to decode response: {err}"))
        } else {
            CheckError::Network(format!("Request failed: {err}"))
        }
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(err: serde_json::Error) -> Self {
        CheckError::Schema(format!("Malformed JSON body: {err}"))
    }
}
