use serde_json::Value;

use crate::error::CheckError;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub duration_ms: u64,
    pub size_bytes: usize,
    pub body: String,
}

impl HttpResponse {
    pub fn json(&self) -> Result<Value, CheckError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Body cut to at most `max_chars` characters.
    pub fn preview(&self, max_chars: usize) -> String {
        truncate_chars(&self.body, max_chars)
    }
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
