//! # CareOrbit Suite
//!
//! The fixed, ordered list of conformance checks against the CareOrbit API,
//! plus the raw probe list used by `--probe`.
//!
//! Checks validate a minimal contract: the fields listed per endpoint must be
//! present with the right JSON type. Extra fields are ignored.

use serde_json::{Value, json};
use tracing::warn;

use crate::error::CheckError;
use crate::http::request::RequestSpec;
use crate::http::response::{HttpResponse, truncate_chars};
use crate::testing::expect::{
    array, array_field, each_has_str_fields, equals, field, non_empty, object_field, optional_array,
    str_field, text,
};
use crate::testing::probe::Probe;
use crate::testing::{Outcome, TestCase};

pub const PATIENT_ID: &str = "patient_id";

const LISTED_ITEMS: usize = 3;
const ROOT_PREVIEW_CHARS: usize = 200;
const CHAT_PREVIEW_CHARS: usize = 100;
const KNOWN_SEVERITIES: [&str; 4] = ["low", "medium", "high", "critical"];

const MEDICATIONS_QUESTION: &str = "What medications am I taking?";
const CARE_GAPS_QUESTION: &str = "What care gaps need attention?";

pub fn conformance_suite(fallback_patient_id: &str) -> Vec<TestCase> {
    vec![
        TestCase::new("Root Endpoint", RequestSpec::get("/"), check_root),
        TestCase::new("Health Check", RequestSpec::get("/api/health"), check_health),
        TestCase::new("Get Patients", RequestSpec::get("/api/patients"), check_patients)
            .with_fallback(PATIENT_ID, fallback_patient_id),
        TestCase::new(
            "Get Patient Summary",
            RequestSpec::get("/api/patients/{{patient_id}}/summary"),
            check_summary,
        ),
        TestCase::new(
            "Get Medications",
            RequestSpec::get("/api/patients/{{patient_id}}/medications").query("active_only", "true"),
            check_medications,
        ),
        TestCase::new(
            "Get Appointments",
            RequestSpec::get("/api/patients/{{patient_id}}/appointments").query("upcoming_only", "true"),
            check_appointments,
        ),
        TestCase::new(
            "Get Care Gaps",
            RequestSpec::get("/api/patients/{{patient_id}}/care-gaps"),
            check_care_gaps,
        ),
        TestCase::new(
            "Chat with AI Agents",
            RequestSpec::post("/api/chat", chat_body(MEDICATIONS_QUESTION)),
            check_chat,
        ),
        TestCase::new(
            "Chat about Care Gaps",
            RequestSpec::post("/api/chat", chat_body(CARE_GAPS_QUESTION)),
            check_care_gap_chat,
        ),
    ]
}

/// Raw probes. The summary probe reads `patient_id` from the run variables.
pub fn probes(patient_id: &str) -> Vec<Probe> {
    vec![
        probe("root endpoint /", RequestSpec::get("/"), 200),
        probe("/api/health", RequestSpec::get("/api/health"), 200),
        probe("/api/patients", RequestSpec::get("/api/patients"), 300),
        probe(
            &format!("/api/patients/{patient_id}/summary"),
            RequestSpec::get("/api/patients/{{patient_id}}/summary"),
            300,
        ),
    ]
}

fn probe(label: &str, request: RequestSpec, preview_chars: usize) -> Probe {
    Probe {
        label: label.to_string(),
        request,
        preview_chars,
    }
}

fn chat_body(message: &str) -> Value {
    json!({
        "patient_id": "{{patient_id}}",
        "message": message,
    })
}

fn check_root(response: &HttpResponse) -> Result<Outcome, CheckError> {
    Ok(Outcome::new(format!("Status: {}", response.status))
        .detail(format!("Response: {}", response.preview(ROOT_PREVIEW_CHARS))))
}

fn check_health(response: &HttpResponse) -> Result<Outcome, CheckError> {
    let data = response.json()?;
    let status = str_field(&data, "status")?;
    equals(status, "healthy", "status")?;
    let agents: Vec<&str> = object_field(&data, "agents")?.keys().map(String::as_str).collect();

    Ok(Outcome::new(format!("Status: {status}")).detail(format!("Agents: [{}]", agents.join(", "))))
}

fn check_patients(response: &HttpResponse) -> Result<Outcome, CheckError> {
    let data = response.json()?;
    let patients = array(&data, "patient list")?;
    non_empty(patients, "patient")?;
    each_has_str_fields(patients, &["id", "first_name", "last_name"], "patients")?;

    let first = &patients[0];
    let id = str_field(first, "id")?;
    let full_name = format!("{} {}", str_field(first, "first_name")?, str_field(first, "last_name")?);

    Ok(Outcome::new(format!("Found {} patient(s)", patients.len()))
        .detail(format!("Demo Patient: {full_name}"))
        .capture(PATIENT_ID, id))
}

fn check_summary(response: &HttpResponse) -> Result<Outcome, CheckError> {
    let data = response.json()?;
    let status = text(field(&data, "overall_status")?);
    let conditions = array_field(&data, "active_conditions")?;
    let medications = text(field(&data, "active_medications")?);
    let appointments = text(field(&data, "upcoming_appointments")?);
    let care_gaps = text(field(&data, "open_care_gaps")?);

    Ok(Outcome::new(format!("Status: {status}"))
        .detail(format!("Conditions: {}", conditions.len()))
        .detail(format!("Medications: {medications}"))
        .detail(format!("Appointments: {appointments}"))
        .detail(format!("Care Gaps: {care_gaps}")))
}

fn check_medications(response: &HttpResponse) -> Result<Outcome, CheckError> {
    let data = response.json()?;
    let medications = array(&data, "medication list")?;
    each_has_str_fields(medications, &["name", "dosage", "prescriber"], "medications")?;

    let mut outcome = Outcome::new(format!("Found {} active medication(s)", medications.len()));
    for med in medications.iter().take(LISTED_ITEMS) {
        outcome = outcome.detail(format!(
            "- {} ({}) by {}",
            str_field(med, "name")?,
            str_field(med, "dosage")?,
            str_field(med, "prescriber")?
        ));
    }
    Ok(outcome)
}

fn check_appointments(response: &HttpResponse) -> Result<Outcome, CheckError> {
    let data = response.json()?;
    let appointments = array(&data, "appointment list")?;
    each_has_str_fields(appointments, &["provider_name", "specialty"], "appointments")?;

    let mut outcome = Outcome::new(format!("Found {} upcoming appointment(s)", appointments.len()));
    for apt in appointments.iter().take(LISTED_ITEMS) {
        outcome = outcome.detail(format!(
            "- {} ({})",
            str_field(apt, "provider_name")?,
            str_field(apt, "specialty")?
        ));
    }
    Ok(outcome)
}

fn check_care_gaps(response: &HttpResponse) -> Result<Outcome, CheckError> {
    let data = response.json()?;
    let gaps = array(&data, "care gap list")?;
    each_has_str_fields(gaps, &["severity", "title"], "care_gaps")?;

    for gap in gaps {
        let severity = str_field(gap, "severity")?;
        if !KNOWN_SEVERITIES.contains(&severity.to_lowercase().as_str()) {
            let title = str_field(gap, "title")?;
            warn!(%severity, %title, "unrecognised care gap severity");
        }
    }

    let mut outcome = Outcome::new(format!("Found {} care gap(s)", gaps.len()));
    for gap in gaps.iter().take(LISTED_ITEMS) {
        outcome = outcome.detail(format!(
            "- [{}] {}",
            str_field(gap, "severity")?.to_uppercase(),
            str_field(gap, "title")?
        ));
    }
    Ok(outcome)
}

fn check_chat(response: &HttpResponse) -> Result<Outcome, CheckError> {
    let data = response.json()?;
    let primary = str_field(&data, "primary_response")?;
    let contributions = array_field(&data, "agent_contributions")?;
    each_has_str_fields(contributions, &["agent_name"], "agent_contributions")?;
    optional_array(&data, "care_gaps_detected")?;

    let agents = contributions
        .iter()
        .map(|c| str_field(c, "agent_name"))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Outcome::new("Received response from agents")
        .detail(format!("Agents involved: [{}]", agents.join(", ")))
        .detail(format!(
            "Response preview: {}...",
            truncate_chars(primary, CHAT_PREVIEW_CHARS)
        )))
}

fn check_care_gap_chat(response: &HttpResponse) -> Result<Outcome, CheckError> {
    let data = response.json()?;
    if !data.is_object() {
        return Err(CheckError::Schema("expected chat response to be a JSON object".into()));
    }
    let detected = optional_array(&data, "care_gaps_detected")?;

    Ok(Outcome::new("Care gap query successful")
        .detail(format!("Care gaps mentioned: {}", detected.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: Value) -> HttpResponse {
        let body = body.to_string();
        HttpResponse {
            status: 200,
            duration_ms: 0,
            size_bytes: body.len(),
            body,
        }
    }

    #[test]
    fn suite_order_is_fixed() {
        let names: Vec<String> = conformance_suite("patient-001").into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            [
                "Root Endpoint",
                "Health Check",
                "Get Patients",
                "Get Patient Summary",
                "Get Medications",
                "Get Appointments",
                "Get Care Gaps",
                "Chat with AI Agents",
                "Chat about Care Gaps",
            ]
        );
    }

    #[test]
    fn only_patient_listing_has_fallback() {
        let suite = conformance_suite("patient-xyz");
        let with_fallback: Vec<_> = suite.iter().filter(|c| c.fallback.is_some()).collect();
        assert_eq!(with_fallback.len(), 1);
        assert_eq!(
            with_fallback[0].fallback,
            Some((PATIENT_ID.to_string(), "patient-xyz".to_string()))
        );
    }

    #[test]
    fn chat_body_uses_patient_placeholder() {
        let body = chat_body("hello");
        assert_eq!(body["patient_id"], "{{patient_id}}");
        assert_eq!(body["message"], "hello");
    }

    #[test]
    fn health_lists_agent_keys() {
        let outcome = check_health(&ok(json!({"status": "healthy", "agents": {"a": 1}}))).unwrap();
        assert_eq!(outcome.summary, "Status: healthy");
        assert_eq!(outcome.details, vec!["Agents: [a]".to_string()]);
    }

    #[test]
    fn health_rejects_degraded() {
        let err = check_health(&ok(json!({"status": "degraded", "agents": {}}))).unwrap_err();
        assert_eq!(err.category(), "AssertionError");
    }

    #[test]
    fn patients_capture_first_id() {
        let outcome = check_patients(&ok(json!([
            {"id": "patient-001", "first_name": "Jane", "last_name": "Doe"},
            {"id": "patient-002", "first_name": "John", "last_name": "Roe"},
        ])))
        .unwrap();
        assert_eq!(outcome.summary, "Found 2 patient(s)");
        assert_eq!(outcome.details, vec!["Demo Patient: Jane Doe".to_string()]);
        assert_eq!(
            outcome.captures,
            vec![(PATIENT_ID.to_string(), "patient-001".to_string())]
        );
    }

    #[test]
    fn empty_patient_list_fails() {
        let err = check_patients(&ok(json!([]))).unwrap_err();
        assert_eq!(err.category(), "AssertionError");
    }

    #[test]
    fn summary_requires_conditions_array() {
        let err = check_summary(&ok(json!({
            "overall_status": "stable",
            "active_conditions": "none",
            "active_medications": 2,
            "upcoming_appointments": 1,
            "open_care_gaps": 0,
        })))
        .unwrap_err();
        assert_eq!(err.describe(), "SchemaError: field `active_conditions` is not an array");
    }

    #[test]
    fn medications_list_at_most_three() {
        let meds: Vec<Value> = (0..5)
            .map(|i| json!({"name": format!("med{i}"), "dosage": "10mg", "prescriber": "Dr. A"}))
            .collect();
        let outcome = check_medications(&ok(Value::Array(meds))).unwrap();
        assert_eq!(outcome.summary, "Found 5 active medication(s)");
        assert_eq!(outcome.details.len(), 3);
        assert_eq!(outcome.details[0], "- med0 (10mg) by Dr. A");
    }

    #[test]
    fn care_gaps_uppercase_severity() {
        let outcome = check_care_gaps(&ok(json!([
            {"severity": "high", "title": "Overdue A1C"},
            {"severity": "moderate", "title": "Eye exam"},
        ])))
        .unwrap();
        assert_eq!(outcome.details[0], "- [HIGH] Overdue A1C");
        assert_eq!(outcome.details[1], "- [MODERATE] Eye exam");
    }

    #[test]
    fn chat_without_care_gaps_field_passes() {
        let outcome = check_chat(&ok(json!({
            "primary_response": "You take metformin.",
            "agent_contributions": [{"agent_name": "x"}],
        })))
        .unwrap();
        assert_eq!(outcome.details[0], "Agents involved: [x]");
        assert_eq!(outcome.details[1], "Response preview: You take metformin....");
    }

    #[test]
    fn chat_requires_agent_names() {
        let err = check_chat(&ok(json!({
            "primary_response": "hi",
            "agent_contributions": [{"name": "x"}],
        })))
        .unwrap_err();
        assert_eq!(err.category(), "SchemaError");
    }

    #[test]
    fn care_gap_chat_counts_detected() {
        let outcome = check_care_gap_chat(&ok(json!({
            "primary_response": "...",
            "care_gaps_detected": [{"title": "a"}, {"title": "b"}],
        })))
        .unwrap();
        assert_eq!(outcome.details, vec!["Care gaps mentioned: 2".to_string()]);

        let outcome = check_care_gap_chat(&ok(json!({"primary_response": "..."}))).unwrap();
        assert_eq!(outcome.details, vec!["Care gaps mentioned: 0".to_string()]);
    }

    #[test]
    fn probes_use_given_patient() {
        let probes = probes("patient-009");
        assert_eq!(probes.len(), 4);
        assert_eq!(probes[3].label, "/api/patients/patient-009/summary");
        assert_eq!(probes[3].request.path, "/api/patients/{{patient_id}}/summary");
        assert_eq!(probes[3].preview_chars, 300);
    }
}
