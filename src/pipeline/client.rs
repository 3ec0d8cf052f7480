//! Service call: one POST, one envelope, one error channel.
//!
//! Every transport failure — DNS, refused connection, timeout, non-2xx
//! status, unparseable body — surfaces as [`DocLensError::ServiceCall`];
//! callers never see raw `reqwest` errors. A well-formed envelope with a
//! non-zero `errorCode` surfaces as [`DocLensError::Service`]. Nothing is
//! retried: one failed attempt is terminal for that request.
//!
//! ## Diagnostic mode
//!
//! With `settings.debug` the outbound payload and inbound response are
//! logged at DEBUG level. Base64 runs make those dumps unreadable, so any
//! base64 field longer than 200 chars is reduced to a head/tail preview and
//! the response dump is capped at 8000 chars. Redaction only touches what
//! is logged, never the returned value.

use crate::config::Settings;
use crate::error::DocLensError;
use crate::pipeline::payload::RequestPayload;
use crate::response::ResponseEnvelope;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// POST the payload to the configured endpoint and unwrap the envelope.
///
/// Headers always include `Content-Type: application/json`; when an API key
/// is configured the request also carries `Authorization: Bearer <key>`.
pub async fn submit(
    payload: &RequestPayload,
    settings: &Settings,
) -> Result<ResponseEnvelope, DocLensError> {
    if settings.debug {
        debug!("API request payload:\n{}", render_payload_preview(payload));
    }

    info!("Sending API request to {}", settings.api_url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.api_timeout_secs))
        .build()
        .map_err(|e| DocLensError::ServiceCall {
            reason: e.to_string(),
        })?;

    let mut request = client.post(&settings.api_url).json(payload);
    if let Some(key) = settings.bearer_token() {
        request = request.bearer_auth(key);
    }

    let response = request.send().await.map_err(|e| DocLensError::ServiceCall {
        reason: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DocLensError::ServiceCall {
            reason: format!("HTTP {status}"),
        });
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| DocLensError::ServiceCall {
            reason: e.to_string(),
        })?;

    if settings.debug {
        debug!("API response:\n{}", render_response_preview(&body));
    }

    let envelope: ResponseEnvelope =
        serde_json::from_value(body).map_err(|e| DocLensError::ServiceCall {
            reason: format!("unexpected response shape: {e}"),
        })?;

    if envelope.error_code != 0 {
        let message = envelope
            .error_msg
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(DocLensError::Service { message });
    }

    Ok(envelope)
}

// ── Diagnostic rendering ─────────────────────────────────────────────────

/// Quoted base64 runs of 200+ chars inside a serialised JSON response.
static RE_BASE64_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[A-Za-z0-9+/]{200,}={0,2}""#).unwrap());

const RESPONSE_PREVIEW_CAP: usize = 8000;

/// Head/tail preview of a long string: first 100 + last 50 chars plus the
/// total character count.
fn truncate_middle(s: &str) -> String {
    let total = s.chars().count();
    let head: String = s.chars().take(100).collect();
    let tail: String = s.chars().skip(total.saturating_sub(50)).collect();
    format!("{head}...({total} chars)...{tail}")
}

/// The outbound payload with any oversized `file` field reduced to a
/// preview.
fn render_payload_preview(payload: &RequestPayload) -> String {
    let mut value = match serde_json::to_value(payload) {
        Ok(v) => v,
        Err(_) => return String::new(),
    };
    if let Some(file) = value.get_mut("file") {
        if let Some(s) = file.as_str() {
            if s.chars().count() > 200 {
                *file = Value::String(truncate_middle(s));
            }
        }
    }
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

/// The inbound response with base64 runs redacted and the whole dump capped
/// at [`RESPONSE_PREVIEW_CAP`] chars.
fn render_response_preview(body: &Value) -> String {
    let raw = body.to_string();
    let redacted = RE_BASE64_RUN.replace_all(&raw, |caps: &Captures<'_>| {
        truncate_middle(&caps[0])
    });
    let total = redacted.chars().count();
    if total > RESPONSE_PREVIEW_CAP {
        let head: String = redacted.chars().take(RESPONSE_PREVIEW_CAP).collect();
        format!("{head}\n... (response truncated, total {total} chars)")
    } else {
        redacted.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::payload::{encode, PayloadOptions};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer) -> Settings {
        Settings {
            api_url: format!("{}/layout-parsing", server.uri()),
            ..Settings::default()
        }
    }

    async fn url_payload(server: &MockServer) -> RequestPayload {
        encode(
            "https://example.com/scan.png",
            &PayloadOptions::default(),
            &settings_for(server),
        )
        .await
        .expect("encode")
    }

    #[tokio::test]
    async fn success_envelope_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/layout-parsing"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errorCode": 0,
                "errorMsg": "Success",
                "result": {"layoutParsingResults": []}
            })))
            .mount(&server)
            .await;

        let payload = url_payload(&server).await;
        let envelope = submit(&payload, &settings_for(&server))
            .await
            .expect("submit");
        assert_eq!(envelope.error_code, 0);
        assert!(envelope.result.layout_parsing_results.is_empty());
    }

    #[tokio::test]
    async fn bearer_header_sent_when_key_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer my-secret-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"errorCode": 0, "result": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let payload = url_payload(&server).await;
        let settings = Settings {
            api_key: "my-secret-key".into(),
            ..settings_for(&server)
        };
        submit(&payload, &settings).await.expect("submit");
    }

    #[tokio::test]
    async fn payload_url_form_reaches_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "file": "https://example.com/scan.png",
                "useLayoutDetection": true
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"errorCode": 0, "result": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let payload = url_payload(&server).await;
        submit(&payload, &settings_for(&server))
            .await
            .expect("submit");
    }

    #[tokio::test]
    async fn service_error_carries_error_msg() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errorCode": 1,
                "errorMsg": "bad file"
            })))
            .mount(&server)
            .await;

        let payload = url_payload(&server).await;
        let err = submit(&payload, &settings_for(&server))
            .await
            .expect_err("should fail");
        match err {
            DocLensError::Service { message } => assert_eq!(message, "bad file"),
            other => panic!("expected Service, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_error_code_is_unknown_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
            .mount(&server)
            .await;

        let payload = url_payload(&server).await;
        let err = submit(&payload, &settings_for(&server))
            .await
            .expect_err("should fail");
        match err {
            DocLensError::Service { message } => assert_eq!(message, "Unknown error"),
            other => panic!("expected Service, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_2xx_is_a_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let payload = url_payload(&server).await;
        let err = submit(&payload, &settings_for(&server))
            .await
            .expect_err("should fail");
        match err {
            DocLensError::ServiceCall { reason } => {
                assert!(reason.contains("500"), "got: {reason}")
            }
            other => panic!("expected ServiceCall, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_a_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let payload = url_payload(&server).await;
        let err = submit(&payload, &settings_for(&server))
            .await
            .expect_err("should fail");
        assert!(matches!(err, DocLensError::ServiceCall { .. }));
    }

    #[test]
    fn truncate_middle_keeps_head_tail_and_count() {
        let long = "A".repeat(300);
        let preview = truncate_middle(&long);
        assert!(preview.starts_with(&"A".repeat(100)));
        assert!(preview.ends_with(&"A".repeat(50)));
        assert!(preview.contains("(300 chars)"));
        assert!(preview.len() < long.len());
    }

    #[test]
    fn payload_preview_redacts_long_file_field() {
        let payload = RequestPayload {
            file: "B".repeat(500),
            file_type: Some(1),
            use_layout_detection: true,
            prompt_label: None,
            use_doc_unwarping: true,
            use_doc_orientation_classify: true,
            use_chart_recognition: None,
        };
        let preview = render_payload_preview(&payload);
        assert!(preview.contains("(500 chars)"));
        assert!(!preview.contains(&"B".repeat(200)));
    }

    #[test]
    fn payload_preview_leaves_short_file_alone() {
        let payload = RequestPayload {
            file: "https://example.com/scan.png".into(),
            file_type: None,
            use_layout_detection: true,
            prompt_label: None,
            use_doc_unwarping: true,
            use_doc_orientation_classify: true,
            use_chart_recognition: None,
        };
        let preview = render_payload_preview(&payload);
        assert!(preview.contains("https://example.com/scan.png"));
    }

    #[test]
    fn response_preview_redacts_base64_runs() {
        let body = json!({"img": "C".repeat(400), "note": "short"});
        let preview = render_response_preview(&body);
        assert!(preview.contains("chars)"));
        assert!(!preview.contains(&"C".repeat(400)));
        assert!(preview.contains("short"));
    }

    #[test]
    fn response_preview_caps_total_length() {
        // Many distinct short-ish strings that survive redaction.
        let items: Vec<Value> = (0..2000)
            .map(|i| Value::String(format!("entry-{i:05}")))
            .collect();
        let preview = render_response_preview(&Value::Array(items));
        assert!(preview.contains("response truncated"));
        assert!(preview.len() < 9000 + 100);
    }
}
