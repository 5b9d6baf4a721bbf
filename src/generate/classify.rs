//! Response classification
//!
//! The generation service returns either a structured JSON payload or a raw
//! binary document from the same endpoints, depending on the server-side
//! outcome. Classification therefore inspects only the declared content type
//! and status of the response, never the mode the request asked for: a pdf
//! request may legitimately come back as a structured error payload.

use super::error::GenerateError;

/// Raw material of one resolved dispatch, before classification
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// What one response turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Structured text result, ready to render
    Textual(String),
    /// Opaque document bytes to capture as a downloadable artifact
    Binary { bytes: Vec<u8>, content_type: String },
    /// Transport failure or non-success status, as a user-visible message
    Failed(String),
}

/// Maximum length of an error body echoed back to the user
const MAX_ERROR_DETAIL: usize = 200;

/// Classify a resolved response as textual, binary, or failed.
pub fn classify(response: RawResponse) -> Classification {
    if !(200..300).contains(&response.status) {
        let detail = truncate(&String::from_utf8_lossy(&response.body));
        let message = if detail.is_empty() {
            format!("Generation service returned status {}", response.status)
        } else {
            format!(
                "Generation service returned status {}: {}",
                response.status, detail
            )
        };
        return Classification::Failed(message);
    }

    let content_type = response.content_type.unwrap_or_default();

    if is_structured(&content_type) {
        return match serde_json::from_slice::<serde_json::Value>(&response.body) {
            Ok(value) => match value.get("result").and_then(|v| v.as_str()) {
                Some(text) => Classification::Textual(text.to_string()),
                // Missing `result`: fall back to the raw serialization so the
                // user still sees what came back.
                None => {
                    let err = GenerateError::Format("response has no result field".to_string());
                    tracing::warn!("[Classify] {}, rendering raw payload", err);
                    Classification::Textual(value.to_string())
                }
            },
            Err(e) => {
                let err = GenerateError::Format(format!("declared JSON but did not parse: {}", e));
                tracing::warn!("[Classify] {}, rendering body as text", err);
                Classification::Textual(String::from_utf8_lossy(&response.body).into_owned())
            }
        };
    }

    Classification::Binary {
        content_type: if content_type.is_empty() {
            "application/octet-stream".to_string()
        } else {
            content_type
        },
        bytes: response.body,
    }
}

/// Whether a declared content type indicates a structured text payload
fn is_structured(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    essence == "application/json" || essence == "text/json" || essence.ends_with("+json")
}

fn truncate(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.len() <= MAX_ERROR_DETAIL {
        trimmed.to_string()
    } else {
        let mut end = MAX_ERROR_DETAIL;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_response(body: &str) -> RawResponse {
        RawResponse {
            status: 200,
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_structured_success_extracts_result() {
        let c = classify(json_response(r#"{"result":"Summary:\nWater evaporates."}"#));
        assert_eq!(
            c,
            Classification::Textual("Summary:\nWater evaporates.".to_string())
        );
    }

    #[test]
    fn test_missing_result_falls_back_to_raw_payload() {
        let c = classify(json_response(r#"{"status":"ok","detail":"queued"}"#));
        match c {
            Classification::Textual(text) => {
                assert!(text.contains("queued"));
            }
            other => panic!("expected textual fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_body_still_renders() {
        let c = classify(json_response("not json at all"));
        assert_eq!(c, Classification::Textual("not json at all".to_string()));
    }

    #[test]
    fn test_binary_content_type_is_binary() {
        let c = classify(RawResponse {
            status: 200,
            content_type: Some("application/pdf".to_string()),
            body: vec![0x25, 0x50, 0x44, 0x46],
        });
        match c {
            Classification::Binary { bytes, content_type } => {
                assert_eq!(content_type, "application/pdf");
                assert_eq!(bytes, vec![0x25, 0x50, 0x44, 0x46]);
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_content_type_defaults_to_octet_stream() {
        let c = classify(RawResponse {
            status: 200,
            content_type: None,
            body: vec![1, 2, 3],
        });
        match c {
            Classification::Binary { content_type, .. } => {
                assert_eq!(content_type, "application/octet-stream");
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_non_success_status_fails_regardless_of_content_type() {
        let c = classify(RawResponse {
            status: 502,
            content_type: Some("application/pdf".to_string()),
            body: b"upstream unavailable".to_vec(),
        });
        match c {
            Classification::Failed(message) => {
                assert!(message.contains("502"));
                assert!(message.contains("upstream unavailable"));
            }
            other => panic!("expected failed, got {:?}", other),
        }
    }

    #[test]
    fn test_error_detail_is_truncated() {
        let c = classify(RawResponse {
            status: 500,
            content_type: Some("text/plain".to_string()),
            body: vec![b'x'; 5000],
        });
        match c {
            Classification::Failed(message) => {
                assert!(message.len() < 300);
                assert!(message.ends_with("..."));
            }
            other => panic!("expected failed, got {:?}", other),
        }
    }

    #[test]
    fn test_json_suffix_types_are_structured() {
        assert!(is_structured("application/json"));
        assert!(is_structured("application/problem+json"));
        assert!(is_structured("Application/JSON; charset=utf-8"));
        assert!(!is_structured("application/pdf"));
        assert!(!is_structured("text/plain"));
        assert!(!is_structured(""));
    }
}
