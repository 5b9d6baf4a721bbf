//! Input resolution
//!
//! Pure validation: turns the panel's raw input signals (typed topic,
//! attached file) into a dispatchable request, or rejects the action before
//! any network call is made.

use super::error::GenerateError;
use super::types::{Attachment, GenerationMode, GenerationRequest};

/// Validate and normalize panel input for one generation action.
///
/// Requires a non-blank topic or an attachment, with one exception: a pdf
/// request may run without new input when a prior textual output exists, in
/// which case that output becomes the request topic (document-from-output).
pub fn resolve(
    mode: GenerationMode,
    topic: &str,
    attachment: Option<&Attachment>,
    prior_output: Option<&str>,
) -> Result<GenerationRequest, GenerateError> {
    let topic = topic.trim();

    if !topic.is_empty() || attachment.is_some() {
        return Ok(GenerationRequest {
            mode,
            topic: (!topic.is_empty()).then(|| topic.to_string()),
            attachment: attachment.cloned(),
        });
    }

    if mode == GenerationMode::Pdf {
        if let Some(prior) = prior_output.filter(|p| !p.trim().is_empty()) {
            return Ok(GenerationRequest {
                mode,
                topic: Some(prior.to_string()),
                attachment: None,
            });
        }
    }

    Err(GenerateError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_rejected() {
        for mode in [GenerationMode::Questions, GenerationMode::Summary] {
            let err = resolve(mode, "   \t", None, None).unwrap_err();
            assert!(matches!(err, GenerateError::Validation));
            assert_eq!(err.to_string(), "no content supplied");
        }
    }

    #[test]
    fn test_topic_is_trimmed() {
        let req = resolve(GenerationMode::Summary, "  Water Cycle  ", None, None).unwrap();
        assert_eq!(req.topic.as_deref(), Some("Water Cycle"));
        assert!(req.attachment.is_none());
    }

    #[test]
    fn test_attachment_alone_is_enough() {
        let att = Attachment::new("notes.pdf", vec![1, 2]);
        let req = resolve(GenerationMode::Pdf, "", Some(&att), None).unwrap();
        assert!(req.topic.is_none());
        assert_eq!(req.attachment.unwrap().file_name, "notes.pdf");
    }

    #[test]
    fn test_pdf_from_prior_output() {
        let req = resolve(
            GenerationMode::Pdf,
            "",
            None,
            Some("Summary:\nThe water cycle..."),
        )
        .unwrap();
        assert_eq!(req.topic.as_deref(), Some("Summary:\nThe water cycle..."));
    }

    #[test]
    fn test_prior_output_does_not_rescue_other_modes() {
        let err = resolve(GenerationMode::Summary, "", None, Some("old output")).unwrap_err();
        assert!(matches!(err, GenerateError::Validation));
    }

    #[test]
    fn test_pdf_without_any_source_is_rejected() {
        assert!(resolve(GenerationMode::Pdf, "", None, None).is_err());
        assert!(resolve(GenerationMode::Pdf, "", None, Some("  ")).is_err());
    }
}
