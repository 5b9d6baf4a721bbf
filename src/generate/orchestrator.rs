//! Generation orchestrator
//!
//! One instance per panel session. Owns the panel state (topic, attachment,
//! last output, held artifact, busy flag), enforces single-flight dispatch,
//! and projects user-visible status. Dispatch is the only suspension point;
//! the effect of a resolved response is applied in one step, so the status
//! projection never observes a partial write.

use super::artifact::{ArtifactSlot, DownloadableArtifact};
use super::classify::{classify, Classification};
use super::resolver::resolve;
use super::transport::{GenerationTransport, HttpTransport};
use super::types::{
    Attachment, DownloadInfo, GenerateConfig, GenerationMode, GenerationRequest, PanelStatus,
    Pathway, TextGenerationPayload,
};

/// Result of one user generation action
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A dispatch ran to completion and the panel state was updated
    Completed,
    /// A dispatch was already in flight; the action was a no-op
    Ignored,
    /// Validation rejected the action before dispatch; no network call made
    Rejected(String),
}

/// What `begin` decided to do with an action
enum BeginAction {
    Busy,
    Rejected(String),
    Dispatch(GenerationRequest),
}

pub struct GenerateOrchestrator<T: GenerationTransport> {
    transport: T,
    topic: String,
    attachment: Option<Attachment>,
    last_output: Option<String>,
    /// True when `last_output` is a success notice about a held artifact
    /// rather than generated content
    output_is_notice: bool,
    artifact: ArtifactSlot,
    busy: bool,
}

impl GenerateOrchestrator<HttpTransport> {
    /// Orchestrator wired to the real generation service
    pub fn with_config(config: GenerateConfig) -> Self {
        Self::new(HttpTransport::new(config))
    }
}

impl<T: GenerationTransport> GenerateOrchestrator<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            topic: String::new(),
            attachment: None,
            last_output: None,
            output_is_notice: false,
            artifact: ArtifactSlot::default(),
            busy: false,
        }
    }

    // ---- input events from the shell ----

    /// Update the topic text. Editing invalidates any held artifact.
    pub fn set_topic(&mut self, topic: impl Into<String>) {
        let topic = topic.into();
        if topic == self.topic {
            return;
        }
        self.topic = topic;
        if self.artifact.invalidate() {
            tracing::debug!("[Generate] Topic edited, held artifact dropped");
        }
    }

    /// Attach a file. Selecting a file invalidates any held artifact.
    pub fn set_attachment(&mut self, attachment: Attachment) {
        tracing::debug!(
            "[Generate] Attached '{}' ({} bytes)",
            attachment.file_name,
            attachment.byte_size()
        );
        self.attachment = Some(attachment);
        if self.artifact.invalidate() {
            tracing::debug!("[Generate] Attachment changed, held artifact dropped");
        }
    }

    /// Remove the attached file, invalidating any held artifact.
    pub fn clear_attachment(&mut self) {
        if self.attachment.take().is_some() && self.artifact.invalidate() {
            tracing::debug!("[Generate] Attachment cleared, held artifact dropped");
        }
    }

    // ---- accessors ----

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn last_output(&self) -> Option<&str> {
        self.last_output.as_deref()
    }

    pub fn artifact(&self) -> Option<&DownloadableArtifact> {
        self.artifact.get()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    // ---- dispatch ----

    /// Run one generation action end to end.
    ///
    /// No-op while a dispatch is outstanding. Every failure path terminates
    /// in a user-visible message and restores `busy = false`.
    pub async fn generate(&mut self, mode: GenerationMode) -> DispatchOutcome {
        let request = match self.begin(mode) {
            BeginAction::Busy => return DispatchOutcome::Ignored,
            BeginAction::Rejected(notice) => return DispatchOutcome::Rejected(notice),
            BeginAction::Dispatch(request) => request,
        };

        let classification = self.dispatch(&request).await;
        self.complete(classification);
        DispatchOutcome::Completed
    }

    /// Validate the action and claim the single in-flight slot.
    fn begin(&mut self, mode: GenerationMode) -> BeginAction {
        if self.busy {
            tracing::debug!("[Generate] Dispatch in flight, ignoring {} action", mode);
            return BeginAction::Busy;
        }

        // A pdf action may reuse the previous real output, but never a notice.
        let prior_output = self
            .last_output
            .as_deref()
            .filter(|_| !self.output_is_notice);

        match resolve(mode, &self.topic, self.attachment.as_ref(), prior_output) {
            Ok(request) => {
                self.busy = true;
                tracing::info!(
                    "[Generate] Dispatching {} via {:?} pathway",
                    mode,
                    request.pathway()
                );
                BeginAction::Dispatch(request)
            }
            Err(e) => BeginAction::Rejected(e.to_string()),
        }
    }

    /// Execute exactly one request pathway and classify what came back.
    /// Transport errors become a `Failed` classification, never a fault.
    async fn dispatch(&self, request: &GenerationRequest) -> Classification {
        let result = match (request.pathway(), &request.attachment) {
            (Pathway::File, Some(attachment)) => {
                self.transport
                    .post_file(
                        attachment,
                        request.mode.as_str(),
                        request.topic.as_deref(),
                    )
                    .await
            }
            // Text and text-to-artifact share the wire shape; only the
            // expected response kind differs, and classification decides
            // that from the response itself.
            _ => {
                let payload = TextGenerationPayload {
                    topic: request.topic.clone().unwrap_or_default(),
                    request_type: request.mode.as_str().to_string(),
                };
                self.transport.post_text(&payload).await
            }
        };

        match result {
            Ok(raw) => classify(raw),
            Err(e) => {
                tracing::warn!("[Generate] {}", e);
                Classification::Failed(format!("Generation failed: {}", e))
            }
        }
    }

    /// Apply the outcome of a resolved dispatch in one step and release the
    /// in-flight slot. A response is applied even if its triggering input
    /// was edited while it was outstanding (last-resolved-wins).
    fn complete(&mut self, classification: Classification) {
        match classification {
            Classification::Textual(text) => {
                self.last_output = Some(text);
                self.output_is_notice = false;
            }
            Classification::Binary { bytes, content_type } => {
                let topic = (!self.topic.trim().is_empty()).then_some(self.topic.as_str());
                let artifact = DownloadableArtifact::new(bytes, content_type, topic);
                let notice = format!("Your document is ready: {}", artifact.file_name);
                self.artifact.publish(artifact);
                self.last_output = Some(notice);
                self.output_is_notice = true;
            }
            Classification::Failed(message) => {
                tracing::warn!("[Generate] Dispatch failed: {}", message);
                self.last_output = Some(message);
                self.output_is_notice = false;
            }
        }
        self.busy = false;
    }

    // ---- projection & teardown ----

    /// Derive the user-visible affordances from current state.
    pub fn status(&self) -> PanelStatus {
        let has_input = !self.topic.trim().is_empty() || self.attachment.is_some();
        let has_artifact = self.artifact.is_held();
        let has_real_output = self.last_output.is_some() && !self.output_is_notice;

        PanelStatus {
            busy: self.busy,
            can_generate: !self.busy && has_input,
            show_create_document: !has_artifact,
            can_create_document: !has_artifact && !self.busy && (has_input || has_real_output),
            download: self.artifact.get().map(|a| DownloadInfo {
                file_name: a.file_name.clone(),
                content_type: a.content_type.clone(),
                byte_size: a.byte_size(),
            }),
            output: self.last_output.clone(),
            can_copy_output: has_real_output,
        }
    }

    /// End the panel session, releasing the held artifact.
    pub fn teardown(&mut self) {
        if self.artifact.invalidate() {
            tracing::debug!("[Generate] Session torn down, held artifact dropped");
        }
        self.last_output = None;
        self.output_is_notice = false;
    }
}

impl<T: GenerationTransport> Drop for GenerateOrchestrator<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}
