//! Shared types for the content-generation panel

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Requested output kind for one generation action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    Questions,
    Summary,
    Pdf,
}

impl GenerationMode {
    /// Wire value sent as `request_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Questions => "questions",
            Self::Summary => "summary",
            Self::Pdf => "pdf",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "questions" => Some(Self::Questions),
            "summary" => Some(Self::Summary),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single user-supplied file, held in memory until the panel is done with it
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Wrap raw bytes, guessing the MIME type from the file name
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read an attachment from disk
    pub async fn from_path(path: &Path) -> Result<Self, String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to read attachment '{}': {}", path.display(), e))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("attachment")
            .to_string();

        Ok(Self::new(file_name, bytes))
    }

    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }
}

/// Which request shape a dispatch will use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pathway {
    /// JSON request expecting a structured textual result
    Text,
    /// Multipart request carrying the attachment; may return text or bytes
    File,
    /// JSON request expecting a binary body (document generation)
    TextToArtifact,
}

/// A validated, dispatchable generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub mode: GenerationMode,
    pub topic: Option<String>,
    pub attachment: Option<Attachment>,
}

impl GenerationRequest {
    /// Pathway selection rule: an attachment always takes the file pathway,
    /// regardless of mode. Without one, pdf requests expect a binary body.
    pub fn pathway(&self) -> Pathway {
        if self.attachment.is_some() {
            Pathway::File
        } else if self.mode == GenerationMode::Pdf {
            Pathway::TextToArtifact
        } else {
            Pathway::Text
        }
    }
}

/// JSON body for the text endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextGenerationPayload {
    pub topic: String,
    pub request_type: String,
}

/// Configuration for the generation service endpoints
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Text endpoint (JSON in/out)
    pub text_endpoint: String,

    /// File endpoint (multipart in)
    pub file_endpoint: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            text_endpoint: "https://automation.epistemeai.app/webhook/generate-text".to_string(),
            file_endpoint: "https://automation.epistemeai.app/webhook/generate-file".to_string(),
            timeout_secs: 120,
        }
    }
}

impl GenerateConfig {
    /// Build from environment variables, falling back to defaults.
    ///
    /// Recognized: `EPISTEME_TEXT_ENDPOINT`, `EPISTEME_FILE_ENDPOINT`,
    /// `EPISTEME_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("EPISTEME_TEXT_ENDPOINT") {
            if !url.is_empty() {
                config.text_endpoint = url;
            }
        }
        if let Ok(url) = std::env::var("EPISTEME_FILE_ENDPOINT") {
            if !url.is_empty() {
                config.file_endpoint = url;
            }
        }
        if let Ok(secs) = std::env::var("EPISTEME_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(parsed) if parsed > 0 => config.timeout_secs = parsed,
                _ => tracing::warn!("[Generate] Ignoring invalid EPISTEME_TIMEOUT_SECS: {}", secs),
            }
        }

        config
    }
}

/// User-visible download affordance for a held artifact
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadInfo {
    pub file_name: String,
    pub content_type: String,
    pub byte_size: usize,
}

/// Everything the panel shell needs to render, derived from orchestrator state
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PanelStatus {
    pub busy: bool,
    /// Questions/summary triggers enabled
    pub can_generate: bool,
    /// Create-document affordance shown (hidden while an artifact is held)
    pub show_create_document: bool,
    pub can_create_document: bool,
    /// Present when an artifact is available for download
    pub download: Option<DownloadInfo>,
    pub output: Option<String>,
    /// Suppressed when the output is a success notice about an artifact
    pub can_copy_output: bool,
}
