//! Artifact lifecycle
//!
//! At most one generated document is held in memory at a time. The slot
//! owns the bytes exclusively: publishing a new artifact drops the previous
//! one first, and every invalidation path (topic edit, attachment change,
//! teardown) empties the slot so a stale document can never be offered for
//! download.

use chrono::Utc;
use std::path::{Path, PathBuf};

/// Longest topic-derived stem in a generated file name
const MAX_STEM_LEN: usize = 40;

/// One in-memory binary result, available for download until invalidated
#[derive(Debug, Clone)]
pub struct DownloadableArtifact {
    bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
    pub created_at: chrono::DateTime<Utc>,
}

impl DownloadableArtifact {
    /// Wrap response bytes with a generated file name derived from the
    /// current topic (or timestamp when no topic is set).
    pub fn new(bytes: Vec<u8>, content_type: String, topic: Option<&str>) -> Self {
        let file_name = suggested_file_name(topic, &content_type);
        Self {
            bytes,
            file_name,
            content_type,
            created_at: Utc::now(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }

    /// Write the artifact into a directory, returning the full path
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf, String> {
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(|e| format!("Failed to save '{}': {}", path.display(), e))?;
        Ok(path)
    }

    /// Write the artifact into the user's downloads directory
    pub async fn save_to_downloads(&self) -> Result<PathBuf, String> {
        let downloads =
            dirs::download_dir().ok_or("Could not determine downloads directory")?;
        self.save_to(&downloads).await
    }
}

/// Exclusive owner of the single live artifact
#[derive(Debug, Default)]
pub(crate) struct ArtifactSlot {
    current: Option<DownloadableArtifact>,
}

impl ArtifactSlot {
    /// Hold a new artifact, releasing any previous one first
    pub fn publish(&mut self, artifact: DownloadableArtifact) {
        if let Some(old) = self.current.take() {
            tracing::debug!(
                "[Artifact] Released '{}' ({} bytes) for replacement",
                old.file_name,
                old.byte_size()
            );
        }
        tracing::info!(
            "[Artifact] Holding '{}' ({} bytes, {})",
            artifact.file_name,
            artifact.byte_size(),
            artifact.content_type
        );
        self.current = Some(artifact);
    }

    /// Drop the held artifact, if any. Returns whether one was released.
    pub fn invalidate(&mut self) -> bool {
        match self.current.take() {
            Some(old) => {
                tracing::debug!(
                    "[Artifact] Released '{}' ({} bytes)",
                    old.file_name,
                    old.byte_size()
                );
                true
            }
            None => false,
        }
    }

    pub fn get(&self) -> Option<&DownloadableArtifact> {
        self.current.as_ref()
    }

    pub fn is_held(&self) -> bool {
        self.current.is_some()
    }
}

/// Derive a suggested file name from the topic and declared content type.
/// Falls back to a timestamp-only stem when the topic is blank.
fn suggested_file_name(topic: Option<&str>, content_type: &str) -> String {
    let stem = topic
        .map(sanitize_stem)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "generated".to_string());

    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    let extension = extension_for(content_type);

    format!("{}-{}.{}", stem, timestamp, extension)
}

/// Reduce a topic to a safe file name stem
fn sanitize_stem(topic: &str) -> String {
    let mapped: String = topic
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '_' => '-',
            c if c.is_alphanumeric() || c == '-' => c,
            _ => '-',
        })
        .collect();

    // Collapse runs of hyphens
    let mut stem = String::new();
    let mut last_was_hyphen = false;
    for c in mapped.chars() {
        if c == '-' {
            if !last_was_hyphen {
                stem.push(c);
                last_was_hyphen = true;
            }
        } else {
            stem.push(c);
            last_was_hyphen = false;
        }
    }

    let stem = stem.trim_matches('-');
    let mut end = stem.len().min(MAX_STEM_LEN);
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    stem[..end].trim_end_matches('-').to_string()
}

/// Map a declared content type to a file extension
fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "application/pdf" => "pdf",
        "" | "application/octet-stream" => "bin",
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first())
            .copied()
            .unwrap_or("bin"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_holds_at_most_one() {
        let mut slot = ArtifactSlot::default();
        assert!(!slot.is_held());

        slot.publish(DownloadableArtifact::new(
            vec![1],
            "application/pdf".into(),
            Some("first"),
        ));
        slot.publish(DownloadableArtifact::new(
            vec![2, 2],
            "application/pdf".into(),
            Some("second"),
        ));

        let held = slot.get().expect("artifact held");
        assert_eq!(held.bytes(), &[2, 2]);
        assert!(held.file_name.starts_with("second-"));
    }

    #[test]
    fn test_invalidate_empties_slot() {
        let mut slot = ArtifactSlot::default();
        assert!(!slot.invalidate());

        slot.publish(DownloadableArtifact::new(
            vec![0u8; 8],
            "application/pdf".into(),
            None,
        ));
        assert!(slot.invalidate());
        assert!(slot.get().is_none());
        assert!(!slot.invalidate());
    }

    #[test]
    fn test_file_name_from_topic() {
        let artifact =
            DownloadableArtifact::new(vec![], "application/pdf".into(), Some("The Water Cycle!"));
        assert!(artifact.file_name.starts_with("The-Water-Cycle-"));
        assert!(artifact.file_name.ends_with(".pdf"));
    }

    #[test]
    fn test_file_name_without_topic_uses_timestamp_stem() {
        let artifact = DownloadableArtifact::new(vec![], "application/pdf".into(), None);
        assert!(artifact.file_name.starts_with("generated-"));
        assert!(artifact.file_name.ends_with(".pdf"));
    }

    #[test]
    fn test_blank_topic_falls_back() {
        let artifact = DownloadableArtifact::new(vec![], "application/pdf".into(), Some("  !! "));
        assert!(artifact.file_name.starts_with("generated-"));
    }

    #[test]
    fn test_long_topic_is_truncated() {
        let topic = "a".repeat(200);
        let artifact = DownloadableArtifact::new(vec![], "application/pdf".into(), Some(&topic));
        let stem = artifact.file_name.split('-').next().unwrap();
        assert!(stem.len() <= MAX_STEM_LEN);
    }

    #[test]
    fn test_unknown_content_type_gets_bin_extension() {
        let artifact = DownloadableArtifact::new(vec![], "application/x-unheard-of".into(), None);
        assert!(artifact.file_name.ends_with(".bin"));
    }

    #[tokio::test]
    async fn test_save_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = DownloadableArtifact::new(
            b"%PDF-1.4".to_vec(),
            "application/pdf".into(),
            Some("saved"),
        );

        let path = artifact.save_to(dir.path()).await.unwrap();
        let written = tokio::fs::read(&path).await.unwrap();
        assert_eq!(written, b"%PDF-1.4");
    }
}
