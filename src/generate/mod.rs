//! Content-generation panel
//!
//! Forwards user text and/or an uploaded document to the external
//! automation service and manages what comes back: structured text is
//! rendered as output, binary documents are captured as a single revocable
//! downloadable artifact.
//!
//! Internals:
//! - `resolver` - input validation (topic/attachment -> request)
//! - `transport` - JSON and multipart pathways over reqwest
//! - `classify` - textual vs binary vs failed, by declared content type
//! - `artifact` - lifecycle of the one live downloadable result
//! - `orchestrator` - per-panel state, single-flight dispatch, status

mod artifact;
mod classify;
mod error;
mod orchestrator;
mod resolver;
mod transport;
mod types;

pub use artifact::DownloadableArtifact;
pub use classify::{classify, Classification, RawResponse};
pub use error::GenerateError;
pub use orchestrator::{DispatchOutcome, GenerateOrchestrator};
pub use resolver::resolve;
pub use transport::{GenerationTransport, HttpTransport};
pub use types::{
    Attachment, DownloadInfo, GenerateConfig, GenerationMode, GenerationRequest, PanelStatus,
    Pathway, TextGenerationPayload,
};
