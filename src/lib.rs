pub mod generate;
pub mod stats;
pub mod tasks;
pub mod timer;

pub use generate::{
    Attachment, Classification, DispatchOutcome, DownloadableArtifact, GenerateConfig,
    GenerateOrchestrator, GenerationMode, HttpTransport, PanelStatus,
};
pub use tasks::{NewTask, Task, TaskPriority, TaskStore};
pub use timer::{FocusTimer, SessionKind};

use tracing_subscriber::EnvFilter;

/// One-time process initialization: load `.env` and set up tracing.
///
/// Safe to call more than once; only the first call installs the subscriber.
pub fn init() {
    // Load .env file - try multiple locations
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }

    // Initialize tracing with RUST_LOG env filter
    // Default: warn for most crates, info for our app
    // Use RUST_LOG=debug for verbose per-operation logs
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,episteme=info")),
        )
        .try_init();
}
