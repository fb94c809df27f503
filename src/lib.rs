pub mod analysis;
pub mod client;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod presenter;
pub mod session;

pub use analysis::{AnalysisResult, Category};
pub use client::AnalysisClient;
pub use config::ClientConfig;
pub use controller::{RequestState, SubmissionController};
pub use error::{AnalyzeError, TriageError};
pub use input::{FileOrigin, InputMode, InputSelector, SelectedFile};
pub use session::TriageSession;

/// Install the `tracing` subscriber used by the binaries. Honors `RUST_LOG`
/// and writes to stderr.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
