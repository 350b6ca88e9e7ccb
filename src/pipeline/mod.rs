//! Panel orchestration for Cinema Sócrates.
//!
//! Each panel owns its state behind an `Arc<Mutex<…>>` and talks to the
//! shared [`GenerationClient`](crate::genai::GenerationClient).  The UI
//! reads panel state every frame and spawns the async half of each run on
//! the tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! UI click
//!    │
//!    ├─ PosterPipeline::begin()            guard + InferringConcept + RunToken
//!    │     └─ spawn execute(token, req)
//!    │           ├─ infer_concept          Outcome<Concept> (never fails)
//!    │           ├─ GeneratingImage
//!    │           └─ generate_image         Completed | Error + banner
//!    │
//!    ├─ MusicPanel::begin()  → spawn execute   Loading → Done | Error + banner
//!    └─ ChatPanel::begin()   → spawn execute   Loading → Done | Error (fallback line)
//!
//! Responses whose RunToken is no longer active are dropped.
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cinema_socrates::config::AppConfig;
//! use cinema_socrates::genai::GenerationClient;
//! use cinema_socrates::pipeline::{ErrorBanner, PosterPipeline};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default().with_env_credentials();
//!     let client = Arc::new(GenerationClient::from_config(&config.provider));
//!     let poster = PosterPipeline::new(client, ErrorBanner::new());
//!
//!     poster.set_input_text("el sentido de la vida");
//!     if let Some((token, request)) = poster.begin() {
//!         let runner = poster.clone();
//!         tokio::spawn(async move { runner.execute(token, request).await });
//!     }
//! }
//! ```

pub mod chat;
pub mod music;
pub mod poster;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use chat::{ChatMessage, ChatPanel, ChatRole, ChatState};
pub use music::{MusicPanel, MusicState};
pub use poster::{GenerationRequest, GenerationResult, PosterPipeline, PosterState};
pub use state::{ErrorBanner, PipelineStatus, RunToken, TaskStatus};
