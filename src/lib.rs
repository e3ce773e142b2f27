// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod article;
pub mod config;
pub mod fingerprint;
pub mod ingest;
pub mod metrics;
pub mod publish;
pub mod runner;
pub mod select;
pub mod store;
pub mod supervisor;
pub mod text;

// ---- Re-exports for stable public API ----
pub use article::Article;
pub use config::{GroupConfig, TranslationRule};
pub use runner::{CycleOutcome, PipelineRunner};
pub use store::ArticleStore;
