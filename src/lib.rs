//! hirematch - Hybrid resume/job matching
//!
//! Convenience wrapper crate that re-exports `hirematch-core`.
//!
//! # Quick Start
//!
//! ```no_run
//! use hirematch::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load_or_default();
//! let provider = Arc::new(OllamaProvider::from_config(&config));
//! let store = create_vector_store(config.storage.clone(), config.embedding.dimension as u64).await?;
//! let embedder = Embedder::new(provider, config.embedding.model.clone(), config.embedding.dimension);
//!
//! let jobs = vec![Document::new("job-1", "Rust engineer, distributed storage")];
//! let matcher = JobMatcher::build(&jobs, embedder, store, &config).await?;
//! for m in matcher.match_resume("Senior Rust developer").await {
//!     println!("{} scored {}/10", m.job_id, m.fit_score);
//! }
//! # Ok(())
//! # }
//! ```

// Re-export core
pub use hirematch_core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use hirematch_core::retrieval::{
        create_vector_store, Calibrator, Document, Embedder, FusedResult, MemoryStore, Payload,
        RankedResult, VectorStore,
    };
    pub use hirematch_core::scoring::{
        Candidate, CandidateProfile, CandidateScore, CandidateScorer, Experience, Factor,
        JobSummary, PartialDate,
    };
    pub use hirematch_core::{
        CandidateRanker, Config, JobMatch, JobMatcher, Justifier, OllamaProvider, Provider,
        Resume,
    };
}
