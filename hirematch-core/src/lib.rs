//! hirematch-core - Hybrid resume/job matching engine
//!
//! Provides the components for matching resumes to jobs and ranking
//! candidates:
//! - Hybrid retrieval: BM25 sparse search, dense search over a vector store,
//!   reciprocal rank fusion and fit score calibration
//! - Multi-factor candidate scoring with per-factor explanations
//! - Model provider abstraction (Ollama) for embeddings and justifications
//! - Configuration management
//!
//! ## Primary API
//!
//! Batch runs go through [`JobMatcher`] (resumes against a job corpus) and
//! [`CandidateRanker`] (candidates against one job).

// Public modules
pub mod config;
pub mod justification;
pub mod pipeline;
pub mod provider;
pub mod retrieval;
pub mod scoring;

// Public exports
pub use config::{Config, ConfigError};
pub use justification::Justifier;
pub use pipeline::{CandidateRanker, JobMatch, JobMatcher, MatchError, Resume, ResumeMatches};

// Provider exports
pub use provider::{ChatRequest, ChatResponse, Message, OllamaProvider, Provider, ProviderError};

// Retrieval exports
pub use retrieval::{
    create_vector_store, Calibrator, DenseIndex, Document, Embedder, FusedResult, HybridSearcher,
    MemoryStore, RankedResult, SparseIndex, VectorStore,
};

// Scoring exports
pub use scoring::{
    Candidate, CandidateProfile, CandidateScore, CandidateScorer, JobSummary, ScoreBreakdown,
};
