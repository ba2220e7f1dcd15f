//! Batch orchestration over the retrieval and scoring components.
//!
//! - [`JobMatcher`]: indexes a job corpus, then finds the best jobs per resume
//! - [`CandidateRanker`]: scores and ranks candidates for one job

mod candidate_ranking;
mod job_matching;

pub use candidate_ranking::{CandidateRanker, RankedCandidate};
pub use job_matching::{JobMatch, JobMatcher, Resume, ResumeMatches};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Duplicate document id: {0}")]
    DuplicateId(String),

    #[error("Document {0} has no text")]
    EmptyText(String),

    #[error("Vector store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, MatchError>;
