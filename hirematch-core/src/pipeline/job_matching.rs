use super::{MatchError, Result};
use crate::config::Config;
use crate::retrieval::{
    Calibrator, DenseIndex, Document, Embedder, FusedResult, HybridSearcher, IndexReport,
    Payload, SparseIndex, VectorStore,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// A resume as plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub name: String,
    pub text: String,
}

impl Resume {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// One job matched to a resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    /// 1-based position among this resume's matches
    pub rank: usize,
    pub job_id: String,
    pub rrf_score: f64,
    /// Calibrated 1-10 fit score
    pub fit_score: f64,
    pub payload: Option<Payload>,
    pub dense_rank: Option<usize>,
    pub sparse_rank: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeMatches {
    pub resume: String,
    pub matches: Vec<JobMatch>,
}

/// Matches resumes against an indexed job corpus.
///
/// Both indices are built once in [`JobMatcher::build`] and stay read-only
/// for every query afterwards.
#[derive(Clone)]
pub struct JobMatcher {
    searcher: HybridSearcher,
    calibrator: Calibrator,
    top_matches: usize,
    report: IndexReport,
    // Corpus payloads, for hits the vector store could not resolve
    payloads: HashMap<String, Payload>,
}

impl JobMatcher {
    /// Indexes `jobs` into both search paths.
    ///
    /// The store is cleared first so only this corpus is searchable. Fails on
    /// duplicate ids, empty job text or a store that cannot be cleared;
    /// per-document embedding failures only show up in [`Self::index_report`].
    pub async fn build(
        jobs: &[Document],
        embedder: Embedder,
        store: Arc<dyn VectorStore>,
        config: &Config,
    ) -> Result<Self> {
        validate_corpus(jobs)?;

        store
            .clear()
            .await
            .map_err(|e| MatchError::Store(format!("{e:#}")))?;

        let retrieval = &config.retrieval;
        let dense = DenseIndex::new(embedder, store)
            .with_batch_size(retrieval.batch_size)
            .with_batch_retries(retrieval.batch_retries)
            .with_concurrency(retrieval.index_concurrency);

        info!(jobs = jobs.len(), "Building job indices");
        let report = dense.index(jobs).await;
        let sparse = SparseIndex::build(jobs);

        let searcher = HybridSearcher::new(dense, sparse)
            .with_top_k(retrieval.top_k)
            .with_rrf_k(retrieval.rrf_k);

        Ok(Self {
            searcher,
            calibrator: Calibrator::from_config(&config.calibration),
            top_matches: retrieval.top_matches,
            report,
            payloads: jobs
                .iter()
                .filter(|job| !job.payload.is_empty())
                .map(|job| (job.id.clone(), job.payload.clone()))
                .collect(),
        })
    }

    pub fn index_report(&self) -> &IndexReport {
        &self.report
    }

    /// Number of jobs in the corpus.
    pub fn len(&self) -> usize {
        self.searcher.sparse().len()
    }

    pub fn is_empty(&self) -> bool {
        self.searcher.sparse().is_empty()
    }

    /// Returns the best `top_matches` jobs for a resume, best first.
    pub async fn match_resume(&self, text: &str) -> Vec<JobMatch> {
        if self.is_empty() || text.trim().is_empty() {
            return Vec::new();
        }

        self.searcher
            .search(text)
            .await
            .into_iter()
            .take(self.top_matches)
            .enumerate()
            .map(|(i, result)| self.to_match(i + 1, result))
            .collect()
    }

    /// Matches each resume independently. Resumes without text are skipped.
    pub async fn match_resumes(&self, resumes: &[Resume]) -> Vec<ResumeMatches> {
        let mut results = Vec::with_capacity(resumes.len());
        for (i, resume) in resumes.iter().enumerate() {
            if resume.text.trim().is_empty() {
                warn!(resume = %resume.name, "Skipping resume with no text");
                continue;
            }

            info!(
                resume = %resume.name,
                index = i + 1,
                total = resumes.len(),
                "Matching resume"
            );
            let matches = self.match_resume(&resume.text).await;
            if matches.is_empty() {
                info!(resume = %resume.name, "No matches found");
            }
            results.push(ResumeMatches {
                resume: resume.name.clone(),
                matches,
            });
        }
        results
    }

    fn to_match(&self, rank: usize, result: FusedResult) -> JobMatch {
        let payload = result
            .payload
            .or_else(|| self.payloads.get(&result.id).cloned());
        JobMatch {
            rank,
            fit_score: self.calibrator.calibrate(result.rrf_score),
            job_id: result.id,
            rrf_score: result.rrf_score,
            payload,
            dense_rank: result.dense_rank,
            sparse_rank: result.sparse_rank,
        }
    }
}

fn validate_corpus(jobs: &[Document]) -> Result<()> {
    let mut seen = HashSet::with_capacity(jobs.len());
    for job in jobs {
        if !seen.insert(job.id.as_str()) {
            return Err(MatchError::DuplicateId(job.id.clone()));
        }
        if job.text.trim().is_empty() {
            return Err(MatchError::EmptyText(job.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ChatRequest, ChatResponse, Provider, ProviderError};
    use crate::retrieval::MemoryStore;
    use async_trait::async_trait;

    /// Embeds by keyword presence; anything mentioning "offline" fails.
    struct KeywordProvider;

    #[async_trait]
    impl Provider for KeywordProvider {
        async fn chat<'a>(
            &'a self,
            _request: ChatRequest,
            _callback: Box<dyn FnMut(ChatResponse) + Send + 'a>,
        ) -> crate::provider::Result<()> {
            Ok(())
        }

        async fn embed(&self, text: &str, _model: &str) -> crate::provider::Result<Vec<f32>> {
            if text.contains("offline") {
                return Err(ProviderError::Api("embedding service down".to_string()));
            }
            let text = text.to_lowercase();
            let has = |w: &str| if text.contains(w) { 1.0 } else { 0.0 };
            Ok(vec![has("rust"), has("python"), has("design"), 0.05])
        }
    }

    fn jobs() -> Vec<Document> {
        vec![
            Document::new("rust", "Rust engineer for distributed storage")
                .with_payload("role", "Storage Engineer"),
            Document::new("python", "Python engineer for machine learning pipelines")
                .with_payload("role", "ML Engineer"),
            Document::new("design", "Product design lead for mobile apps")
                .with_payload("role", "Design Lead"),
        ]
    }

    async fn matcher(jobs: &[Document]) -> Result<JobMatcher> {
        let embedder = Embedder::new(Arc::new(KeywordProvider), "kw", 4);
        JobMatcher::build(jobs, embedder, Arc::new(MemoryStore::new()), &Config::default()).await
    }

    #[tokio::test]
    async fn test_best_job_first_with_payload() {
        let matcher = matcher(&jobs()).await.unwrap();
        let matches = matcher.match_resume("Senior Rust developer, distributed storage").await;

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].job_id, "rust");
        assert_eq!(matches[0].rank, 1);
        assert_eq!(matches[0].dense_rank, Some(0));
        assert_eq!(matches[0].sparse_rank, Some(0));
        assert_eq!(matches[0].payload.as_ref().unwrap()["role"], "Storage Engineer");
        assert!(matches[0].fit_score >= matches[1].fit_score);
        assert!((1.0..=10.0).contains(&matches[0].fit_score));
    }

    #[tokio::test]
    async fn test_unembeddable_resume_falls_back_to_sparse() {
        let matcher = matcher(&jobs()).await.unwrap();
        let matches = matcher.match_resume("offline python pipelines").await;

        assert_eq!(matches[0].job_id, "python");
        assert_eq!(matches[0].dense_rank, None);
        assert_eq!(matches[0].sparse_rank, Some(0));
    }

    #[tokio::test]
    async fn test_empty_corpus_returns_nothing() {
        let matcher = matcher(&[]).await.unwrap();
        assert!(matcher.is_empty());
        assert!(matcher.match_resume("rust").await.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_duplicate_ids() {
        let mut corpus = jobs();
        corpus.push(Document::new("rust", "another rust job"));
        assert!(matches!(matcher(&corpus).await, Err(MatchError::DuplicateId(id)) if id == "rust"));
    }

    #[tokio::test]
    async fn test_rejects_empty_text() {
        let corpus = vec![Document::new("blank", "   ")];
        assert!(matches!(matcher(&corpus).await, Err(MatchError::EmptyText(_))));
    }

    #[tokio::test]
    async fn test_unembeddable_job_still_sparse_searchable() {
        let mut corpus = jobs();
        corpus.push(
            Document::new("cobol", "offline COBOL mainframe maintenance")
                .with_payload("role", "Mainframe Engineer"),
        );
        let matcher = matcher(&corpus).await.unwrap();

        assert_eq!(matcher.index_report().skipped, 1);
        assert_eq!(matcher.len(), 4);
        let matches = matcher.match_resume("COBOL mainframe").await;
        let cobol = matches.iter().find(|m| m.job_id == "cobol").unwrap();
        assert_eq!(cobol.dense_rank, None);
        assert_eq!(cobol.sparse_rank, Some(0));
        // Never reached the store; the payload comes from the corpus.
        assert_eq!(cobol.payload.as_ref().unwrap()["role"], "Mainframe Engineer");
    }

    #[tokio::test]
    async fn test_match_resumes_skips_empty() {
        let matcher = matcher(&jobs()).await.unwrap();
        let resumes = vec![
            Resume::new("ada.txt", "Rust systems programmer"),
            Resume::new("blank.txt", ""),
            Resume::new("grace.txt", "Python machine learning"),
        ];

        let results = matcher.match_resumes(&resumes).await;
        let names: Vec<_> = results.iter().map(|r| r.resume.as_str()).collect();
        assert_eq!(names, vec!["ada.txt", "grace.txt"]);
        assert_eq!(results[1].matches[0].job_id, "python");
    }
}
