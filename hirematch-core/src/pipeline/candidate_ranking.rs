use crate::config::ScoringConfig;
use crate::scoring::{
    Candidate, CandidateProfile, CandidateScore, CandidateScorer, JobSummary, ProfileBuilder,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// 1-based
    pub rank: usize,
    pub profile: CandidateProfile,
    pub result: CandidateScore,
}

/// Scores candidates for one job and keeps the best.
#[derive(Clone)]
pub struct CandidateRanker {
    profiles: ProfileBuilder,
    scorer: CandidateScorer,
    top_candidates: usize,
}

impl CandidateRanker {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            profiles: ProfileBuilder::new(config),
            scorer: CandidateScorer::new(config.clone()),
            top_candidates: config.top_candidates,
        }
    }

    /// Replaces how profiles are derived (reference date, domain classifier).
    pub fn with_profile_builder(mut self, profiles: ProfileBuilder) -> Self {
        self.profiles = profiles;
        self
    }

    /// Ranks by score, best first. Equal scores keep input order.
    pub fn rank(&self, candidates: &[Candidate], job: &JobSummary) -> Vec<RankedCandidate> {
        info!(
            candidates = candidates.len(),
            role = %job.role,
            "Scoring candidates"
        );

        let mut scored: Vec<(CandidateProfile, CandidateScore)> = candidates
            .iter()
            .map(|candidate| {
                let profile = self.profiles.build(candidate);
                let result = self.scorer.score(&profile, job);
                debug!(
                    candidate = %profile.name,
                    score = result.score,
                    years = profile.years_of_experience,
                    job_hopping = profile.job_hopping,
                    "Scored candidate"
                );
                (profile, result)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.score
                .partial_cmp(&a.1.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(self.top_candidates);

        scored
            .into_iter()
            .enumerate()
            .map(|(i, (profile, result))| RankedCandidate {
                rank: i + 1,
                profile,
                result,
            })
            .collect()
    }
}
