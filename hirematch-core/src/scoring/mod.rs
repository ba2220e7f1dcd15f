//! Multi-factor candidate scoring.
//!
//! A candidate is scored against one job along independent factors (see
//! [`factors`]). Title, experience, skills and domain fit are blended by
//! weight; detected job hopping deducts the tenure weight from the blend
//! instead of adding to it. The result is rescaled to a 1-10 fit score.

pub mod domain;
pub mod experience;
pub mod factors;
pub mod profile;
pub mod similarity;

pub use domain::{DomainClassifier, DomainFit, KeywordDomainClassifier};
pub use experience::{parse_experience_requirement, summarize_tenure, ExperienceRange, TenureSummary};
pub use factors::{Factor, FactorScore};
pub use profile::{
    extract_skills, Candidate, CandidateProfile, Experience, JobSummary, PartialDate,
    ProfileBuilder,
};

use crate::config::{ScoringConfig, ScoringWeights};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-factor sub-scores and explanations, in a fixed factor order.
pub type ScoreBreakdown = BTreeMap<Factor, FactorScore>;

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;

/// Result of scoring one candidate against one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    /// In `[1.0, 10.0]`, rounded to 0.1
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    /// Candidate skills found in the job's requirements
    pub overlap: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CandidateScorer {
    config: ScoringConfig,
}

impl CandidateScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.config.weights
    }

    pub fn score(&self, candidate: &CandidateProfile, job: &JobSummary) -> CandidateScore {
        let weights = self.config.weights;
        let mut breakdown = ScoreBreakdown::new();

        let title = factors::title_match(&candidate.title, &job.role);
        let experience =
            factors::experience_match(candidate.years_of_experience, &job.yoe, &self.config);
        let (skills, overlap) = factors::skill_overlap(&candidate.skills, job, &self.config);
        let domain = factors::domain_fit(candidate.domain_fit);
        let tenure = factors::tenure(candidate.job_hopping, weights.tenure_penalty);

        let mut aggregate = title.sub_score * weights.title
            + experience.sub_score * weights.experience
            + skills.sub_score * weights.skills
            + domain.sub_score * weights.domain_fit;
        if candidate.job_hopping {
            aggregate -= weights.tenure_penalty;
        }

        breakdown.insert(Factor::Title, title);
        breakdown.insert(Factor::Experience, experience);
        breakdown.insert(Factor::Skills, skills);
        breakdown.insert(Factor::DomainFit, domain);
        breakdown.insert(Factor::Tenure, tenure);

        CandidateScore {
            score: rescale(aggregate, &weights),
            breakdown,
            overlap,
        }
    }
}

/// Maps an aggregate onto `[1, 10]`, rounded to 0.1.
///
/// The aggregate is clamped at zero and divided by the highest value the
/// blended weights can reach, so a candidate perfect on every factor scores
/// 10.0 whatever the tenure weight is.
fn rescale(aggregate: f64, weights: &ScoringWeights) -> f64 {
    let ceiling = weights.positive_total();
    let normalized = if ceiling > 0.0 {
        (aggregate.max(0.0) / ceiling).min(1.0)
    } else {
        0.0
    };
    let score = MIN_SCORE + normalized * (MAX_SCORE - MIN_SCORE);
    ((score * 10.0).round() / 10.0).clamp(MIN_SCORE, MAX_SCORE)
}
