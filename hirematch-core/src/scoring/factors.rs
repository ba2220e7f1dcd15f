//! Independent fit factors.
//!
//! Each factor yields a sub-score in `[0, 1]` and an explanation that can be
//! shown as-is. Factors never look at each other's results.

use super::domain::DomainFit;
use super::experience::parse_experience_requirement;
use super::profile::JobSummary;
use super::similarity::token_set_ratio;
use crate::config::ScoringConfig;
use crate::retrieval::tokenizer::word_tokens;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Requirement words that never count towards skill relevance.
const FILLER_WORDS: [&str; 6] = ["and", "or", "the", "with", "experience", "required"];

/// Overlapping skills listed in the explanation.
const LISTED_OVERLAP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Title,
    Experience,
    Skills,
    DomainFit,
    Tenure,
}

impl Factor {
    pub fn as_str(self) -> &'static str {
        match self {
            Factor::Title => "title",
            Factor::Experience => "experience",
            Factor::Skills => "skills",
            Factor::DomainFit => "domain_fit",
            Factor::Tenure => "tenure",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Factor::Title => "Title",
            Factor::Experience => "Experience",
            Factor::Skills => "Skills",
            Factor::DomainFit => "Domain Fit",
            Factor::Tenure => "Tenure",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub sub_score: f64,
    pub explanation: String,
}

impl FactorScore {
    fn new(sub_score: f64, explanation: impl Into<String>) -> Self {
        Self {
            sub_score: sub_score.clamp(0.0, 1.0),
            explanation: explanation.into(),
        }
    }
}

pub fn title_match(candidate_title: &str, job_role: &str) -> FactorScore {
    let score = token_set_ratio(candidate_title, job_role);
    FactorScore::new(
        score,
        format!("{score:.2} (candidate: '{candidate_title}' vs job: '{job_role}')"),
    )
}

/// Scores candidate years against a free-text requirement.
///
/// Meeting the minimum earns full credit, reduced by the overqualification
/// multiplier when the years exceed the bounded maximum by the configured
/// factor. Falling short loses credit linearly in the gap over the minimum.
/// An unparseable requirement scores a neutral 0.5.
pub fn experience_match(candidate_years: f64, requirement: &str, config: &ScoringConfig) -> FactorScore {
    let detail = format!("candidate: {candidate_years} years, job requires: '{requirement}'");

    let Some(range) = parse_experience_requirement(requirement) else {
        return FactorScore::new(0.5, format!("{detail} -> 0.50 (requirement unclear)"));
    };

    let min = range.min as f64;
    let score = if candidate_years >= min {
        match range.max {
            Some(max) if candidate_years > max as f64 * config.overqualification_factor => {
                config.overqualification_multiplier
            }
            _ => 1.0,
        }
    } else {
        (1.0 - (min - candidate_years) / min).max(0.0)
    };

    let note = if score < 1.0 && candidate_years >= min {
        " (possibly overqualified)"
    } else {
        ""
    };
    FactorScore::new(score, format!("{detail} -> {score:.2}{note}"))
}

/// Overlap between candidate skills and the job's requirement text.
///
/// The overlap count is divided by `max(floor, relevant * ratio)`, where
/// `relevant` counts requirement words longer than two characters that are
/// not filler. Returns the overlapping terms alongside the score.
pub fn skill_overlap(
    skills: &BTreeSet<String>,
    job: &JobSummary,
    config: &ScoringConfig,
) -> (FactorScore, BTreeSet<String>) {
    let job_tokens: BTreeSet<String> = word_tokens(&job.requirement_text()).into_iter().collect();
    if skills.is_empty() || job_tokens.is_empty() {
        return (
            FactorScore::new(0.0, "0.00 (no skills or requirements to compare)"),
            BTreeSet::new(),
        );
    }

    let candidate: BTreeSet<String> = skills.iter().map(|s| s.to_lowercase()).collect();
    let overlap: BTreeSet<String> = candidate.intersection(&job_tokens).cloned().collect();

    let relevant = job_tokens
        .iter()
        .filter(|t| t.chars().count() > 2 && !FILLER_WORDS.contains(&t.as_str()))
        .count();

    let score = if relevant == 0 {
        0.0
    } else {
        let denominator = config
            .skill_denominator_floor
            .max(relevant as f64 * config.skill_denominator_ratio);
        (overlap.len() as f64 / denominator).min(1.0)
    };

    let listed: Vec<&str> = overlap.iter().take(LISTED_OVERLAP).map(String::as_str).collect();
    let more = if overlap.len() > LISTED_OVERLAP { ", ..." } else { "" };
    let explanation = format!(
        "{score:.2} (overlap: {} skills - {}{more})",
        overlap.len(),
        listed.join(", ")
    );

    (FactorScore::new(score, explanation), overlap)
}

pub fn domain_fit(fit: DomainFit) -> FactorScore {
    let score = fit.score();
    FactorScore::new(score, format!("{score:.2} ({} history)", fit.as_str()))
}

/// Tenure stability: 1.0 when stable, 0.0 when job hopping was detected.
///
/// Never blended into the aggregate; a 0.0 here means `penalty` is deducted.
pub fn tenure(job_hopping: bool, penalty: f64) -> FactorScore {
    if job_hopping {
        FactorScore::new(
            0.0,
            format!("potential job hopping detected (-{penalty:.2} penalty)"),
        )
    } else {
        FactorScore::new(1.0, "OK")
    }
}
