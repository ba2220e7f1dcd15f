//! Experience requirements and work-history tenure.

use super::profile::Experience;
use crate::config::ScoringConfig;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Years of experience a job asks for. `max = None` means open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl ExperienceRange {
    pub fn bounded(min: u32, max: u32) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub fn at_least(min: u32) -> Self {
        Self { min, max: None }
    }
}

/// Parses `"5-10 years"`, `"3+ years"` or `"2 years"`.
///
/// Returns `None` when the text fits none of those shapes; callers treat that
/// as an unknown requirement rather than an error.
pub fn parse_experience_requirement(text: &str) -> Option<ExperienceRange> {
    let cleaned = text
        .to_lowercase()
        .replace("years", "")
        .replace("year", "");
    let cleaned = cleaned.trim();

    let number = |s: &str| s.trim().parse::<u32>().ok();

    let parsed = if let Some((low, high)) = cleaned.split_once('-') {
        let high = high.split('-').next().unwrap_or(high);
        match (number(low), number(high)) {
            (Some(min), Some(max)) => Some(ExperienceRange::bounded(min, max)),
            _ => None,
        }
    } else if cleaned.contains('+') {
        number(&cleaned.replace('+', "")).map(ExperienceRange::at_least)
    } else {
        number(cleaned).map(|n| ExperienceRange::bounded(n, n))
    };

    if parsed.is_none() && !cleaned.is_empty() {
        debug!(requirement = %text, "Could not parse experience requirement");
    }
    parsed
}

/// Thresholds for flagging job hopping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TenurePolicy {
    /// Roles shorter than this count as short tenures
    pub short_tenure_months: u32,
    /// Short tenures needed to flag job hopping
    pub short_tenure_threshold: usize,
}

impl Default for TenurePolicy {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

impl TenurePolicy {
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            short_tenure_months: config.short_tenure_months,
            short_tenure_threshold: config.short_tenure_threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TenureSummary {
    /// Sum of role durations in years, rounded to 0.1. Overlapping roles are
    /// counted twice.
    pub total_years: f64,
    pub short_tenures: usize,
    pub job_hopping: bool,
}

/// Whole calendar months from `start` to `end`, zero if `end` precedes it.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// Totals a work history and checks it for job hopping.
///
/// Roles without a valid start date are ignored. Ongoing roles, and roles
/// whose end date is invalid, end at `today`.
pub fn summarize_tenure(
    experiences: &[Experience],
    today: NaiveDate,
    policy: &TenurePolicy,
) -> TenureSummary {
    let durations: Vec<u32> = experiences
        .iter()
        .filter_map(|experience| {
            let Some(start) = experience.starts_at.and_then(|d| d.to_date()) else {
                if experience.starts_at.is_some() {
                    warn!(company = %experience.company, "Invalid start date, skipping role");
                }
                return None;
            };
            let end = experience
                .ends_at
                .and_then(|d| d.to_date())
                .unwrap_or(today);
            Some(months_between(start, end))
        })
        .collect();

    let total_months: u32 = durations.iter().sum();
    let short_tenures = durations
        .iter()
        .filter(|&&months| months < policy.short_tenure_months)
        .count();

    TenureSummary {
        total_years: (total_months as f64 / 12.0 * 10.0).round() / 10.0,
        short_tenures,
        job_hopping: short_tenures >= policy.short_tenure_threshold,
    }
}
