//! Candidate and job records, and the attribute bag scored against a job.
//!
//! [`Candidate`] is what ingestion hands over: free-form fields plus an
//! optional work history. [`ProfileBuilder`] turns it into a
//! [`CandidateProfile`] with the derived facts the scorer needs (years of
//! experience, job hopping, skills, domain fit).

use super::domain::{DomainClassifier, DomainFit, KeywordDomainClassifier};
use super::experience::{summarize_tenure, TenurePolicy};
use crate::config::ScoringConfig;
use crate::retrieval::tokenizer::word_tokens;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, LazyLock};

/// Generic title words that say nothing about a candidate's skills.
static GENERIC_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "at", "and", "the", "of", "in", "on", "engineer", "software", "developer", "manager",
        "senior", "lead", "data", "product",
    ]
    .into_iter()
    .collect()
});

/// A date that may lack its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDate {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub day: Option<u32>,
}

impl PartialDate {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            day: None,
        }
    }

    /// Missing day defaults to the first. `None` for impossible dates.
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day.unwrap_or(1))
    }
}

/// One role in a candidate's work history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub company: String,
    pub title: String,
    pub description: String,
    pub starts_at: Option<PartialDate>,
    /// `None` means the role is ongoing
    pub ends_at: Option<PartialDate>,
}

/// A candidate as ingested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Candidate {
    pub name: String,
    pub current_title: String,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub experiences: Vec<Experience>,
    /// Overrides the total derived from `experiences`
    pub years_of_experience: Option<f64>,
}

/// The attribute bag the multi-factor scorer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub title: String,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub years_of_experience: f64,
    pub job_hopping: bool,
    pub skills: BTreeSet<String>,
    pub domain_fit: DomainFit,
}

/// A job as seen by the multi-factor scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSummary {
    pub role: String,
    pub company: String,
    /// Free-text requirement such as `"5-10 years"` or `"3+ years"`
    pub yoe: String,
    pub requirements: String,
    pub tech_stack: String,
    pub industry: String,
}

impl JobSummary {
    /// Requirements and tech stack as one lower-cased text.
    pub fn requirement_text(&self) -> String {
        format!("{} {}", self.requirements, self.tech_stack).to_lowercase()
    }
}

/// Lower-cased skill terms drawn from everything a candidate wrote.
///
/// Explicit skills are kept whole; free text (headline, summary, role titles
/// and descriptions, current title) contributes its individual words. Generic
/// title words and single characters are dropped.
pub fn extract_skills(candidate: &Candidate) -> BTreeSet<String> {
    let mut skills: BTreeSet<String> = candidate
        .skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    let free_text = candidate
        .headline
        .iter()
        .chain(candidate.summary.iter())
        .chain(
            candidate
                .experiences
                .iter()
                .flat_map(|e| [&e.title, &e.description]),
        )
        .chain(std::iter::once(&candidate.current_title));

    for text in free_text {
        skills.extend(word_tokens(text));
    }

    skills.retain(|s| s.chars().count() > 1 && !GENERIC_WORDS.contains(s.as_str()));
    skills
}

/// Derives [`CandidateProfile`]s.
#[derive(Clone)]
pub struct ProfileBuilder {
    classifier: Arc<dyn DomainClassifier>,
    tenure_policy: TenurePolicy,
    reference_date: NaiveDate,
}

impl ProfileBuilder {
    /// Uses the keyword classifier and today's date for ongoing roles.
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            classifier: Arc::new(KeywordDomainClassifier::default()),
            tenure_policy: TenurePolicy::from_config(config),
            reference_date: chrono::Local::now().date_naive(),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn DomainClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Date at which ongoing roles end.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    pub fn build(&self, candidate: &Candidate) -> CandidateProfile {
        let tenure = summarize_tenure(
            &candidate.experiences,
            self.reference_date,
            &self.tenure_policy,
        );

        CandidateProfile {
            name: candidate.name.clone(),
            title: candidate.current_title.clone(),
            location: candidate.location.clone(),
            linkedin: candidate.linkedin.clone(),
            years_of_experience: candidate
                .years_of_experience
                .unwrap_or(tenure.total_years),
            job_hopping: tenure.job_hopping,
            skills: extract_skills(candidate),
            domain_fit: self.classifier.classify(&candidate.experiences),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(company: &str, title: &str, start: (i32, u32), end: Option<(i32, u32)>) -> Experience {
        Experience {
            company: company.to_string(),
            title: title.to_string(),
            description: String::new(),
            starts_at: Some(PartialDate::new(start.0, start.1)),
            ends_at: end.map(|(y, m)| PartialDate::new(y, m)),
        }
    }

    #[test]
    fn test_extract_skills_drops_generic_words() {
        let candidate = Candidate {
            current_title: "Senior Software Engineer".to_string(),
            headline: Some("Rust & Go at Acme".to_string()),
            skills: vec!["Machine Learning".to_string(), "Kafka".to_string()],
            ..Default::default()
        };

        let skills = extract_skills(&candidate);
        let expected: BTreeSet<String> = ["machine learning", "kafka", "rust", "go", "acme"]
            .into_iter()
            .map(str::to_string)
            .collect();
        assert_eq!(skills, expected);
    }

    #[test]
    fn test_extract_skills_reads_history() {
        let mut experience = role("Acme", "Platform Engineer", (2020, 1), None);
        experience.description = "Built Kubernetes operators in Go".to_string();
        let candidate = Candidate {
            experiences: vec![experience],
            ..Default::default()
        };

        let skills = extract_skills(&candidate);
        assert!(skills.contains("kubernetes"));
        assert!(skills.contains("platform"));
        assert!(!skills.contains("engineer"));
        assert!(!skills.contains("in"));
    }

    #[test]
    fn test_build_profile_derives_facts() {
        let candidate = Candidate {
            name: "Ada".to_string(),
            current_title: "Backend Engineer".to_string(),
            experiences: vec![
                role("Tensor Labs", "Engineer", (2019, 1), Some((2021, 1))),
                role("Acme", "Engineer", (2021, 1), None),
            ],
            ..Default::default()
        };
        let builder = ProfileBuilder::new(&ScoringConfig::default())
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let profile = builder.build(&candidate);
        assert_eq!(profile.years_of_experience, 5.0);
        assert!(!profile.job_hopping);
        assert_eq!(profile.domain_fit, DomainFit::Startup);
        assert_eq!(profile.title, "Backend Engineer");
    }

    #[test]
    fn test_explicit_years_override_history() {
        let candidate = Candidate {
            years_of_experience: Some(7.5),
            ..Default::default()
        };
        let profile = ProfileBuilder::new(&ScoringConfig::default()).build(&candidate);
        assert_eq!(profile.years_of_experience, 7.5);
        assert_eq!(profile.domain_fit, DomainFit::Mixed);
    }

    #[test]
    fn test_job_summary_deserializes_partial() {
        let job: JobSummary =
            serde_json::from_str(r#"{"role": "Data Engineer", "yoe": "3+ years"}"#).unwrap();
        assert_eq!(job.role, "Data Engineer");
        assert!(job.tech_stack.is_empty());
        assert_eq!(job.requirement_text(), " ");
    }
}
