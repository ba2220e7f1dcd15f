//! Classifies a work history as small/innovative versus enterprise.

use super::profile::Experience;
use serde::{Deserialize, Serialize};

/// Where a candidate's history skews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainFit {
    Startup,
    Mixed,
    Enterprise,
}

impl DomainFit {
    pub fn score(self) -> f64 {
        match self {
            DomainFit::Startup => 1.0,
            DomainFit::Mixed => 0.5,
            DomainFit::Enterprise => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DomainFit::Startup => "startup",
            DomainFit::Mixed => "mixed",
            DomainFit::Enterprise => "enterprise",
        }
    }
}

/// Strategy for classifying a work history.
pub trait DomainClassifier: Send + Sync {
    fn classify(&self, experiences: &[Experience]) -> DomainFit;
}

/// Classifies by keywords in company names.
///
/// A company containing a startup keyword and no enterprise indicator makes
/// the history [`DomainFit::Startup`]. Otherwise, if every company carries an
/// enterprise indicator or has a long name, it is [`DomainFit::Enterprise`].
/// Anything else, including an empty history, is [`DomainFit::Mixed`].
/// Matching is by case-insensitive substring.
#[derive(Debug, Clone)]
pub struct KeywordDomainClassifier {
    pub startup_keywords: Vec<String>,
    pub enterprise_indicators: Vec<String>,
    /// Company names at least this many characters long read as enterprise
    pub long_name_chars: usize,
}

impl Default for KeywordDomainClassifier {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            startup_keywords: owned(&["labs", "ai", "tech", "innovations", "systems"]),
            enterprise_indicators: owned(&["technologies", "corporation", "inc", "llc", "group"]),
            long_name_chars: 15,
        }
    }
}

impl KeywordDomainClassifier {
    fn has_any(name: &str, words: &[String]) -> bool {
        words.iter().any(|w| name.contains(w.as_str()))
    }
}

impl DomainClassifier for KeywordDomainClassifier {
    fn classify(&self, experiences: &[Experience]) -> DomainFit {
        if experiences.is_empty() {
            return DomainFit::Mixed;
        }

        let names: Vec<String> = experiences.iter().map(|e| e.company.to_lowercase()).collect();

        let startup = names.iter().any(|name| {
            Self::has_any(name, &self.startup_keywords)
                && !Self::has_any(name, &self.enterprise_indicators)
        });
        if startup {
            return DomainFit::Startup;
        }

        let enterprise_only = names.iter().all(|name| {
            Self::has_any(name, &self.enterprise_indicators)
                || name.chars().count() >= self.long_name_chars
        });
        if enterprise_only {
            DomainFit::Enterprise
        } else {
            DomainFit::Mixed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(companies: &[&str]) -> Vec<Experience> {
        companies
            .iter()
            .map(|c| Experience {
                company: c.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_startup_keyword_wins() {
        let classifier = KeywordDomainClassifier::default();
        assert_eq!(
            classifier.classify(&history(&["Google LLC", "Quantum Labs"])),
            DomainFit::Startup
        );
    }

    #[test]
    fn test_enterprise_indicator_cancels_keyword() {
        let classifier = KeywordDomainClassifier::default();
        assert_eq!(
            classifier.classify(&history(&["Infosys Technologies", "Oracle Corporation"])),
            DomainFit::Enterprise
        );
    }

    #[test]
    fn test_long_names_read_as_enterprise() {
        let classifier = KeywordDomainClassifier::default();
        assert_eq!(
            classifier.classify(&history(&["Goldman Sachs Bank"])),
            DomainFit::Enterprise
        );
    }

    #[test]
    fn test_short_plain_names_are_mixed() {
        let classifier = KeywordDomainClassifier::default();
        assert_eq!(
            classifier.classify(&history(&["Stripe", "Oracle Corporation"])),
            DomainFit::Mixed
        );
    }

    #[test]
    fn test_empty_history_is_mixed() {
        assert_eq!(
            KeywordDomainClassifier::default().classify(&[]),
            DomainFit::Mixed
        );
    }

    #[test]
    fn test_custom_keywords() {
        let classifier = KeywordDomainClassifier {
            startup_keywords: vec!["ventures".to_string()],
            enterprise_indicators: vec![],
            long_name_chars: 100,
        };
        assert_eq!(
            classifier.classify(&history(&["Blue Ventures"])),
            DomainFit::Startup
        );
        assert_eq!(classifier.classify(&history(&["Quantum Labs"])), DomainFit::Mixed);
    }

    #[test]
    fn test_scores() {
        assert_eq!(DomainFit::Startup.score(), 1.0);
        assert_eq!(DomainFit::Mixed.score(), 0.5);
        assert_eq!(DomainFit::Enterprise.score(), 0.0);
    }
}
