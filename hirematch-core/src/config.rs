use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration for a matching run.
///
/// Covers the collaborators (generation model, embedding model, vector store)
/// as well as the retrieval and scoring heuristics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub storage: StorageConfig,
    pub retrieval: RetrievalConfig,
    pub calibration: CalibrationConfig,
    pub scoring: ScoringConfig,
    pub justification: JustificationConfig,
}

/// Configuration for the text generation model used for justifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub chat_model: String,
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            chat_model: "llama3.2:latest".to_string(),
            temperature: 0.5,
        }
    }
}

/// Configuration for the embedding model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    /// Vector length produced by `model`. Also the length of the zero vector
    /// returned when embedding fails.
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "nomic-embed-text".to_string(),
            dimension: 768,
        }
    }
}

/// Vector database storage mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum StorageMode {
    /// In-process store, lives for the duration of the run (default)
    Embedded,
    /// gRPC storage - connect to an external Qdrant server
    Grpc { url: String },
}

impl Default for StorageMode {
    fn default() -> Self {
        Self::Embedded
    }
}

/// Storage configuration for the dense index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub storage_mode: StorageMode,
    pub vector_db: VectorDbConfig,
}

/// Vector database configuration (collection/index name, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    /// Collection/index name for storing vectors
    pub collection_name: String,
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            collection_name: "job_postings".to_string(),
        }
    }
}

/// Hybrid search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Results requested from each of the dense and sparse searches
    pub top_k: usize,
    /// Reciprocal rank fusion smoothing constant
    pub rrf_k: u32,
    /// Documents per embedding/upsert batch
    pub batch_size: usize,
    /// Extra attempts for a batch whose upsert failed before it is skipped
    pub batch_retries: usize,
    /// Batches indexed concurrently
    pub index_concurrency: usize,
    /// Matches kept per resume
    pub top_matches: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 20,
            rrf_k: 60,
            batch_size: 16,
            batch_retries: 1,
            index_concurrency: 1,
            top_matches: 2,
        }
    }
}

/// Fit score calibration settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Representative "typical maximum" fused score; maps to 10.0
    pub ceiling: f64,
    /// Re-expansion exponent applied after log compression (> 1)
    pub exponent: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            ceiling: 0.04,
            exponent: 1.5,
        }
    }
}

/// Factor weights for candidate scoring.
///
/// `tenure_penalty` is deducted when job hopping is detected; the other four
/// are blended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub title: f64,
    pub experience: f64,
    pub skills: f64,
    pub domain_fit: f64,
    pub tenure_penalty: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.title + self.experience + self.skills + self.domain_fit + self.tenure_penalty
    }

    /// Highest aggregate the blended factors can reach.
    pub fn positive_total(&self) -> f64 {
        self.title + self.experience + self.skills + self.domain_fit
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            title: 0.25,
            experience: 0.20,
            skills: 0.35,
            domain_fit: 0.10,
            tenure_penalty: 0.10,
        }
    }
}

/// Candidate scoring heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    /// Candidate years above `max * factor` count as overqualified
    pub overqualification_factor: f64,
    /// Multiplier applied to the experience sub-score when overqualified
    pub overqualification_multiplier: f64,
    /// Roles shorter than this many months count as short tenures
    pub short_tenure_months: u32,
    /// Number of short tenures that flags job hopping
    pub short_tenure_threshold: usize,
    /// Minimum denominator for the skill overlap ratio
    pub skill_denominator_floor: f64,
    /// Share of relevant requirement tokens used as the overlap denominator
    pub skill_denominator_ratio: f64,
    /// Candidates kept per job
    pub top_candidates: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            overqualification_factor: 1.5,
            overqualification_multiplier: 0.8,
            short_tenure_months: 12,
            short_tenure_threshold: 2,
            skill_denominator_floor: 5.0,
            skill_denominator_ratio: 0.5,
            top_candidates: 10,
        }
    }
}

/// Settings for generated justifications and outreach messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JustificationConfig {
    pub enabled: bool,
    pub match_max_tokens: u32,
    pub candidate_max_tokens: u32,
    pub outreach_max_tokens: u32,
    pub outreach_max_chars: usize,
}

impl Default for JustificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            match_max_tokens: 512,
            candidate_max_tokens: 100,
            outreach_max_tokens: 70,
            outreach_max_chars: 250,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from `config.yaml` if it exists, otherwise use defaults.
    pub fn load_or_default() -> Self {
        Self::load("config.yaml").unwrap_or_default()
    }
}
