use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use hirematch_core::config::{Config, StorageMode};
use hirematch_core::pipeline::RankedCandidate;
use hirematch_core::retrieval::{create_vector_store, Document, Embedder};
use hirematch_core::scoring::{Candidate, JobSummary};
use hirematch_core::{CandidateRanker, JobMatch, JobMatcher, Justifier, OllamaProvider, Provider, Resume};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hirematch")]
#[command(about = "Match resumes to jobs and rank candidates", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: PathBuf,

    #[arg(long, global = true, help = "Print results as JSON")]
    json: bool,

    #[arg(long, global = true, help = "Skip generated justifications")]
    no_justify: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Find the best jobs for each resume")]
    Match {
        #[arg(long, help = "JSON array of {id, text, payload} job documents")]
        jobs: PathBuf,

        #[arg(long, help = "Directory of plain-text (.txt) resumes")]
        resumes: PathBuf,
    },

    #[command(about = "Rank candidates for one job")]
    Rank {
        #[arg(long, help = "JSON job summary")]
        job: PathBuf,

        #[arg(long, help = "JSON array of candidates")]
        candidates: PathBuf,
    },

    #[command(about = "Configuration commands")]
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show,
}

#[derive(Serialize)]
struct MatchOutput {
    resume: String,
    matches: Vec<JustifiedMatch>,
}

#[derive(Serialize)]
struct JustifiedMatch {
    #[serde(flatten)]
    job_match: JobMatch,
    justification: Option<String>,
}

#[derive(Serialize)]
struct RankOutput {
    #[serde(flatten)]
    candidate: RankedCandidate,
    justification: Option<String>,
    outreach: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Match { ref jobs, ref resumes } => {
            run_match(&cli, &config, jobs, resumes).await
        }
        Commands::Rank { ref job, ref candidates } => {
            run_rank(&cli, &config, job, candidates).await
        }
        Commands::Config { command: ConfigCommands::Show } => show_config(&config, cli.json),
    }
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path).with_context(|| format!("Failed to load config from {}", path.display()))
    } else {
        warn!(path = %path.display(), "Config file not found, using defaults");
        Ok(Config::default())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn read_resumes(dir: &Path) -> Result<Vec<Resume>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read resume directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    paths.sort();

    let mut resumes = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match std::fs::read_to_string(&path) {
            Ok(text) => resumes.push(Resume::new(name, text)),
            Err(e) => warn!(resume = %name, error = %e, "Skipping unreadable resume"),
        }
    }
    Ok(resumes)
}

fn justifier(cli: &Cli, config: &Config, provider: Arc<dyn Provider>) -> Option<Justifier> {
    (config.justification.enabled && !cli.no_justify).then(|| Justifier::new(provider, config))
}

async fn run_match(cli: &Cli, config: &Config, jobs_path: &Path, resume_dir: &Path) -> Result<()> {
    let jobs: Vec<Document> = read_json(jobs_path)?;
    let resumes = read_resumes(resume_dir)?;
    info!(jobs = jobs.len(), resumes = resumes.len(), "Loaded inputs");

    let provider: Arc<dyn Provider> = Arc::new(OllamaProvider::from_config(config));
    let store = create_vector_store(config.storage.clone(), config.embedding.dimension as u64)
        .await
        .context("Failed to create vector store")?;
    let embedder = Embedder::new(
        provider.clone(),
        config.embedding.model.clone(),
        config.embedding.dimension,
    );

    let matcher = JobMatcher::build(&jobs, embedder, store, config)
        .await
        .context("Failed to index jobs")?;
    let justifier = justifier(cli, config, provider);

    let mut outputs = Vec::new();
    for result in matcher.match_resumes(&resumes).await {
        let resume_text = resumes
            .iter()
            .find(|r| r.name == result.resume)
            .map(|r| r.text.as_str())
            .unwrap_or_default();

        let mut matches = Vec::with_capacity(result.matches.len());
        for job_match in result.matches {
            let justification = match &justifier {
                Some(j) => Some(
                    j.justify_match(resume_text, job_match.payload.as_ref(), job_match.fit_score)
                        .await,
                ),
                None => None,
            };
            matches.push(JustifiedMatch {
                job_match,
                justification,
            });
        }
        outputs.push(MatchOutput {
            resume: result.resume,
            matches,
        });
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    } else {
        print_matches(&outputs);
    }
    Ok(())
}

fn print_matches(outputs: &[MatchOutput]) {
    if outputs.is_empty() {
        println!("{}", "No matching results were generated.".yellow());
        return;
    }

    for output in outputs {
        println!("{} {}", "Resume:".bold().green(), output.resume.bold());
        if output.matches.is_empty() {
            println!("  {}", "No matches found".yellow());
        }
        for JustifiedMatch {
            job_match: m,
            justification,
        } in &output.matches
        {
            let payload = m.payload.as_ref();
            let field = |key: &str| {
                payload
                    .and_then(|p| p.get(key))
                    .map(String::as_str)
                    .unwrap_or("N/A")
            };
            println!(
                "  {}. {} at {} ({})",
                m.rank,
                field("role").cyan(),
                field("company"),
                m.job_id
            );
            println!(
                "     Fit: {}  RRF: {:.4}",
                format!("{:.1}/10", m.fit_score).bold(),
                m.rrf_score
            );
            if let Some(text) = justification {
                println!("     {}", text);
            }
        }
        println!();
    }
}

async fn run_rank(cli: &Cli, config: &Config, job_path: &Path, candidates_path: &Path) -> Result<()> {
    let job: JobSummary = read_json(job_path)?;
    let candidates: Vec<Candidate> = read_json(candidates_path)?;

    let ranked = CandidateRanker::new(&config.scoring).rank(&candidates, &job);

    let provider: Arc<dyn Provider> = Arc::new(OllamaProvider::from_config(config));
    let justifier = justifier(cli, config, provider);

    let mut outputs = Vec::with_capacity(ranked.len());
    for candidate in ranked {
        let (justification, outreach) = match &justifier {
            Some(j) => (
                Some(j.justify_candidate(&candidate.profile, &job, &candidate.result).await),
                Some(j.outreach_message(&candidate.profile, &job).await),
            ),
            None => (None, None),
        };
        outputs.push(RankOutput {
            candidate,
            justification,
            outreach,
        });
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    } else {
        print_ranking(&job, &outputs);
    }
    Ok(())
}

fn print_ranking(job: &JobSummary, outputs: &[RankOutput]) {
    println!(
        "{} {} at {}",
        "Job:".bold().green(),
        job.role.bold(),
        job.company
    );
    println!();

    if outputs.is_empty() {
        println!("{}", "No candidates to rank.".yellow());
        return;
    }

    for output in outputs {
        let RankedCandidate {
            rank,
            profile,
            result,
        } = &output.candidate;

        println!(
            "{}. {} ({})  {}",
            rank,
            profile.name.cyan().bold(),
            profile.title,
            format!("{:.1}/10", result.score).bold()
        );
        if let Some(linkedin) = &profile.linkedin {
            println!("   {}", linkedin);
        }
        for (factor, score) in &result.breakdown {
            println!("   {:<11} {}", format!("{}:", factor.label()), score.explanation);
        }
        if let Some(text) = &output.justification {
            println!("   {} {}", "Why:".bold(), text);
        }
        if let Some(text) = &output.outreach {
            println!("   {} {}", "Message:".bold(), text);
        }
        println!();
    }
}

fn show_config(config: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("{}", "Current Configuration:".bold().green());
    println!();
    println!("{}", "LLM:".bold());
    println!("  Chat Model:     {}", config.llm.chat_model.cyan());
    println!("  Base URL:       {}", config.llm.base_url);
    println!("  Temperature:    {}", config.llm.temperature);
    println!();
    println!("{}", "Embedding:".bold());
    println!("  Model:          {}", config.embedding.model.cyan());
    println!("  Dimension:      {}", config.embedding.dimension);
    println!();
    println!("{}", "Storage:".bold());
    match &config.storage.storage_mode {
        StorageMode::Embedded => println!("  Mode:           embedded"),
        StorageMode::Grpc { url } => println!("  Mode:           grpc ({})", url),
    }
    println!("  Collection:     {}", config.storage.vector_db.collection_name);
    println!();
    println!("{}", "Retrieval:".bold());
    println!("  Top K:          {}", config.retrieval.top_k);
    println!("  RRF k:          {}", config.retrieval.rrf_k);
    println!("  Batch Size:     {}", config.retrieval.batch_size);
    println!("  Top Matches:    {}", config.retrieval.top_matches);
    println!();
    println!("{}", "Scoring:".bold());
    let weights = &config.scoring.weights;
    println!(
        "  Weights:        title {} / experience {} / skills {} / domain {} / tenure -{}",
        weights.title, weights.experience, weights.skills, weights.domain_fit, weights.tenure_penalty
    );
    println!("  Calibration:    ceiling {} ^ {}", config.calibration.ceiling, config.calibration.exponent);
    println!("  Top Candidates: {}", config.scoring.top_candidates);

    Ok(())
}
