//! Human-readable justifications generated by a chat model.
//!
//! Output here is free text and not deterministic. Provider failures never
//! propagate: they are logged and replaced by a fixed placeholder.

use crate::config::Config;
use crate::provider::{complete, ChatRequest, Message, Provider};
use crate::retrieval::Payload;
use crate::scoring::{CandidateProfile, CandidateScore, JobSummary};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, warn};

pub const JUSTIFICATION_PLACEHOLDER: &str = "Could not generate justification due to an API error.";
pub const OUTREACH_PLACEHOLDER: &str = "Could not generate outreach message due to an API error.";

const OUTREACH_TEMPERATURE: f64 = 0.7;

const MATCH_SYSTEM_PROMPT: &str =
    "You are an expert recruitment assistant helping to explain job matches.";
const CANDIDATE_SYSTEM_PROMPT: &str =
    "You are an expert recruitment assistant explaining candidate-job fit.";
const OUTREACH_SYSTEM_PROMPT: &str =
    "You are a friendly recruiter drafting concise LinkedIn outreach messages.";

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

fn match_prompt(resume: &str, payload: Option<&Payload>, fit_score: f64) -> String {
    let mut job = String::new();
    match payload {
        Some(payload) if !payload.is_empty() => {
            let mut fields: Vec<_> = payload.iter().collect();
            fields.sort();
            for (key, value) in fields {
                let _ = writeln!(job, "- {key}: {value}");
            }
        }
        _ => job.push_str("- N/A\n"),
    }

    format!(
        "Explain the fit score assigned to this resume for the job below.\n\n\
         Resume:\n```text\n{resume}\n```\n\n\
         Job details:\n{job}\n\
         Fit score: {fit_score}/10\n\n\
         Using only the resume and job details above, name the most important skills, \
         technologies or experience they share, and any key requirement the resume lacks if \
         the score is not high. Answer in 1-3 sentences that cite specific matches or gaps \
         to justify the score of {fit_score}/10. Do not repeat the inputs."
    )
}

fn candidate_prompt(profile: &CandidateProfile, job: &JobSummary, result: &CandidateScore) -> String {
    let skills: Vec<&str> = profile.skills.iter().map(String::as_str).collect();
    let factors: String = result
        .breakdown
        .iter()
        .map(|(factor, score)| format!("- {}: {}\n", factor.label(), score.explanation))
        .collect();

    format!(
        "Explain the calculated fit score for this candidate and job.\n\n\
         Candidate:\n\
         - Name: {name}\n\
         - Title: {title}\n\
         - Location: {location}\n\
         - Years of experience: {years}\n\
         - Skills: {skills}\n\
         - LinkedIn: {linkedin}\n\n\
         Job:\n\
         - Role: {role}\n\
         - Company: {company}\n\
         - Required experience: {yoe}\n\
         - Requirements: {requirements}\n\
         - Tech stack: {tech_stack}\n\n\
         Fit score: {score}/10\n\n\
         Score breakdown:\n```text\n{factors}```\n\n\
         Using the breakdown as the main reasons for the score, write 1-2 sentences that cite \
         one or two specific matching or missing factors. Give only the justification.",
        name = or_na(&profile.name),
        title = or_na(&profile.title),
        location = profile.location.as_deref().unwrap_or("N/A"),
        years = profile.years_of_experience,
        skills = or_na(&skills.join(", ")),
        linkedin = profile.linkedin.as_deref().unwrap_or("N/A"),
        role = or_na(&job.role),
        company = or_na(&job.company),
        yoe = or_na(&job.yoe),
        requirements = or_na(&job.requirements),
        tech_stack = or_na(&job.tech_stack),
        score = result.score,
    )
}

fn outreach_prompt(profile: &CandidateProfile, job: &JobSummary, max_chars: usize) -> String {
    let skills: Vec<&str> = profile.skills.iter().map(String::as_str).collect();
    let name = if profile.name.trim().is_empty() {
        "Candidate"
    } else {
        profile.name.as_str()
    };

    format!(
        "Write a LinkedIn message to {name} about the {role} position at {company}.\n\n\
         Candidate title: {title}\n\
         Candidate skills: {skills}\n\
         Job requirements: {requirements}\n\
         Job tech stack: {tech_stack}\n\n\
         Mention one specific point where the candidate's title or skills match the job, \
         briefly introduce the role, and end with a short call to action such as \
         \"Open to a quick chat?\". Keep a professional, inviting tone. The whole message must \
         not exceed {max_chars} characters. Give only the message text.",
        role = or_na(&job.role),
        company = or_na(&job.company),
        title = or_na(&profile.title),
        skills = or_na(&skills.join(", ")),
        requirements = or_na(&job.requirements),
        tech_stack = or_na(&job.tech_stack),
    )
}

/// Truncates to at most `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Generates justifications and outreach messages.
#[derive(Clone)]
pub struct Justifier {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f64,
    match_max_tokens: u32,
    candidate_max_tokens: u32,
    outreach_max_tokens: u32,
    outreach_max_chars: usize,
}

impl Justifier {
    pub fn new(provider: Arc<dyn Provider>, config: &Config) -> Self {
        let justification = &config.justification;
        Self {
            provider,
            model: config.llm.chat_model.clone(),
            temperature: config.llm.temperature,
            match_max_tokens: justification.match_max_tokens,
            candidate_max_tokens: justification.candidate_max_tokens,
            outreach_max_tokens: justification.outreach_max_tokens,
            outreach_max_chars: justification.outreach_max_chars,
        }
    }

    async fn ask(&self, system: &str, prompt: String, temperature: f64, max_tokens: u32) -> Option<String> {
        let request = ChatRequest::new(
            self.model.clone(),
            vec![Message::system(system), Message::user(prompt)],
        )
        .with_temperature(temperature)
        .with_max_tokens(max_tokens);

        match complete(self.provider.as_ref(), request).await {
            Ok(reply) if !reply.trim().is_empty() => Some(reply.trim().to_string()),
            Ok(_) => {
                warn!(model = %self.model, "Model returned an empty reply");
                None
            }
            Err(e) => {
                warn!(model = %self.model, error = %e, "Generation failed");
                None
            }
        }
    }

    /// Explains why a resume received `fit_score` for a job.
    pub async fn justify_match(&self, resume: &str, payload: Option<&Payload>, fit_score: f64) -> String {
        debug!(fit_score, "Generating match justification");
        self.ask(
            MATCH_SYSTEM_PROMPT,
            match_prompt(resume, payload, fit_score),
            self.temperature,
            self.match_max_tokens,
        )
        .await
        .unwrap_or_else(|| JUSTIFICATION_PLACEHOLDER.to_string())
    }

    /// Explains a candidate's score from its breakdown.
    pub async fn justify_candidate(
        &self,
        profile: &CandidateProfile,
        job: &JobSummary,
        result: &CandidateScore,
    ) -> String {
        debug!(candidate = %profile.name, score = result.score, "Generating candidate justification");
        self.ask(
            CANDIDATE_SYSTEM_PROMPT,
            candidate_prompt(profile, job, result),
            self.temperature,
            self.candidate_max_tokens,
        )
        .await
        .unwrap_or_else(|| JUSTIFICATION_PLACEHOLDER.to_string())
    }

    /// Drafts a short outreach message, cut to the configured length.
    pub async fn outreach_message(&self, profile: &CandidateProfile, job: &JobSummary) -> String {
        debug!(candidate = %profile.name, "Generating outreach message");
        self.ask(
            OUTREACH_SYSTEM_PROMPT,
            outreach_prompt(profile, job, self.outreach_max_chars),
            OUTREACH_TEMPERATURE,
            self.outreach_max_tokens,
        )
        .await
        .map(|message| truncate_chars(&message, self.outreach_max_chars))
        .unwrap_or_else(|| OUTREACH_PLACEHOLDER.to_string())
    }
}
