//! Generative text provider: drafts replacement prose for summary and
//! experience suggestions.
//!
//! Strategies are tried in order: the LLM writer (only when a credential is
//! configured), then the local template writer, which is always ready.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::ats::keywords::{tech_stack, EXPERIENCE_LEAD_VERBS, SUMMARY_LEAD_INS};
use crate::ats::outcome::Outcome;
use crate::ats::random::{pick, RandomSource};
use crate::llm_client::prompts::{
    experience_prompt, summary_prompt, EXPERIENCE_MAX_TOKENS, SUMMARY_MAX_TOKENS,
};
use crate::llm_client::LlmClient;
use crate::models::resume::{char_len, text, Experience, ResumeData};

/// Generated summaries must be longer than this to be used.
pub const MIN_SUMMARY_CHARS: usize = 20;
/// Generated experience descriptions must be longer than this to be used.
pub const MIN_EXPERIENCE_CHARS: usize = 30;

/// What a summary draft is written from.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryContext {
    pub role: String,
    /// e.g. "3+ years"; `None` when there is no experience.
    pub years: Option<String>,
    /// Up to three skill names, comma separated. May be empty.
    pub top_skills: String,
}

impl SummaryContext {
    pub fn from_resume(resume: &ResumeData) -> Self {
        let role = non_empty_or(text(&resume.personal_info.title), "Professional");
        let years = (!resume.experience.is_empty())
            .then(|| format!("{}+ years", resume.experience.len()));
        let top_skills = resume
            .skills
            .iter()
            .map(|s| text(&s.name).trim())
            .filter(|name| !name.is_empty())
            .take(3)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            role,
            years,
            top_skills,
        }
    }
}

/// What an experience draft is written from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceContext {
    pub title: String,
    pub company: String,
    pub tech_stack: String,
}

impl ExperienceContext {
    pub fn new(experience: &Experience, skill_names_lower: &[String]) -> Self {
        let stack = tech_stack(skill_names_lower);
        Self {
            title: non_empty_or(text(&experience.title), "Professional"),
            company: non_empty_or(text(&experience.company), "organization"),
            tech_stack: if stack.is_empty() {
                "modern technologies".to_string()
            } else {
                stack.join(", ")
            },
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[async_trait]
pub trait TextStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn summary(&self, ctx: &SummaryContext, rng: &mut dyn RandomSource) -> Outcome<String>;

    async fn experience(
        &self,
        ctx: &ExperienceContext,
        rng: &mut dyn RandomSource,
    ) -> Outcome<String>;
}

// ────────────────────────────────────────────────────────────────────────────
// LLM writer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmWriter(pub LlmClient);

impl LlmWriter {
    async fn generate(&self, prompt: &str, max_tokens: u32, min_chars: usize) -> Outcome<String> {
        match self.0.complete(prompt, max_tokens).await {
            Ok(generated) if char_len(generated.trim()) > min_chars => {
                Outcome::Ready(generated.trim().to_string())
            }
            Ok(generated) => Outcome::unavailable(format!(
                "generated text too short ({} chars)",
                char_len(generated.trim())
            )),
            Err(e) => Outcome::unavailable(e.to_string()),
        }
    }
}

#[async_trait]
impl TextStrategy for LlmWriter {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn summary(&self, ctx: &SummaryContext, _rng: &mut dyn RandomSource) -> Outcome<String> {
        let prompt = summary_prompt(&ctx.role, ctx.years.as_deref(), &ctx.top_skills);
        self.generate(&prompt, SUMMARY_MAX_TOKENS, MIN_SUMMARY_CHARS)
            .await
    }

    async fn experience(
        &self,
        ctx: &ExperienceContext,
        _rng: &mut dyn RandomSource,
    ) -> Outcome<String> {
        let prompt = experience_prompt(&ctx.title, &ctx.company, &ctx.tech_stack);
        self.generate(&prompt, EXPERIENCE_MAX_TOKENS, MIN_EXPERIENCE_CHARS)
            .await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Template writer
// ────────────────────────────────────────────────────────────────────────────

pub struct TemplateWriter;

#[async_trait]
impl TextStrategy for TemplateWriter {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn summary(&self, ctx: &SummaryContext, rng: &mut dyn RandomSource) -> Outcome<String> {
        Outcome::Ready(template_summary(ctx, rng))
    }

    async fn experience(
        &self,
        ctx: &ExperienceContext,
        rng: &mut dyn RandomSource,
    ) -> Outcome<String> {
        Outcome::Ready(template_experience(ctx, rng))
    }
}

pub fn template_summary(ctx: &SummaryContext, rng: &mut dyn RandomSource) -> String {
    let lead = pick(SUMMARY_LEAD_INS, rng).copied().unwrap_or("Experienced");
    let years = ctx
        .years
        .as_deref()
        .map(|y| format!(" with {y} of experience"))
        .unwrap_or_default();
    let skills = if ctx.top_skills.is_empty() {
        String::new()
    } else {
        format!(" specializing in {}", ctx.top_skills)
    };
    format!(
        "{lead} {}{years}{skills}. Proven track record of delivering high-quality solutions \
        and collaborating with cross-functional teams. Strong problem-solving abilities with \
        a focus on continuous improvement and best practices.",
        ctx.role.to_lowercase()
    )
}

pub fn template_experience(ctx: &ExperienceContext, rng: &mut dyn RandomSource) -> String {
    let verb = pick(EXPERIENCE_LEAD_VERBS, rng).copied().unwrap_or("Developed");
    format!(
        "{verb} and maintained scalable solutions using {}, resulting in improved performance \
        and user satisfaction. Collaborated with cross-functional teams to deliver projects on \
        time and within budget. Identified and resolved technical challenges, contributing to \
        overall team success.",
        ctx.tech_stack
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Provider
// ────────────────────────────────────────────────────────────────────────────

/// Ordered chain of text strategies. Never fails: the template is the floor.
#[derive(Clone)]
pub struct TextProvider {
    strategies: Vec<Arc<dyn TextStrategy>>,
}

impl TextProvider {
    /// LLM first when a client is given, then the template.
    pub fn new(llm: Option<LlmClient>) -> Self {
        let mut strategies: Vec<Arc<dyn TextStrategy>> = Vec::new();
        if let Some(client) = llm {
            strategies.push(Arc::new(LlmWriter(client)));
        }
        strategies.push(Arc::new(TemplateWriter));
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn draft_summary(&self, ctx: &SummaryContext, rng: &mut dyn RandomSource) -> String {
        for strategy in &self.strategies {
            match strategy.summary(ctx, rng).await {
                Outcome::Ready(text) => {
                    debug!("Summary drafted by {} writer", strategy.name());
                    return text;
                }
                Outcome::Unavailable(reason) => {
                    info!("{} writer unavailable for summary: {reason}", strategy.name());
                }
            }
        }
        template_summary(ctx, rng)
    }

    pub async fn draft_experience(
        &self,
        ctx: &ExperienceContext,
        rng: &mut dyn RandomSource,
    ) -> String {
        for strategy in &self.strategies {
            match strategy.experience(ctx, rng).await {
                Outcome::Ready(text) => {
                    debug!("Experience drafted by {} writer", strategy.name());
                    return text;
                }
                Outcome::Unavailable(reason) => {
                    info!(
                        "{} writer unavailable for experience: {reason}",
                        strategy.name()
                    );
                }
            }
        }
        template_experience(ctx, rng)
    }
}
