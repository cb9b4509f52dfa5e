//! Score Calculator: pluggable strategies tried in order until one is ready.
//!
//! Default chain: `DatasetScorer` (when the corpus is enabled), then
//! `RuleScorer`, which is always ready. The calculator therefore always
//! returns a structurally valid `ScoreResult`.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::ats::keywords::{contains_any, ACTION_VERBS};
use crate::ats::outcome::Outcome;
use crate::ats::patterns::{average_score, frequency, COMMON_PATTERN_SHARE, SAMPLE_LIMIT};
use crate::ats::random::RandomSource;
use crate::corpus_client::ExampleSource;
use crate::models::resume::{char_len, text, ResumeData};
use crate::models::suggestion::{ExternalExample, ScoreResult, ScoreSource};

/// Share of the blended score taken from the pattern match.
pub const PATTERN_WEIGHT: f64 = 0.6;
/// Share of the blended score taken from the sample average.
pub const BASELINE_WEIGHT: f64 = 0.4;

pub const SUMMARY_PENALTY: u32 = 15;
pub const SKILLS_PENALTY: u32 = 10;
pub const EXPERIENCE_PENALTY: u32 = 20;
pub const ACTION_VERB_PENALTY: u32 = 10;
pub const METRICS_PENALTY: u32 = 10;
pub const CONTACT_PENALTY: u32 = 5;
pub const EDUCATION_PENALTY: u32 = 10;

const MIN_SUMMARY_CHARS: usize = 50;
const MIN_SKILLS: usize = 5;
const MIN_DESCRIPTION_CHARS: usize = 30;

#[async_trait]
pub trait ScoreStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn score(&self, resume: &ResumeData, rng: &mut dyn RandomSource) -> Outcome<ScoreResult>;
}

// ────────────────────────────────────────────────────────────────────────────
// Dataset-based scorer
// ────────────────────────────────────────────────────────────────────────────

struct WeightedPattern {
    regex: Regex,
    weight: u32,
    description: &'static str,
}

fn weighted(re: &str, weight: u32, description: &'static str) -> WeightedPattern {
    WeightedPattern {
        regex: Regex::new(re).expect("score pattern regex is valid"),
        weight,
        description,
    }
}

static SCORE_PATTERNS: Lazy<Vec<WeightedPattern>> = Lazy::new(|| {
    vec![
        weighted(r"\d+%", 3, "quantifiable metrics"),
        weighted(r"(?i)\d+\+ (years?|months?)", 2, "experience duration"),
        weighted(
            r"(?i)\b(developed|implemented|led|designed|optimized|created|delivered|achieved)\b",
            3,
            "action verbs",
        ),
        weighted(
            r"(?i)\b(aws|azure|kubernetes|docker|jenkins|terraform)\b",
            2,
            "modern technologies",
        ),
        weighted(r"(?i)\d+ (projects?|teams?|users?)", 3, "quantifiable achievements"),
        weighted(r"(?i)(bachelor|master|degree|certification)", 1, "education credentials"),
    ]
});

/// Scores by similarity to a freshly fetched corpus sample.
pub struct DatasetScorer {
    source: Arc<dyn ExampleSource>,
}

impl DatasetScorer {
    pub fn new(source: Arc<dyn ExampleSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ScoreStrategy for DatasetScorer {
    fn name(&self) -> &'static str {
        "dataset"
    }

    async fn score(&self, resume: &ResumeData, rng: &mut dyn RandomSource) -> Outcome<ScoreResult> {
        match self.source.high_scoring_examples(SAMPLE_LIMIT, rng).await {
            Ok(examples) => match score_against_examples(resume, &examples) {
                Some(result) => Outcome::Ready(result),
                None => Outcome::unavailable("empty sample"),
            },
            Err(e) => Outcome::unavailable(e.to_string()),
        }
    }
}

/// Weighted pattern match blended with the sample average, clamped to the
/// sample's observed score range.
pub fn score_against_examples(
    resume: &ResumeData,
    examples: &[ExternalExample],
) -> Option<ScoreResult> {
    if examples.is_empty() {
        return None;
    }

    let user_text = resume.analysis_text();
    let sample_texts: Vec<String> = examples.iter().map(|e| e.text.to_lowercase()).collect();

    let mut feedback = Vec::new();
    let mut matched = 0;
    let mut total = 0;

    for pattern in SCORE_PATTERNS.iter() {
        total += pattern.weight;
        if pattern.regex.is_match(&user_text) {
            matched += pattern.weight;
            continue;
        }
        let share = frequency(&pattern.regex, &sample_texts);
        if share > COMMON_PATTERN_SHARE {
            feedback.push(format!(
                "Missing {} found in {}% of high-scoring resumes",
                pattern.description,
                (share * 100.0).round()
            ));
        }
    }

    let pattern_score = matched as f64 / total as f64 * 100.0;
    let avg = average_score(examples);
    let min = examples
        .iter()
        .map(|e| e.ats_score)
        .fold(f64::INFINITY, f64::min);
    let max = examples
        .iter()
        .map(|e| e.ats_score)
        .fold(f64::NEG_INFINITY, f64::max);

    let estimated = (pattern_score * PATTERN_WEIGHT + avg * BASELINE_WEIGHT).round();
    let clamped = estimated.max(min).min(max);
    let score = clamped.round().clamp(0.0, 100.0) as u32;

    let verdict = if score >= 80 {
        format!("Based on dataset analysis, your resume matches patterns from high-scoring resumes (avg dataset score: {avg:.1})")
    } else if score >= 60 {
        format!("Your resume has some elements of high-scoring resumes (dataset avg: {avg:.1}), but improvements are needed.")
    } else {
        format!("Compared to high-scoring resumes in the dataset (avg: {avg:.1}), your resume needs significant improvements.")
    };
    feedback.insert(0, verdict);

    Some(ScoreResult {
        score,
        feedback,
        source: ScoreSource::Dataset,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Rule-based scorer
// ────────────────────────────────────────────────────────────────────────────

static METRIC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+%|\d+\+").expect("metric regex is valid"));

/// Fixed deductions from 100. Always ready.
pub struct RuleScorer;

#[async_trait]
impl ScoreStrategy for RuleScorer {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn score(&self, resume: &ResumeData, _rng: &mut dyn RandomSource) -> Outcome<ScoreResult> {
        Outcome::Ready(rule_based_score(resume))
    }
}

pub fn rule_based_score(resume: &ResumeData) -> ScoreResult {
    let mut feedback = Vec::new();
    let mut deductions = 0;

    if char_len(resume.summary()) < MIN_SUMMARY_CHARS {
        deductions += SUMMARY_PENALTY;
        feedback.push("Professional summary is missing or too short".to_string());
    }

    if resume.skills.len() < MIN_SKILLS {
        deductions += SKILLS_PENALTY;
        feedback.push("Add more relevant skills (aim for 5-10)".to_string());
    }

    let thin = resume
        .experience
        .iter()
        .filter(|e| char_len(text(&e.description)) < MIN_DESCRIPTION_CHARS)
        .count();
    if thin > 0 {
        deductions += EXPERIENCE_PENALTY;
        let noun = if thin > 1 { "entries" } else { "entry" };
        feedback.push(format!(
            "{thin} experience {noun} missing detailed descriptions"
        ));
    }

    let experience_text = resume.experience_text().to_lowercase();
    if !contains_any(&experience_text, ACTION_VERBS) {
        deductions += ACTION_VERB_PENALTY;
        feedback.push("Use strong action verbs in experience descriptions".to_string());
    }

    if !METRIC_PATTERN.is_match(&experience_text) {
        deductions += METRICS_PENALTY;
        feedback.push("Add quantifiable results (percentages, numbers) to show impact".to_string());
    }

    if text(&resume.personal_info.email).is_empty() || text(&resume.personal_info.phone).is_empty() {
        deductions += CONTACT_PENALTY;
        feedback.push("Ensure contact information is complete".to_string());
    }

    if resume.education.is_empty() {
        deductions += EDUCATION_PENALTY;
        feedback.push("Add education details".to_string());
    }

    let score = 100u32.saturating_sub(deductions);
    let verdict = if score >= 80 {
        "Your resume is well-optimized for ATS systems!"
    } else if score >= 60 {
        "Your resume is good but could be improved for better ATS compatibility."
    } else {
        "Your resume needs significant improvements for ATS compatibility."
    };
    feedback.insert(0, verdict.to_string());

    ScoreResult {
        score,
        feedback,
        source: ScoreSource::Rules,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Calculator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ScoreCalculator {
    strategies: Vec<Arc<dyn ScoreStrategy>>,
}

impl ScoreCalculator {
    /// Dataset scoring first when a corpus is given, then rules.
    pub fn new(corpus: Option<Arc<dyn ExampleSource>>) -> Self {
        let mut strategies: Vec<Arc<dyn ScoreStrategy>> = Vec::new();
        if let Some(source) = corpus {
            strategies.push(Arc::new(DatasetScorer::new(source)));
        }
        strategies.push(Arc::new(RuleScorer));
        Self { strategies }
    }

    pub async fn calculate(&self, resume: &ResumeData, rng: &mut dyn RandomSource) -> ScoreResult {
        for strategy in &self.strategies {
            match strategy.score(resume, rng).await {
                Outcome::Ready(result) => {
                    info!(
                        "ATS score {}/100 from {} strategy",
                        result.score,
                        strategy.name()
                    );
                    return result;
                }
                Outcome::Unavailable(reason) => {
                    warn!("{} scoring unavailable: {reason}", strategy.name());
                }
            }
        }
        rule_based_score(resume)
    }
}
