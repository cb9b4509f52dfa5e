//! Dataset-pattern analyzer: compares the resume against a sample of
//! high-scoring resumes from the remote corpus.
//!
//! Best-effort: any corpus failure yields `Outcome::Unavailable` and the
//! engine carries on with rule-based suggestions only.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::ats::outcome::Outcome;
use crate::ats::random::{shuffle, RandomSource};
use crate::corpus_client::ExampleSource;
use crate::models::resume::{char_len, text, ResumeData};
use crate::models::suggestion::{ExternalExample, Priority, Suggestion, SuggestionType};

/// Examples requested per analysis.
pub const SAMPLE_LIMIT: usize = 100;
/// A pattern counts as "common" above this share of sampled examples.
pub const COMMON_PATTERN_SHARE: f64 = 0.7;
const MIN_SAMPLE_SUMMARY_CHARS: usize = 30;
const SHORT_SUMMARY_CHARS: usize = 50;
const TOP_SKILLS: usize = 10;
const SKILL_SUGGESTION_CAP: usize = 10;
/// Output is truncated to `MIN_OUTPUT + rng.index(OUTPUT_SPREAD)` suggestions.
const MIN_OUTPUT: usize = 3;
const OUTPUT_SPREAD: usize = 3;

/// A structural trait of high-scoring resumes.
pub struct StructuralPattern {
    pub description: &'static str,
    pub example: &'static str,
    pub kind: SuggestionType,
    pub priority: Priority,
    pub regex: Regex,
}

fn pattern(
    re: &str,
    description: &'static str,
    example: &'static str,
    kind: SuggestionType,
    priority: Priority,
) -> StructuralPattern {
    StructuralPattern {
        description,
        example,
        kind,
        priority,
        regex: Regex::new(re).expect("structural pattern regex is valid"),
    }
}

pub static STRUCTURAL_PATTERNS: Lazy<Vec<StructuralPattern>> = Lazy::new(|| {
    vec![
        pattern(
            r"\d+%",
            "quantifiable metrics (percentages)",
            "30% improvement",
            SuggestionType::Experience,
            Priority::High,
        ),
        pattern(
            r"(?i)\d+\+ (years?|months?|years of)",
            "experience duration",
            "5+ years of experience",
            SuggestionType::Experience,
            Priority::Medium,
        ),
        pattern(
            r"(?i)\b(developed|implemented|led|designed|optimized|created|delivered|achieved|increased|reduced|improved|managed|built|deployed)\b",
            "strong action verbs",
            "Developed, Led, Implemented",
            SuggestionType::Experience,
            Priority::High,
        ),
        pattern(
            r"(?i)\b(aws|azure|kubernetes|docker|jenkins|terraform|ansible|git|ci/cd)\b",
            "modern DevOps/cloud technologies",
            "AWS, Docker, Kubernetes",
            SuggestionType::Skill,
            Priority::Medium,
        ),
        pattern(
            r"(?i)\d+ (projects?|teams?|users?|customers?|clients?|companies?)",
            "quantifiable achievements",
            "100+ users, 5 projects",
            SuggestionType::Experience,
            Priority::High,
        ),
        pattern(
            r"(?i)(bachelor|master|phd|degree|certification|certified)",
            "educational credentials",
            "Bachelor's degree, Certifications",
            SuggestionType::Education,
            Priority::Medium,
        ),
    ]
});

static SKILL_VOCABULARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(java|python|javascript|react|node\.js|spring|sql|mongodb|docker|kubernetes|aws|azure|git|agile|scrum|devops|machine learning|ai|ml)\b",
    )
    .expect("skill vocabulary regex is valid")
});

/// Share of `texts` (already lowercased) matching `regex`.
pub fn frequency(regex: &Regex, texts: &[String]) -> f64 {
    if texts.is_empty() {
        return 0.0;
    }
    let hits = texts.iter().filter(|t| regex.is_match(t)).count();
    hits as f64 / texts.len() as f64
}

pub fn average_score(examples: &[ExternalExample]) -> f64 {
    if examples.is_empty() {
        return 0.0;
    }
    examples.iter().map(|e| e.ats_score).sum::<f64>() / examples.len() as f64
}

/// Fetches a sample and derives suggestions from it.
pub async fn analyze(
    resume: &ResumeData,
    source: &dyn ExampleSource,
    rng: &mut dyn RandomSource,
) -> Outcome<Vec<Suggestion>> {
    let examples = match source.high_scoring_examples(SAMPLE_LIMIT, rng).await {
        Ok(examples) => examples,
        Err(e) => {
            warn!("Dataset patterns unavailable, using rule-based suggestions only: {e}");
            return Outcome::unavailable(e.to_string());
        }
    };
    info!(
        "Using {} high-scoring resume examples from dataset",
        examples.len()
    );

    let suggestions = suggest_from_examples(resume, &examples, rng);
    if suggestions.is_empty() {
        return Outcome::unavailable("no pattern gaps found");
    }
    Outcome::Ready(suggestions)
}

/// Pattern-gap suggestions against an already fetched sample, shuffled and
/// cut to three to five entries.
pub fn suggest_from_examples(
    resume: &ResumeData,
    examples: &[ExternalExample],
    rng: &mut dyn RandomSource,
) -> Vec<Suggestion> {
    if examples.is_empty() {
        return Vec::new();
    }

    let sample_texts: Vec<String> = examples.iter().map(|e| e.text.to_lowercase()).collect();
    let user_text = resume.analysis_text();
    let avg_score = average_score(examples);

    let mut suggestions = pattern_gaps(&user_text, &sample_texts, avg_score);
    suggestions.extend(summary_benchmark(resume, &sample_texts));
    suggestions.extend(frequent_missing_skill(resume, &sample_texts, avg_score));

    shuffle(&mut suggestions, rng);
    let keep = suggestions.len().min(MIN_OUTPUT + rng.index(OUTPUT_SPREAD));
    suggestions.truncate(keep);

    for (index, suggestion) in suggestions.iter_mut().enumerate() {
        suggestion.field = format!("dataset-pattern-{index}");
    }
    suggestions
}

fn pattern_gaps(user_text: &str, sample_texts: &[String], avg_score: f64) -> Vec<Suggestion> {
    STRUCTURAL_PATTERNS
        .iter()
        .filter(|p| !p.regex.is_match(user_text))
        .filter_map(|p| {
            let share = frequency(&p.regex, sample_texts);
            (share > COMMON_PATTERN_SHARE).then(|| {
                Suggestion::new(
                    "",
                    format!(
                        "Add {} to your resume. Example: \"{}\". Found in {}% of high-scoring resumes.",
                        p.description,
                        p.example,
                        (share * 100.0).round()
                    ),
                    p.kind,
                    p.priority,
                    format!(
                        "High-scoring resumes (avg score: {avg_score:.1}) commonly include {}",
                        p.description
                    ),
                )
            })
        })
        .collect()
}

/// Text after a `summary` label, up to the next line break or section label.
pub fn extract_summary(text: &str) -> Option<&str> {
    const TERMINATORS: [&str; 4] = ["\n", "experience", "education", "skills"];

    let start = text.find("summary")? + "summary".len();
    let rest = text[start..].trim_start_matches(|c: char| c == ':' || c.is_whitespace());
    let first = rest.chars().next()?;
    let search_from = first.len_utf8();

    let end = TERMINATORS
        .iter()
        .filter_map(|t| rest[search_from..].find(t))
        .min()
        .map(|pos| pos + search_from)
        .unwrap_or(rest.len());

    Some(rest[..end].trim())
}

fn summary_benchmark(resume: &ResumeData, sample_texts: &[String]) -> Option<Suggestion> {
    let lengths: Vec<usize> = sample_texts
        .iter()
        .filter_map(|t| extract_summary(t))
        .map(char_len)
        .filter(|&len| len > MIN_SAMPLE_SUMMARY_CHARS)
        .collect();
    if lengths.is_empty() {
        return None;
    }

    if char_len(resume.summary()) >= SHORT_SUMMARY_CHARS {
        return None;
    }

    let avg_len = (lengths.iter().sum::<usize>() as f64 / lengths.len() as f64).round();
    Some(Suggestion::new(
        "",
        format!(
            "Professional summaries in high-scoring resumes average {avg_len} characters with key skills and achievements."
        ),
        SuggestionType::Summary,
        Priority::High,
        format!("High-scoring resumes typically have detailed professional summaries (avg: {avg_len} chars)"),
    ))
}

/// Skill vocabulary terms by descending frequency across the sample; ties
/// keep first-seen order.
pub fn top_sample_skills(sample_texts: &[String]) -> Vec<String> {
    let joined = sample_texts.join(" ");
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for m in SKILL_VOCABULARY.find_iter(&joined) {
        let skill = m.as_str().to_lowercase();
        let count = counts.entry(skill.clone()).or_insert(0);
        if *count == 0 {
            order.push(skill);
        }
        *count += 1;
    }

    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.truncate(TOP_SKILLS);
    order
}

fn frequent_missing_skill(
    resume: &ResumeData,
    sample_texts: &[String],
    avg_score: f64,
) -> Option<Suggestion> {
    let user_skills: Vec<String> = resume
        .skills
        .iter()
        .map(|s| text(&s.name).trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect();
    if user_skills.len() >= SKILL_SUGGESTION_CAP {
        return None;
    }

    let skill = top_sample_skills(sample_texts).into_iter().find(|skill| {
        !user_skills
            .iter()
            .any(|us| us.contains(skill.as_str()) || skill.contains(us.as_str()))
    })?;

    Some(Suggestion::new(
        "",
        format!(
            "Consider adding \"{skill}\" - it appears frequently in high-scoring resumes (avg score: {avg_score:.1})"
        ),
        SuggestionType::Skill,
        Priority::Medium,
        "Skills frequently found in high-ATS-scoring resumes",
    ))
}
