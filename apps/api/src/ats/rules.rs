//! Rule-based analyzer: deterministic checks that need no network access
//! (beyond the optional text writer used to draft replacements).
//!
//! Checks run in a fixed order and each appends at most one suggestion
//! (one per entry for experience and education):
//! 1. summary length
//! 2. missing technical skills
//! 3. experience description quality
//! 4. education completeness
//! 5. contact format
//! 6. keyword density

use futures::future::join_all;

use crate::ats::keywords::{
    contains_any, matching, missing_technical, ACTION_VERBS, METRIC_PHRASES, REWRITE_VERBS,
    TECHNICAL,
};
use crate::ats::random::{pick, pick_within, RandomSource};
use crate::ats::writer::{ExperienceContext, SummaryContext, TextProvider};
use crate::models::resume::{char_len, text, Experience, ResumeData};
use crate::models::suggestion::{Priority, Suggestion, SuggestionType};

pub const MIN_SUMMARY_CHARS: usize = 50;
pub const MAX_SUMMARY_CHARS: usize = 200;
pub const TRUNCATED_SUMMARY_CHARS: usize = 150;
pub const MIN_DESCRIPTION_CHARS: usize = 30;
/// Skill suggestions stop once a resume lists this many skills.
pub const SKILL_SUGGESTION_CAP: usize = 10;
/// Missing skills are picked from this many leading candidates.
pub const SKILL_CANDIDATE_WINDOW: usize = 5;
pub const MIN_DISTINCT_KEYWORDS: usize = 5;
pub const KEYWORD_SKILL_CAP: usize = 8;

/// Runs every rule check in order.
///
/// The summary and experience drafts may each wait on the LLM, so they run
/// concurrently, each with its own forked random source. Results keep check order.
pub async fn analyze(
    resume: &ResumeData,
    writer: &TextProvider,
    rng: &mut dyn RandomSource,
) -> Vec<Suggestion> {
    let mut summary_rng = rng.fork();
    let mut experience_rngs: Vec<Box<dyn RandomSource>> =
        resume.experience.iter().map(|_| rng.fork()).collect();

    let skill_names = resume.skill_names_lower();
    let missing_skill = check_missing_skills(resume, &skill_names, rng);

    let experience_checks = resume
        .experience
        .iter()
        .zip(experience_rngs.iter_mut())
        .enumerate()
        .map(|(index, (experience, entry_rng))| {
            check_experience(index, experience, &skill_names, writer, entry_rng.as_mut())
        });

    let (summary, experience) = tokio::join!(
        check_summary(resume, writer, summary_rng.as_mut()),
        join_all(experience_checks)
    );

    let mut suggestions = Vec::new();
    suggestions.extend(summary);
    suggestions.extend(missing_skill);
    suggestions.extend(experience.into_iter().flatten());
    suggestions.extend(check_education(resume));
    suggestions.extend(check_contact_format(resume));
    suggestions.extend(check_keyword_density(resume));

    suggestions
}

async fn check_summary(
    resume: &ResumeData,
    writer: &TextProvider,
    rng: &mut dyn RandomSource,
) -> Option<Suggestion> {
    let summary = resume.summary();
    let length = char_len(summary);

    if length < MIN_SUMMARY_CHARS {
        let ctx = SummaryContext::from_resume(resume);
        let drafted = writer.draft_summary(&ctx, rng).await;
        return Some(Suggestion::new(
            "summary",
            drafted,
            SuggestionType::Summary,
            Priority::High,
            "Professional summary should be 50-150 words and highlight key skills and experience",
        ));
    }

    if length > MAX_SUMMARY_CHARS {
        let truncated: String = summary.chars().take(TRUNCATED_SUMMARY_CHARS).collect();
        return Some(Suggestion::new(
            "summary",
            format!("{truncated}..."),
            SuggestionType::Summary,
            Priority::Medium,
            "Summary is too long. ATS-friendly summaries should be 50-150 words",
        ));
    }

    None
}

fn check_missing_skills(
    resume: &ResumeData,
    skill_names: &[String],
    rng: &mut dyn RandomSource,
) -> Option<Suggestion> {
    if resume.skills.len() >= SKILL_SUGGESTION_CAP {
        return None;
    }
    let missing = missing_technical(skill_names);
    let skill = pick_within(&missing, SKILL_CANDIDATE_WINDOW, rng)?;
    Some(Suggestion::new(
        "skill",
        *skill,
        SuggestionType::Skill,
        Priority::Medium,
        format!("Adding relevant technical skills like \"{skill}\" can improve ATS keyword matching"),
    ))
}

async fn check_experience(
    index: usize,
    experience: &Experience,
    skill_names: &[String],
    writer: &TextProvider,
    rng: &mut dyn RandomSource,
) -> Option<Suggestion> {
    let field = format!("experience-{index}-description");
    let description = text(&experience.description);

    if char_len(description.trim()) < MIN_DESCRIPTION_CHARS {
        let ctx = ExperienceContext::new(experience, skill_names);
        let drafted = writer.draft_experience(&ctx, rng).await;
        return Some(Suggestion::new(
            field,
            drafted,
            SuggestionType::Experience,
            Priority::High,
            "Experience descriptions should be detailed with action verbs and quantifiable achievements",
        ));
    }

    let has_action_verb = contains_any(description, ACTION_VERBS);
    let starts_with_letter = description
        .to_lowercase()
        .starts_with(|c: char| c.is_ascii_lowercase());

    if !has_action_verb && !starts_with_letter {
        return Some(Suggestion::new(
            field,
            prepend_action_verb(description, rng),
            SuggestionType::Experience,
            Priority::Medium,
            "Start bullet points with strong action verbs (e.g., \"Developed\", \"Led\", \"Implemented\")",
        ));
    }

    if !description.chars().any(|c| c.is_ascii_digit()) {
        return Some(Suggestion::new(
            field,
            append_metric_hint(description, rng),
            SuggestionType::Experience,
            Priority::Medium,
            "Add quantifiable results (percentages, numbers) to demonstrate impact",
        ));
    }

    None
}

/// Prefixes a random action verb and lower-cases the first letter that
/// follows it, skipping any leading bullet or punctuation.
fn prepend_action_verb(description: &str, rng: &mut dyn RandomSource) -> String {
    let verb = pick(REWRITE_VERBS, rng).copied().unwrap_or("Developed");
    format!("{verb} {}", lowercase_first_letter(description.trim()))
}

fn append_metric_hint(description: &str, rng: &mut dyn RandomSource) -> String {
    let metric = pick(METRIC_PHRASES, rng).copied().unwrap_or("by 30%");
    format!(
        "{} (Consider adding quantifiable results, e.g., \"{metric}\")",
        description.trim()
    )
}

fn lowercase_first_letter(s: &str) -> String {
    match s.char_indices().find(|(_, c)| c.is_alphabetic()) {
        Some((at, letter)) => {
            let rest = &s[at + letter.len_utf8()..];
            format!("{}{}{rest}", &s[..at], letter.to_lowercase())
        }
        None => s.to_string(),
    }
}

fn check_education(resume: &ResumeData) -> Vec<Suggestion> {
    resume
        .education
        .iter()
        .enumerate()
        .filter(|(_, edu)| text(&edu.degree).is_empty() || text(&edu.school).is_empty())
        .map(|(index, _)| {
            Suggestion::new(
                format!("education-{index}"),
                "Complete education details improve ATS parsing",
                SuggestionType::Education,
                Priority::High,
                "Education section should include degree, school name, and graduation date",
            )
        })
        .collect()
}

fn check_contact_format(resume: &ResumeData) -> Option<Suggestion> {
    let email = text(&resume.personal_info.email);
    if email.is_empty() || email.contains('@') {
        return None;
    }
    Some(Suggestion::new(
        "format",
        "Ensure email format is correct",
        SuggestionType::Format,
        Priority::High,
        "ATS systems parse contact information. Ensure email format is valid",
    ))
}

fn check_keyword_density(resume: &ResumeData) -> Option<Suggestion> {
    let distinct = matching(&resume.analysis_text(), TECHNICAL).len();
    if distinct >= MIN_DISTINCT_KEYWORDS || resume.skills.len() >= KEYWORD_SKILL_CAP {
        return None;
    }
    Some(Suggestion::new(
        "keyword",
        "Add more industry-relevant keywords",
        SuggestionType::Keyword,
        Priority::Medium,
        "ATS systems match resumes to job descriptions using keywords. Add more relevant technical terms",
    ))
}
