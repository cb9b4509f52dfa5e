// Prompt templates for generated resume prose.
// Placeholders in braces are replaced before sending.

use crate::ats::keywords::SOFT;

/// Output budget for a generated summary.
pub const SUMMARY_MAX_TOKENS: u32 = 150;

/// Output budget for a generated experience description.
pub const EXPERIENCE_MAX_TOKENS: u32 = 200;

pub const SUMMARY_PROMPT_TEMPLATE: &str = "Write a professional 2-3 sentence resume summary for a {role}{years}{skills}. \
    Make it ATS-friendly with relevant keywords and action verbs. \
    Where it fits naturally, mention one soft skill such as {soft_skills}. \
    Keep it concise (50-150 words). Return only the summary text.";

pub const EXPERIENCE_PROMPT_TEMPLATE: &str = "Write a professional 2-3 bullet point description for a {title} role at {company} using {tech_stack}. \
    Include action verbs, quantifiable metrics (percentages or numbers), and ATS-friendly keywords. \
    Make it concise and impactful. Return only the description text.";

pub fn summary_prompt(role: &str, years: Option<&str>, top_skills: &str) -> String {
    let years = years
        .map(|y| format!(" with {y} of experience"))
        .unwrap_or_default();
    let skills = if top_skills.is_empty() {
        String::new()
    } else {
        format!(" and skills in {top_skills}")
    };
    SUMMARY_PROMPT_TEMPLATE
        .replace("{role}", role)
        .replace("{years}", &years)
        .replace("{skills}", &skills)
        .replace("{soft_skills}", &SOFT[..3].join(", "))
}

pub fn experience_prompt(title: &str, company: &str, tech_stack: &str) -> String {
    EXPERIENCE_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{company}", company)
        .replace("{tech_stack}", tech_stack)
}
