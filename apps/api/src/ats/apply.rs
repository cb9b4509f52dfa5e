use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::{ResumeData, Skill};
use crate::models::suggestion::Suggestion;

/// Proficiency given to skills added from a suggestion.
pub const APPLIED_SKILL_LEVEL: &str = "80";

#[derive(Debug, Error, PartialEq)]
pub enum ApplyError {
    #[error("'{0}' suggestions are advisory and cannot be applied")]
    NotApplicable(String),

    #[error("experience entry {index} does not exist (resume has {len})")]
    ExperienceIndexOutOfRange { index: usize, len: usize },

    #[error("suggestion for '{0}' has already been applied")]
    AlreadyApplied(String),
}

/// Resume locations a suggestion can be written back into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyTarget {
    Summary,
    NewSkill,
    ExperienceDescription(usize),
}

impl ApplyTarget {
    /// `None` for advisory-only fields.
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "summary" => Some(Self::Summary),
            "skill" | "newSkill" => Some(Self::NewSkill),
            other => other
                .strip_prefix("experience-")
                .and_then(|rest| rest.strip_suffix("-description"))
                .and_then(|index| index.parse().ok())
                .map(Self::ExperienceDescription),
        }
    }
}

/// Returns a copy of `resume` with `value` written into `field`.
pub fn apply_suggestion(
    resume: &ResumeData,
    field: &str,
    value: &str,
) -> Result<ResumeData, ApplyError> {
    let target =
        ApplyTarget::parse(field).ok_or_else(|| ApplyError::NotApplicable(field.to_string()))?;

    let mut updated = resume.clone();
    match target {
        ApplyTarget::Summary => {
            updated.personal_info.summary = Some(value.to_string());
        }
        ApplyTarget::NewSkill => {
            updated.skills.push(Skill {
                id: Some(format!("skill-{}", Uuid::new_v4())),
                name: Some(value.to_string()),
                level: Some(APPLIED_SKILL_LEVEL.to_string()),
            });
        }
        ApplyTarget::ExperienceDescription(index) => {
            let len = updated.experience.len();
            let entry = updated
                .experience
                .get_mut(index)
                .ok_or(ApplyError::ExperienceIndexOutOfRange { index, len })?;
            entry.description = Some(value.to_string());
        }
    }
    Ok(updated)
}

/// Applies `suggestion` and returns the new resume with the suggestion
/// marked as applied.
pub fn apply(
    resume: &ResumeData,
    suggestion: &Suggestion,
) -> Result<(ResumeData, Suggestion), ApplyError> {
    if suggestion.applied {
        return Err(ApplyError::AlreadyApplied(suggestion.field.clone()));
    }
    let updated = apply_suggestion(resume, &suggestion.field, &suggestion.value)?;
    let mut applied = suggestion.clone();
    applied.applied = true;
    Ok((updated, applied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Experience, PersonalInfo};
    use crate::models::suggestion::{Priority, SuggestionType};

    fn resume() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                name: Some("Ada".to_string()),
                summary: Some("Old summary".to_string()),
                ..Default::default()
            },
            experience: vec![
                Experience {
                    title: Some("Engineer".to_string()),
                    description: Some("first".to_string()),
                    ..Default::default()
                },
                Experience {
                    description: Some("second".to_string()),
                    ..Default::default()
                },
            ],
            skills: vec![Skill {
                name: Some("Rust".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_targets() {
        assert_eq!(ApplyTarget::parse("summary"), Some(ApplyTarget::Summary));
        assert_eq!(ApplyTarget::parse("skill"), Some(ApplyTarget::NewSkill));
        assert_eq!(ApplyTarget::parse("newSkill"), Some(ApplyTarget::NewSkill));
        assert_eq!(
            ApplyTarget::parse("experience-12-description"),
            Some(ApplyTarget::ExperienceDescription(12))
        );
        assert_eq!(ApplyTarget::parse("experience--description"), None);
        assert_eq!(ApplyTarget::parse("education-0"), None);
        assert_eq!(ApplyTarget::parse("dataset-pattern-1"), None);
    }

    #[test]
    fn test_summary_replaces_only_summary() {
        let before = resume();
        let after = apply_suggestion(&before, "summary", "New summary").unwrap();

        let mut expected = before.clone();
        expected.personal_info.summary = Some("New summary".to_string());
        assert_eq!(after, expected);
        // input untouched
        assert_eq!(before.summary(), "Old summary");
    }

    #[test]
    fn test_skill_appends_exactly_one() {
        let before = resume();
        let after = apply_suggestion(&before, "skill", "Docker").unwrap();

        assert_eq!(after.skills.len(), before.skills.len() + 1);
        assert_eq!(after.skills[..1], before.skills[..]);
        let added = after.skills.last().unwrap();
        assert_eq!(added.name.as_deref(), Some("Docker"));
        assert_eq!(added.level.as_deref(), Some("80"));
        assert!(added.id.as_deref().unwrap().starts_with("skill-"));
        assert_eq!(after.experience, before.experience);
        assert_eq!(after.personal_info, before.personal_info);
    }

    #[test]
    fn test_experience_description_replaced_by_index() {
        let after = apply_suggestion(&resume(), "experience-1-description", "rewritten").unwrap();
        assert_eq!(after.experience[0].description.as_deref(), Some("first"));
        assert_eq!(after.experience[1].description.as_deref(), Some("rewritten"));
    }

    #[test]
    fn test_experience_index_out_of_range() {
        let err = apply_suggestion(&resume(), "experience-5-description", "x").unwrap_err();
        assert_eq!(err, ApplyError::ExperienceIndexOutOfRange { index: 5, len: 2 });
    }

    #[test]
    fn test_advisory_fields_rejected() {
        for field in ["format", "keyword", "education-0", "dataset-pattern-2"] {
            let err = apply_suggestion(&resume(), field, "x").unwrap_err();
            assert_eq!(err, ApplyError::NotApplicable(field.to_string()));
        }
    }

    #[test]
    fn test_apply_marks_suggestion() {
        let suggestion = Suggestion::new(
            "summary",
            "Fresh summary",
            SuggestionType::Summary,
            Priority::High,
            "Short summary",
        );
        let (updated, applied) = apply(&resume(), &suggestion).unwrap();
        assert!(applied.applied);
        assert_eq!(updated.summary(), "Fresh summary");

        let err = apply(&updated, &applied).unwrap_err();
        assert_eq!(err, ApplyError::AlreadyApplied("summary".to_string()));
    }
}
