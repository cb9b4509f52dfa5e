use serde::{Deserialize, Serialize};

/// The resume aggregate exactly as the editor holds it.
///
/// Every scalar is optional and every list may be empty: the editor keeps
/// blank placeholder records around, so nothing here is guaranteed to be filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: Option<String>,
    pub degree: Option<String>,
    pub school: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub id: Option<String>,
    pub name: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Achievement {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

/// Borrow an optional field as `&str`, treating absence as empty.
pub fn text(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("")
}

/// Character count in Unicode scalar values.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl ResumeData {
    pub fn summary(&self) -> &str {
        text(&self.personal_info.summary)
    }

    /// Lowercased skill names, placeholders included.
    pub fn skill_names_lower(&self) -> Vec<String> {
        self.skills
            .iter()
            .map(|s| text(&s.name).to_lowercase())
            .collect()
    }

    /// All experience descriptions joined with a single space.
    pub fn experience_text(&self) -> String {
        self.experience
            .iter()
            .map(|e| text(&e.description))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Lowercased `summary + experience descriptions + skill names`, the text
    /// every keyword and pattern check runs against.
    pub fn analysis_text(&self) -> String {
        let skills = self
            .skills
            .iter()
            .map(|s| text(&s.name))
            .collect::<Vec<_>>()
            .join(" ");
        [self.summary().to_string(), self.experience_text(), skills]
            .join(" ")
            .to_lowercase()
    }
}
