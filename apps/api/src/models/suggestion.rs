use serde::{Deserialize, Serialize};

/// Which part of the resume a suggestion concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Summary,
    Skill,
    Experience,
    Education,
    Format,
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One recommended edit or piece of advice.
///
/// `field` says where the value would go. Only `summary`, `skill` and
/// `experience-<index>-description` can be applied; everything else is advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub field: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub priority: Priority,
    pub reason: String,
    #[serde(default)]
    pub applied: bool,
}

impl Suggestion {
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        kind: SuggestionType,
        priority: Priority,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            kind,
            priority,
            reason: reason.into(),
            applied: false,
        }
    }
}

/// Which scoring strategy produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Dataset,
    Rules,
}

/// Compatibility score plus explanation. `feedback[0]` is the verdict line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u32,
    pub feedback: Vec<String>,
    pub source: ScoreSource,
}

/// A pre-scored resume sampled from the remote corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalExample {
    pub text: String,
    pub ats_score: f64,
}
