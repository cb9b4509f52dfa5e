use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::ats::outcome::Outcome;
use crate::ats::random::RandomSeed;
use crate::ats::scoring::ScoreCalculator;
use crate::ats::writer::TextProvider;
use crate::ats::{patterns, rules};
use crate::corpus_client::ExampleSource;
use crate::models::resume::ResumeData;
use crate::models::suggestion::{ScoreResult, Suggestion};

// Streams handed to RandomSeed::source, one per concurrent consumer.
const PATTERN_STREAM: u64 = 0;
const RULE_STREAM: u64 = 1;
const SCORE_STREAM: u64 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub suggestions: Vec<Suggestion>,
    pub score: ScoreResult,
}

/// Runs the analyzers and the score calculator over one resume.
///
/// Stateless across calls: nothing from a previous invocation is cached.
#[derive(Clone)]
pub struct AtsEngine {
    corpus: Option<Arc<dyn ExampleSource>>,
    writer: TextProvider,
    scorer: ScoreCalculator,
    seed: RandomSeed,
}

impl AtsEngine {
    pub fn new(
        corpus: Option<Arc<dyn ExampleSource>>,
        writer: TextProvider,
        seed: RandomSeed,
    ) -> Self {
        let scorer = ScoreCalculator::new(corpus.clone());
        Self {
            corpus,
            writer,
            scorer,
            seed,
        }
    }

    pub fn corpus_enabled(&self) -> bool {
        self.corpus.is_some()
    }

    /// Dataset-pattern suggestions (when available) followed by rule-based ones.
    pub async fn generate_suggestions(&self, resume: &ResumeData) -> Vec<Suggestion> {
        let mut pattern_rng = self.seed.source(PATTERN_STREAM);
        let mut rule_rng = self.seed.source(RULE_STREAM);

        let dataset = async {
            match &self.corpus {
                Some(source) => patterns::analyze(resume, source.as_ref(), pattern_rng.as_mut()).await,
                None => Outcome::unavailable("corpus disabled"),
            }
        };
        let rule_based = rules::analyze(resume, &self.writer, rule_rng.as_mut());

        let (dataset, rule_based) = tokio::join!(dataset, rule_based);

        let mut suggestions = dataset.ready().unwrap_or_default();
        let dataset_count = suggestions.len();
        suggestions.extend(rule_based);
        info!(
            "Generated {} suggestions ({} from dataset patterns)",
            suggestions.len(),
            dataset_count
        );
        suggestions
    }

    pub async fn calculate_score(&self, resume: &ResumeData) -> ScoreResult {
        let mut rng = self.seed.source(SCORE_STREAM);
        self.scorer.calculate(resume, rng.as_mut()).await
    }

    /// Suggestions and score, computed concurrently.
    pub async fn analyze(&self, resume: &ResumeData) -> Analysis {
        let (suggestions, score) = tokio::join!(
            self.generate_suggestions(resume),
            self.calculate_score(resume)
        );
        Analysis { suggestions, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus_client::testing::{example, StaticExamples};
    use crate::models::resume::{Experience, PersonalInfo, Skill};
    use crate::models::suggestion::{Priority, ScoreSource, SuggestionType};

    const STRONG: &str = "Summary: senior engineer with 8+ years building cloud platforms.\n\
        Experience: Developed billing on AWS and Docker for 2000 users, cutting latency 40%. \
        Led 3 teams. Bachelor of Science. Skills: python, java, sql";

    fn blank_editor_resume() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                summary: Some(String::new()),
                ..Default::default()
            },
            experience: vec![Experience::default()],
            skills: vec![Skill::default()],
            ..Default::default()
        }
    }

    fn engine(corpus: Option<Vec<crate::models::suggestion::ExternalExample>>) -> AtsEngine {
        AtsEngine::new(
            Some(Arc::new(StaticExamples(corpus))),
            TextProvider::new(None),
            RandomSeed::Fixed(7),
        )
    }

    #[tokio::test]
    async fn test_blank_resume_with_corpus_down() {
        let engine = engine(None);
        let resume = blank_editor_resume();

        let suggestions = engine.generate_suggestions(&resume).await;
        let find = |field: &str| suggestions.iter().find(|s| s.field == field);

        let summary = find("summary").expect("summary suggestion");
        assert_eq!(summary.priority, Priority::High);
        let experience = find("experience-0-description").expect("experience suggestion");
        assert_eq!(experience.priority, Priority::High);
        let skill = find("skill").expect("skill suggestion");
        assert_eq!(skill.priority, Priority::Medium);
        assert!(suggestions.iter().all(|s| !s.field.starts_with("dataset-")));

        let score = engine.calculate_score(&resume).await;
        assert_eq!(score.source, ScoreSource::Rules);
        assert!(score.score <= 35);
    }

    #[tokio::test]
    async fn test_dataset_suggestions_come_first() {
        let examples = (0..10).map(|i| example(STRONG, 80.0 + i as f64)).collect();
        let engine = engine(Some(examples));

        let suggestions = engine.generate_suggestions(&blank_editor_resume()).await;
        let dataset_count = suggestions
            .iter()
            .take_while(|s| s.field.starts_with("dataset-pattern-"))
            .count();
        assert!((3..=5).contains(&dataset_count));
        assert!(suggestions[dataset_count..]
            .iter()
            .all(|s| !s.field.starts_with("dataset-")));
        assert!(suggestions.iter().any(|s| s.kind == SuggestionType::Summary));
    }

    #[tokio::test]
    async fn test_corpus_disabled_uses_rules_only() {
        let engine = AtsEngine::new(None, TextProvider::new(None), RandomSeed::Fixed(1));
        assert!(!engine.corpus_enabled());

        let analysis = engine.analyze(&ResumeData::default()).await;
        assert_eq!(analysis.score.source, ScoreSource::Rules);
        assert_eq!(analysis.score.score, 40);
        assert!(analysis
            .suggestions
            .iter()
            .all(|s| !s.field.starts_with("dataset-")));
    }

    #[tokio::test]
    async fn test_fixed_seed_is_reproducible() {
        let examples: Vec<_> = (0..10).map(|i| example(STRONG, 75.0 + i as f64)).collect();
        let first = engine(Some(examples.clone())).analyze(&blank_editor_resume()).await;
        let second = engine(Some(examples)).analyze(&blank_editor_resume()).await;
        assert_eq!(first, second);
        assert_eq!(first.score.source, ScoreSource::Dataset);
    }
}
