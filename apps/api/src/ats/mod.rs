// ATS analysis engine.
// Suggestion generation, scoring and apply run on a caller-supplied resume;
// remote calls go through corpus_client and llm_client only.

pub mod apply;
pub mod engine;
pub mod handlers;
pub mod keywords;
pub mod outcome;
pub mod patterns;
pub mod random;
pub mod rules;
pub mod scoring;
pub mod writer;
