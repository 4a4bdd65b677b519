pub mod cache;
pub mod generator;
pub mod select;

/// Served when every attempt to generate a fresh question set has failed.
pub const FALLBACK_QUESTIONS: [&str; 3] = [
    "Do you prefer long-term investments?",
    "Are you comfortable with high risk?",
    "Do you want to invest in tech companies?",
];

pub fn fallback_questions() -> Vec<String> {
    FALLBACK_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

/// One attempt at producing a full question set from an upstream service.
#[async_trait::async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_questions(&self) -> anyhow::Result<Vec<String>>;
}
