use crate::domain::questionnaire::Answer;
use crate::domain::recommendation::Recommendation;
use crate::llm::json;
use crate::llm::LlmClient;
use crate::research::store::{CompanyResearch, ResearchStore};
use crate::research::universe;
use crate::retry::{retry_with_backoff, RetryPolicy};
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const RECOMMENDATION_COUNT: usize = 10;

/// Turns a finished questionnaire into stock picks.
pub struct RecommendationEngine {
    llm: Arc<dyn LlmClient>,
    research: Arc<ResearchStore>,
    retry: RetryPolicy,
}

impl RecommendationEngine {
    pub fn new(llm: Arc<dyn LlmClient>, research: Arc<ResearchStore>, retry: RetryPolicy) -> Self {
        Self {
            llm,
            research,
            retry,
        }
    }

    pub async fn generate(&self, answers: &[Answer]) -> anyhow::Result<Vec<Recommendation>> {
        self.generate_at(answers, Utc::now()).await
    }

    /// A model that stays unreachable after retries, or a reply that does not
    /// decode, degrades to an empty list. Errors only when the prompt cannot be
    /// built.
    pub async fn generate_at(
        &self,
        answers: &[Answer],
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Recommendation>> {
        let tickers: Vec<&str> = universe::tickers().collect();
        let research = self.research.snapshot_at(&tickers, now).await;
        let prompt = recommendation_prompt(answers, &research)?;

        tracing::info!(
            provider = ?self.llm.provider(),
            answers = answers.len(),
            researched = research.len(),
            "generating recommendations"
        );
        let text = match retry_with_backoff(&self.retry, "generate_recommendations", |_| {
            self.llm.generate_text(&prompt)
        })
        .await
        {
            Ok(text) => text,
            Err(err) => {
                // Error-level events are forwarded to Sentry by the binaries' tracing layer.
                tracing::error!(
                    error = %err,
                    attempts = self.retry.max_attempts,
                    "model unreachable; returning no recommendations"
                );
                return Ok(Vec::new());
            }
        };

        match json::parse_recommendations(&text) {
            Ok(recommendations) => Ok(recommendations),
            Err(err) => {
                tracing::error!(error = %err, "undecodable recommendations; returning none");
                Ok(Vec::new())
            }
        }
    }
}

pub fn recommendation_prompt(
    answers: &[Answer],
    research: &[CompanyResearch],
) -> anyhow::Result<String> {
    let answers_json = serde_json::to_string(answers).context("serialize answers failed")?;

    let mut context = String::from("Company Data:\n");
    for company in research {
        let results =
            serde_json::to_string(&company.results).context("serialize research failed")?;
        context.push_str(&format!(
            "Ticker: {}\nAnswer: {}\nResults: {}\n\n",
            company.ticker,
            company.answer.as_deref().unwrap_or(""),
            results
        ));
    }

    Ok(format!(
        "You are a financial advisor AI. Based on the user's answers to the following questions \
and the provided company data, recommend {RECOMMENDATION_COUNT} stocks.\n\
User Answers: {answers_json}\n\n\
Respond with ONLY a JSON object with a key \"recommendations\" holding an array of \
{RECOMMENDATION_COUNT} objects, each shaped as:\n\
{{\"score\": <number between 0 and 1: how well the pick aligns with the answers>, \
\"ticker\": \"<stock ticker symbol>\", \
\"explanation\": \"<brief reason grounded in the answers and company data>\"}}\n\n\
{context}"
    ))
}
