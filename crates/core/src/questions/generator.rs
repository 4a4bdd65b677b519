use crate::llm::json;
use crate::llm::LlmClient;
use crate::questions::QuestionSource;
use crate::search::{SearchClient, SearchRequest};
use serde::Serialize;
use std::sync::Arc;

const NEWS_QUERIES: [&str; 5] = [
    "latest US federal reserve news",
    "recent geopolitical events affecting markets",
    "latest tech and AI regulation news",
    "major macroeconomic announcements",
    "global supply chain news",
];
const NEWS_RESULTS_PER_QUERY: u32 = 3;
const QUESTIONS_PER_BATCH: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub content: String,
    pub url: String,
}

/// Writes questionnaire questions with a generative model, grounded in a
/// fresh sweep of news headlines when a search provider is configured.
pub struct LlmQuestionSource {
    llm: Arc<dyn LlmClient>,
    search: Option<Arc<dyn SearchClient>>,
}

impl LlmQuestionSource {
    pub fn new(llm: Arc<dyn LlmClient>, search: Option<Arc<dyn SearchClient>>) -> Self {
        Self { llm, search }
    }

    /// Runs the news query bank in order. Any search failure yields an empty
    /// context instead of failing the generation attempt.
    pub async fn news_context(&self) -> Vec<NewsItem> {
        let Some(search) = &self.search else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for query in NEWS_QUERIES {
            let request = SearchRequest::news(query, NEWS_RESULTS_PER_QUERY);
            match search.search(&request).await {
                Ok(res) => out.extend(res.results.into_iter().map(|r| NewsItem {
                    title: r.title,
                    content: r.content,
                    url: r.url,
                })),
                Err(err) => {
                    tracing::error!(
                        provider = search.provider_name(),
                        query,
                        error = %err,
                        "news search failed; continuing without real-time context"
                    );
                    return Vec::new();
                }
            }
        }
        out
    }
}

#[async_trait::async_trait]
impl QuestionSource for LlmQuestionSource {
    async fn fetch_questions(&self) -> anyhow::Result<Vec<String>> {
        let context = self.news_context().await;
        tracing::debug!(news_items = context.len(), "built question context");

        let text = self.llm.generate_text(&question_prompt(&context)).await?;
        let questions = json::parse_string_array(&text)?;
        if questions.is_empty() {
            tracing::warn!("model returned an empty question list");
        }
        Ok(questions)
    }
}

pub fn question_prompt(context: &[NewsItem]) -> String {
    let context = context
        .iter()
        .map(|r| format!("Title: {}\nContent: {}\nURL: {}", r.title, r.content, r.url))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    [
        "You are a geopolitical and financial analyst.".to_string(),
        format!(
            "Write exactly {QUESTIONS_PER_BATCH} binary (yes/no) questions that reveal a reader's \
             worldview and investment tendencies."
        ),
        "Rules:".to_string(),
        "- Each question starts with \"Will\" or \"Do you believe\" and names a clear timeframe.".to_string(),
        "- Ask about policy, central banks, conflict, technology, trade, energy or supply chains; \
         never about stock prices or index levels."
            .to_string(),
        "- Base every question on a real, current situation from the context below.".to_string(),
        "- Output ONLY a JSON array of strings. No prose, no numbering.".to_string(),
        String::new(),
        "--- REAL-TIME CONTEXT ---".to_string(),
        context,
        "--- END REAL-TIME CONTEXT ---".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Provider;
    use crate::search::{SearchResponse, SearchResult};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct FakeLlm {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl LlmClient for FakeLlm {
        fn provider(&self) -> Provider {
            Provider::Gemini
        }

        async fn generate_text(&self, prompt: &str) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct FakeSearch {
        calls: AtomicU32,
        fail_on_call: Option<u32>,
    }

    #[async_trait::async_trait]
    impl SearchClient for FakeSearch {
        fn provider_name(&self) -> &'static str {
            "fake"
        }

        async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_call == Some(n) {
                anyhow::bail!("search quota exceeded");
            }
            Ok(SearchResponse {
                answer: None,
                results: vec![SearchResult {
                    title: format!("Headline for {}", request.query),
                    url: format!("https://news.example/{n}"),
                    content: "Body".to_string(),
                }],
            })
        }
    }

    fn build(
        reply: &str,
        fail_on_call: Option<u32>,
    ) -> (Arc<FakeLlm>, Arc<FakeSearch>, LlmQuestionSource) {
        let llm = Arc::new(FakeLlm {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        });
        let search = Arc::new(FakeSearch {
            calls: AtomicU32::new(0),
            fail_on_call,
        });
        let source =
            LlmQuestionSource::new(llm.clone(), Some(search.clone() as Arc<dyn SearchClient>));
        (llm, search, source)
    }

    #[tokio::test]
    async fn news_context_runs_every_query_in_order() {
        let (_, search, source) = build("[]", None);
        let context = source.news_context().await;

        assert_eq!(search.calls.load(Ordering::SeqCst), NEWS_QUERIES.len() as u32);
        assert_eq!(context.len(), NEWS_QUERIES.len());
        assert_eq!(context[0].title, "Headline for latest US federal reserve news");
    }

    #[tokio::test]
    async fn search_failure_yields_empty_context() {
        let (_, search, source) = build("[]", Some(2));
        let context = source.news_context().await;

        assert!(context.is_empty());
        assert_eq!(search.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn parses_array_out_of_surrounding_prose() {
        let (llm, _, source) = build(
            "Here are your questions:\n[\"Will the ECB cut rates by June 2026?\", \"Do you believe chip export bans will widen?\"]",
            None,
        );

        let questions = source.fetch_questions().await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0], "Will the ECB cut rates by June 2026?");

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Headline for global supply chain news"));
    }

    #[tokio::test]
    async fn reply_without_array_is_an_attempt_failure() {
        let (_, _, source) = build("Sorry, I can't do that.", None);
        assert!(source.fetch_questions().await.is_err());
    }

    #[tokio::test]
    async fn empty_array_is_a_valid_reply() {
        let (_, _, source) = build("[]", None);
        assert!(source.fetch_questions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn works_without_search_provider() {
        let llm = Arc::new(FakeLlm {
            reply: "[\"Will OPEC+ cut output again before July 2026?\"]".to_string(),
            prompts: Mutex::new(Vec::new()),
        });
        let source = LlmQuestionSource::new(llm, None);

        assert!(source.news_context().await.is_empty());
        assert_eq!(source.fetch_questions().await.unwrap().len(), 1);
    }

    #[test]
    fn prompt_embeds_context_between_markers() {
        let prompt = question_prompt(&[NewsItem {
            title: "Fed holds".to_string(),
            content: "Rates unchanged".to_string(),
            url: "https://example.com".to_string(),
        }]);

        let start = prompt.find("--- REAL-TIME CONTEXT ---").unwrap();
        let end = prompt.find("--- END REAL-TIME CONTEXT ---").unwrap();
        assert!(prompt[start..end].contains("Title: Fed holds"));
    }
}
