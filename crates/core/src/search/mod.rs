pub mod tavily;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchTopic {
    General,
    News,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub topic: SearchTopic,
    pub search_depth: SearchDepth,
    pub max_results: u32,
    pub include_answer: bool,
}

impl SearchRequest {
    pub fn news(query: impl Into<String>, max_results: u32) -> Self {
        Self {
            query: query.into(),
            topic: SearchTopic::News,
            search_depth: SearchDepth::Basic,
            max_results,
            include_answer: false,
        }
    }

    pub fn research(query: impl Into<String>, max_results: u32) -> Self {
        Self {
            query: query.into(),
            topic: SearchTopic::General,
            search_depth: SearchDepth::Advanced,
            max_results,
            include_answer: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

/// A web-search backend.
#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse>;
}
