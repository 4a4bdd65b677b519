use crate::config::Settings;
use crate::search::{SearchClient, SearchRequest, SearchResponse};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct TavilyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TavilyClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_tavily_api_key()?.to_string();
        let base_url =
            std::env::var("TAVILY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("TAVILY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build tavily http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl SearchClient for TavilyClient {
    fn provider_name(&self) -> &'static str {
        "tavily"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let res = self
            .http
            .post(self.url())
            .headers(self.headers()?)
            .json(request)
            .send()
            .await
            .context("tavily request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read tavily response")?;

        if !status.is_success() {
            anyhow::bail!("tavily HTTP {status} for query {:?}: {text}", request.query);
        }

        serde_json::from_str::<SearchResponse>(&text)
            .with_context(|| format!("tavily response is not valid search JSON: {text}"))
    }
}
