use crate::config::Settings;
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::{LlmClient, Provider};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_QUESTIONS_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_RECOMMENDATIONS_MODEL: &str = "gemini-pro";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Client for the fast model used to write questionnaire questions.
    pub fn for_questions(settings: &Settings) -> anyhow::Result<Self> {
        let model = std::env::var("GEMINI_QUESTIONS_MODEL")
            .unwrap_or_else(|_| DEFAULT_QUESTIONS_MODEL.to_string());
        Self::from_settings(settings, model)
    }

    /// Client for the model used to rank stocks against a user's answers.
    pub fn for_recommendations(settings: &Settings) -> anyhow::Result<Self> {
        let model = std::env::var("GEMINI_RECOMMENDATIONS_MODEL")
            .unwrap_or_else(|_| DEFAULT_RECOMMENDATIONS_MODEL.to_string());
        Self::from_settings(settings, model)
    }

    pub fn from_settings(settings: &Settings, model: String) -> anyhow::Result<Self> {
        let api_key = settings.require_gemini_api_key()?.to_string();
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> anyhow::Result<(serde_json::Value, GenerateContentResponse)> {
        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", HeaderValue::from_str(&self.api_key)?);

        let res = self
            .http
            .post(self.url())
            .headers(headers)
            .json(&req)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read Gemini response body")?;
        if !status.is_success() {
            let raw_response_json = serde_json::from_str::<serde_json::Value>(&text).ok();
            return Err(LlmDiagnosticsError {
                provider: Provider::Gemini,
                model: self.model.clone(),
                stage: "http",
                detail: format!("status={status}"),
                raw_output: Some(text),
                raw_response_json,
            }
            .into());
        }

        let raw_json = serde_json::from_str::<serde_json::Value>(&text)
            .with_context(|| format!("failed to parse Gemini response JSON: {text}"))?;
        let parsed = serde_json::from_value::<GenerateContentResponse>(raw_json.clone())
            .context("failed to decode Gemini response into GenerateContentResponse")?;
        Ok((raw_json, parsed))
    }

    fn response_text(
        &self,
        res: &GenerateContentResponse,
        raw_json: &serde_json::Value,
    ) -> anyhow::Result<String> {
        let Some(candidate) = res.candidates.first() else {
            let detail = match res
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
            {
                Some(reason) => format!("prompt blocked: {reason}"),
                None => "response contained no candidates".to_string(),
            };
            return Err(LlmDiagnosticsError {
                provider: Provider::Gemini,
                model: self.model.clone(),
                stage: "empty_response",
                detail,
                raw_output: None,
                raw_response_json: Some(raw_json.clone()),
            }
            .into());
        };

        let mut out = String::new();
        if let Some(content) = &candidate.content {
            for part in &content.parts {
                // Non-text parts (inline data, function calls) are ignored.
                if let Some(text) = &part.text {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(text);
                }
            }
        }

        if out.trim().is_empty() {
            return Err(LlmDiagnosticsError {
                provider: Provider::Gemini,
                model: self.model.clone(),
                stage: "empty_text",
                detail: format!(
                    "finish_reason={}",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
                raw_output: None,
                raw_response_json: Some(raw_json.clone()),
            }
            .into());
        }

        Ok(out)
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate_text(&self, prompt: &str) -> anyhow::Result<String> {
        let req = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let (raw_json, res) = self.generate_content(req).await?;
        let text = self.response_text(&res, &raw_json)?;
        tracing::debug!(model = %self.model, chars = text.len(), "Gemini response received");
        Ok(text)
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,

    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,

    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
