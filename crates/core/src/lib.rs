pub mod domain;
pub mod llm;
pub mod questions;
pub mod recommendations;
pub mod research;
pub mod retry;
pub mod search;
pub mod time;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    const DEFAULT_ALLOWED_ORIGINS: &[&str] =
        &["http://localhost:5173", "https://hedgd.onrender.com"];
    const DEFAULT_QUESTIONS_CACHE_TTL_SECS: u64 = 4 * 60 * 60;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub gemini_api_key: Option<String>,
        pub tavily_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub allowed_origins: Vec<String>,
        pub questions_cache_ttl: Duration,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let allowed_origins = match std::env::var("ALLOWED_ORIGINS") {
                Ok(s) => parse_origins(&s),
                Err(_) => DEFAULT_ALLOWED_ORIGINS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            };

            let questions_cache_ttl = match std::env::var("QUESTIONS_CACHE_TTL_SECS") {
                Ok(s) => Duration::from_secs(
                    s.trim()
                        .parse::<u64>()
                        .with_context(|| format!("invalid QUESTIONS_CACHE_TTL_SECS: {s}"))?,
                ),
                Err(_) => Duration::from_secs(DEFAULT_QUESTIONS_CACHE_TTL_SECS),
            };

            Ok(Self {
                gemini_api_key: non_empty_var("GEMINI_API_KEY"),
                tavily_api_key: non_empty_var("TAVILY_API_KEY"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                allowed_origins,
                questions_cache_ttl,
            })
        }

        pub fn require_gemini_api_key(&self) -> anyhow::Result<&str> {
            self.gemini_api_key
                .as_deref()
                .context("GEMINI_API_KEY is required")
        }

        pub fn require_tavily_api_key(&self) -> anyhow::Result<&str> {
            self.tavily_api_key
                .as_deref()
                .context("TAVILY_API_KEY is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

    fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .collect()
    }

}
