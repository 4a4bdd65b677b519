use crate::search::{SearchClient, SearchRequest, SearchResponse, SearchResult};
use crate::time::us_market;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

pub const DEFAULT_TTL: Duration = Duration::from_secs(2 * 24 * 60 * 60);
const RESULTS_PER_TICKER: u32 = 5;

/// Search findings for one ticker, as handed to the recommendation prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyResearch {
    pub ticker: String,
    pub answer: Option<String>,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    SkippedWeekend,
    Completed { refreshed: usize, failed: usize },
}

#[derive(Debug, Clone)]
struct ResearchEntry {
    response: SearchResponse,
    stored_at: DateTime<Utc>,
}

/// Per-ticker research with a fixed time-to-live.
#[derive(Debug)]
pub struct ResearchStore {
    ttl: Duration,
    entries: RwLock<HashMap<String, ResearchEntry>>,
}

impl Default for ResearchStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResearchStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert_at(&self, ticker: &str, response: SearchResponse, now: DateTime<Utc>) {
        self.entries.write().await.insert(
            ticker.to_string(),
            ResearchEntry {
                response,
                stored_at: now,
            },
        );
    }

    pub async fn get_at(&self, ticker: &str, now: DateTime<Utc>) -> Option<SearchResponse> {
        let entries = self.entries.read().await;
        let entry = entries.get(ticker)?;
        self.is_live(entry, now).then(|| entry.response.clone())
    }

    /// Live research for `tickers`, in the given order; expired or missing
    /// tickers are skipped.
    pub async fn snapshot_at(&self, tickers: &[&str], now: DateTime<Utc>) -> Vec<CompanyResearch> {
        let entries = self.entries.read().await;
        tickers
            .iter()
            .filter_map(|ticker| {
                let entry = entries.get(*ticker)?;
                self.is_live(entry, now).then(|| CompanyResearch {
                    ticker: ticker.to_string(),
                    answer: entry.response.answer.clone(),
                    results: entry.response.results.clone(),
                })
            })
            .collect()
    }

    pub async fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| self.is_live(entry, now));
        before - entries.len()
    }

    /// Re-researches every ticker, one request at a time. Failures keep the
    /// previous entry (if still live) and do not stop the sweep.
    pub async fn refresh(
        &self,
        search: &dyn SearchClient,
        tickers: &[&str],
        now: DateTime<Utc>,
    ) -> RefreshOutcome {
        if !us_market::is_refresh_day(now) {
            return RefreshOutcome::SkippedWeekend;
        }

        tracing::info!(tickers = tickers.len(), "refreshing company research");
        let mut refreshed = 0;
        let mut failed = 0;
        for ticker in tickers {
            let request = SearchRequest::research(research_query(ticker), RESULTS_PER_TICKER);
            match search.search(&request).await {
                Ok(response) => {
                    self.insert_at(ticker, response, now).await;
                    refreshed += 1;
                }
                Err(err) => {
                    failed += 1;
                    tracing::warn!(ticker, error = %err, "company research fetch failed");
                }
            }
        }

        self.purge_expired_at(now).await;
        RefreshOutcome::Completed { refreshed, failed }
    }

    fn is_live(&self, entry: &ResearchEntry, now: DateTime<Utc>) -> bool {
        match (now - entry.stored_at).to_std() {
            Ok(age) => age < self.ttl,
            Err(_) => true,
        }
    }
}

pub fn research_query(ticker: &str) -> String {
    format!("Get recent news and financial performance for {ticker}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct FakeSearch {
        failing: &'static [&'static str],
        queries: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl SearchClient for FakeSearch {
        fn provider_name(&self) -> &'static str {
            "fake"
        }

        async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse> {
            self.queries.lock().unwrap().push(request.query.clone());
            if self.failing.iter().any(|t| request.query == research_query(t)) {
                anyhow::bail!("rate limited");
            }
            Ok(response(&request.query))
        }
    }

    fn response(answer: &str) -> SearchResponse {
        SearchResponse {
            answer: Some(answer.to_string()),
            results: vec![SearchResult {
                title: "Earnings beat".to_string(),
                url: "https://example.com/earnings".to_string(),
                content: "Revenue up".to_string(),
            }],
        }
    }

    // 2026-01-07 is a Wednesday.
    fn wednesday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 7, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let store = ResearchStore::default();
        store.insert_at("AAPL", response("a"), wednesday()).await;

        let almost = wednesday() + chrono::Duration::hours(47);
        assert!(store.get_at("AAPL", almost).await.is_some());

        let expired = wednesday() + chrono::Duration::hours(48);
        assert!(store.get_at("AAPL", expired).await.is_none());
        assert_eq!(store.purge_expired_at(expired).await, 1);
    }

    #[tokio::test]
    async fn snapshot_keeps_requested_order_and_skips_missing() {
        let store = ResearchStore::default();
        store.insert_at("MSFT", response("m"), wednesday()).await;
        store.insert_at("AAPL", response("a"), wednesday()).await;

        let snap = store
            .snapshot_at(&["AAPL", "NVDA", "MSFT"], wednesday())
            .await;
        let tickers: Vec<_> = snap.iter().map(|c| c.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(snap[0].answer.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn refresh_continues_past_failures() {
        let store = ResearchStore::default();
        let search = FakeSearch {
            failing: &["TSLA"],
            queries: Mutex::new(Vec::new()),
        };

        let outcome = store
            .refresh(&search, &["AAPL", "TSLA", "NVDA"], wednesday())
            .await;
        assert_eq!(
            outcome,
            RefreshOutcome::Completed {
                refreshed: 2,
                failed: 1
            }
        );
        assert_eq!(search.queries.lock().unwrap().len(), 3);
        assert!(store.get_at("TSLA", wednesday()).await.is_none());
        assert!(store.get_at("NVDA", wednesday()).await.is_some());
    }

    #[tokio::test]
    async fn refresh_is_skipped_on_weekends() {
        let store = ResearchStore::default();
        let search = FakeSearch {
            failing: &[],
            queries: Mutex::new(Vec::new()),
        };

        let sunday = Utc.with_ymd_and_hms(2026, 1, 4, 9, 0, 0).unwrap();
        let outcome = store.refresh(&search, &["AAPL"], sunday).await;
        assert_eq!(outcome, RefreshOutcome::SkippedWeekend);
        assert!(search.queries.lock().unwrap().is_empty());
    }
}
