use crate::questions::{fallback_questions, QuestionSource};
use crate::retry::{retry_with_backoff, RetryPolicy};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub const DEFAULT_TTL: Duration = Duration::from_secs(4 * 60 * 60);

#[derive(Debug, Clone)]
struct CachedQuestions {
    questions: Vec<String>,
    fetched_at: DateTime<Utc>,
}

/// Time-boxed cache in front of a [`QuestionSource`].
///
/// Entries expire purely by age. The lock is never held while the source is
/// being called, so concurrent misses may each fetch; the last write wins.
pub struct QuestionCache {
    source: Arc<dyn QuestionSource>,
    ttl: Duration,
    retry: RetryPolicy,
    entry: RwLock<Option<CachedQuestions>>,
}

impl QuestionCache {
    pub fn new(source: Arc<dyn QuestionSource>, ttl: Duration, retry: RetryPolicy) -> Self {
        Self {
            source,
            ttl,
            retry,
            entry: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get_questions(&self) -> anyhow::Result<Vec<String>> {
        self.get_questions_at(Utc::now()).await
    }

    pub async fn get_questions_at(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<String>> {
        if let Some(questions) = self.fresh_entry(now).await {
            tracing::info!(count = questions.len(), "serving questions from cache");
            return Ok(questions);
        }

        tracing::info!("question cache miss; fetching new questions");
        let questions = retry_with_backoff(&self.retry, "fetch_questions", |_| {
            self.source.fetch_questions()
        })
        .await?;

        *self.entry.write().await = Some(CachedQuestions {
            questions: questions.clone(),
            fetched_at: now,
        });

        Ok(questions)
    }

    /// Like [`get_questions`](Self::get_questions), but substitutes the fixed
    /// fallback set once every attempt has failed. The fallback is not cached.
    pub async fn get_questions_or_fallback(&self) -> Vec<String> {
        self.get_questions_or_fallback_at(Utc::now()).await
    }

    pub async fn get_questions_or_fallback_at(&self, now: DateTime<Utc>) -> Vec<String> {
        match self.get_questions_at(now).await {
            Ok(questions) => questions,
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch questions; serving fallback set");
                fallback_questions()
            }
        }
    }

    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.read().await.as_ref().map(|e| e.fetched_at)
    }

    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }

    async fn fresh_entry(&self, now: DateTime<Utc>) -> Option<Vec<String>> {
        let guard = self.entry.read().await;
        let entry = guard.as_ref()?;
        // A negative age (clock moved backwards) counts as fresh.
        let fresh = match (now - entry.fetched_at).to_std() {
            Ok(age) => age < self.ttl,
            Err(_) => true,
        };
        fresh.then(|| entry.questions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::FALLBACK_QUESTIONS;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Replays scripted outcomes, then keeps failing.
    struct ScriptedSource {
        calls: AtomicU32,
        outcomes: Mutex<Vec<anyhow::Result<Vec<String>>>>,
    }

    impl ScriptedSource {
        fn new(mut outcomes: Vec<anyhow::Result<Vec<String>>>) -> Arc<Self> {
            outcomes.reverse();
            Arc::new(Self {
                calls: AtomicU32::new(0),
                outcomes: Mutex::new(outcomes),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl QuestionSource for ScriptedSource {
        async fn fetch_questions(&self) -> anyhow::Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(anyhow::anyhow!("upstream unavailable")))
        }
    }

    fn questions(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Will event {i} happen?")).collect()
    }

    fn cache_with(source: Arc<ScriptedSource>) -> QuestionCache {
        QuestionCache::new(
            source,
            DEFAULT_TTL,
            RetryPolicy::new(3, Duration::from_millis(1)),
        )
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn fresh_cache_does_not_call_source() {
        let source = ScriptedSource::new(vec![Ok(questions(12))]);
        let cache = cache_with(source.clone());

        let first = cache.get_questions_at(t0()).await.unwrap();
        assert_eq!(source.calls(), 1);

        let later = t0() + chrono::Duration::minutes(3 * 60 + 59);
        let second = cache.get_questions_at(later).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(source.calls(), 1);
        assert_eq!(cache.fetched_at().await, Some(t0()));
    }

    #[tokio::test]
    async fn expired_cache_refetches_and_restamps() {
        let source = ScriptedSource::new(vec![Ok(questions(10)), Ok(questions(11))]);
        let cache = cache_with(source.clone());

        cache.get_questions_at(t0()).await.unwrap();

        let expired = t0() + chrono::Duration::hours(4);
        let refreshed = cache.get_questions_at(expired).await.unwrap();
        assert_eq!(refreshed.len(), 11);
        assert_eq!(source.calls(), 2);
        assert_eq!(cache.fetched_at().await, Some(expired));
    }

    #[tokio::test]
    async fn three_failures_fall_back_after_exactly_three_attempts() {
        let source = ScriptedSource::new(vec![]);
        let cache = cache_with(source.clone());

        let served = cache.get_questions_or_fallback_at(t0()).await;
        assert_eq!(source.calls(), 3);
        assert_eq!(served, FALLBACK_QUESTIONS.map(String::from).to_vec());

        // The fallback is not cached: the next request tries upstream again.
        assert_eq!(cache.fetched_at().await, None);
        cache.get_questions_or_fallback_at(t0()).await;
        assert_eq!(source.calls(), 6);
    }

    #[tokio::test]
    async fn exhausted_retries_propagate_last_error() {
        let source = ScriptedSource::new(vec![
            Err(anyhow::anyhow!("first")),
            Err(anyhow::anyhow!("second")),
            Err(anyhow::anyhow!("third")),
        ]);
        let cache = cache_with(source.clone());

        let err = cache.get_questions_at(t0()).await.unwrap_err();
        assert_eq!(err.to_string(), "third");
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn recovers_when_a_retry_succeeds() {
        let source = ScriptedSource::new(vec![
            Err(anyhow::anyhow!("could not find a JSON array")),
            Ok(questions(10)),
        ]);
        let cache = cache_with(source.clone());

        let served = cache.get_questions_or_fallback_at(t0()).await;
        assert_eq!(served, questions(10));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn empty_set_is_cached_like_any_other() {
        let source = ScriptedSource::new(vec![Ok(Vec::new())]);
        let cache = cache_with(source.clone());

        assert!(cache.get_questions_or_fallback_at(t0()).await.is_empty());
        let later = t0() + chrono::Duration::hours(1);
        assert!(cache.get_questions_or_fallback_at(later).await.is_empty());
        assert_eq!(source.calls(), 1);
        assert_eq!(cache.fetched_at().await, Some(t0()));
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let source = ScriptedSource::new(vec![Ok(questions(10)), Ok(questions(10))]);
        let cache = cache_with(source.clone());

        cache.get_questions_at(t0()).await.unwrap();
        cache.invalidate().await;
        cache.get_questions_at(t0()).await.unwrap();
        assert_eq!(source.calls(), 2);
    }
}
