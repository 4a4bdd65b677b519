use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hedgd_core::config::Settings;
use hedgd_core::llm::gemini::GeminiClient;
use hedgd_core::llm::LlmClient;
use hedgd_core::questions::cache::QuestionCache;
use hedgd_core::questions::generator::LlmQuestionSource;
use hedgd_core::recommendations::RecommendationEngine;
use hedgd_core::research::store::ResearchStore;
use hedgd_core::research::{spawn_refresh_task, watch_refresh_task};
use hedgd_core::retry::RetryPolicy;
use hedgd_core::search::tavily::TavilyClient;
use hedgd_core::search::SearchClient;

mod routes;

use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let search: Option<Arc<dyn SearchClient>> = match TavilyClient::from_settings(&settings) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "search client unavailable; running without news or company research");
            None
        }
    };

    let research = Arc::new(ResearchStore::default());
    if let Some(search) = &search {
        let refresh = spawn_refresh_task(research.clone(), search.clone());
        tokio::spawn(watch_refresh_task(refresh));
    }

    let questions = match GeminiClient::for_questions(&settings) {
        Ok(llm) => {
            tracing::info!(model = llm.model(), "question model configured");
            let llm: Arc<dyn LlmClient> = Arc::new(llm);
            let source = LlmQuestionSource::new(llm, search.clone());
            Some(Arc::new(QuestionCache::new(
                Arc::new(source),
                settings.questions_cache_ttl,
                RetryPolicy::default(),
            )))
        }
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "question model unavailable; serving fallback questions");
            None
        }
    };

    let recommendations = match GeminiClient::for_recommendations(&settings) {
        Ok(llm) => {
            tracing::info!(model = llm.model(), "recommendation model configured");
            Some(Arc::new(RecommendationEngine::new(
                Arc::new(llm),
                research,
                RetryPolicy::default(),
            )))
        }
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "recommendation model unavailable; starting API in degraded mode");
            None
        }
    };

    let state = AppState {
        questions,
        recommendations,
    };
    let app = routes::router(state, &settings.allowed_origins);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
