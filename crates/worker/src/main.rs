use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hedgd_core::config::Settings;
use hedgd_core::llm::gemini::GeminiClient;
use hedgd_core::questions::generator::LlmQuestionSource;
use hedgd_core::questions::{select, QuestionSource};
use hedgd_core::research::store::{RefreshOutcome, ResearchStore};
use hedgd_core::research::universe;
use hedgd_core::retry::{retry_with_backoff, RetryPolicy};
use hedgd_core::search::tavily::TavilyClient;
use hedgd_core::search::SearchClient;

#[derive(Debug, Parser)]
#[command(name = "hedgd_worker")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Resolve configuration and inputs, but do not call any provider.
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate one fresh question set and print it as JSON.
    Questions {
        /// Print the full generated set instead of a session-sized selection.
        #[arg(long)]
        all: bool,
    },

    /// Run one company research sweep and print a summary.
    Research {
        /// Restrict the sweep to these tickers (defaults to the full universe).
        #[arg(long = "ticker")]
        tickers: Vec<String>,
    },
}

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

    let args = Args::parse();

    let res = match args.command {
        Command::Questions { all } => run_questions(&settings, all, args.dry_run).await,
        Command::Research { tickers } => run_research(&settings, tickers, args.dry_run).await,
    };

    if let Err(err) = &res {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %err, "worker run failed");
    }
    res
}

async fn run_questions(settings: &Settings, all: bool, dry_run: bool) -> anyhow::Result<()> {
    let llm = GeminiClient::for_questions(settings)?;
    let search: Option<Arc<dyn SearchClient>> = match TavilyClient::from_settings(settings) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "no search provider; generating without news context");
            None
        }
    };

    if dry_run {
        tracing::info!(
            model = llm.model(),
            news_context = search.is_some(),
            dry_run = true,
            "question generation (dry-run)"
        );
        return Ok(());
    }

    let source = LlmQuestionSource::new(Arc::new(llm), search);
    let questions = retry_with_backoff(&RetryPolicy::default(), "fetch_questions", |_| {
        source.fetch_questions()
    })
    .await?;

    tracing::info!(count = questions.len(), "generated questions");
    let out = if all {
        questions
    } else {
        select::select_for_session(&questions)
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({ "questions": out }))?
    );
    Ok(())
}

async fn run_research(
    settings: &Settings,
    tickers: Vec<String>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let tickers: Vec<String> = if tickers.is_empty() {
        universe::tickers().map(str::to_string).collect()
    } else {
        tickers
            .into_iter()
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect()
    };
    anyhow::ensure!(!tickers.is_empty(), "no tickers to research");

    if dry_run {
        tracing::info!(
            tickers_len = tickers.len(),
            dry_run = true,
            "company research sweep (dry-run)"
        );
        return Ok(());
    }

    let search = TavilyClient::from_settings(settings).context("research needs a search provider")?;
    let store = ResearchStore::default();
    let refs: Vec<&str> = tickers.iter().map(String::as_str).collect();
    let now = chrono::Utc::now();

    match store.refresh(&search, &refs, now).await {
        RefreshOutcome::SkippedWeekend => {
            tracing::info!(%now, "weekend; company research sweep skipped");
        }
        RefreshOutcome::Completed { refreshed, failed } => {
            let snapshot = store.snapshot_at(&refs, now).await;
            let summary: Vec<_> = snapshot
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "ticker": c.ticker,
                        "results": c.results.len(),
                        "answer": c.answer,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&summary)?);
            tracing::info!(refreshed, failed, "company research sweep finished");
        }
    }
    Ok(())
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
