use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use hedgd_core::domain::questionnaire::Answer;
use hedgd_core::domain::recommendation::Recommendation;
use hedgd_core::questions::cache::QuestionCache;
use hedgd_core::questions::{fallback_questions, select};
use hedgd_core::recommendations::RecommendationEngine;

#[derive(Clone)]
pub struct AppState {
    /// `None` when no generative model is configured; questions degrade to
    /// the fallback set.
    pub questions: Option<Arc<QuestionCache>>,
    pub recommendations: Option<Arc<RecommendationEngine>>,
}

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/questions", get(get_questions))
        .route("/api/recommendations", post(post_recommendations))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsRequest {
    pub answers: Vec<Answer>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

async fn get_questions(State(state): State<AppState>) -> Json<QuestionsResponse> {
    tracing::info!("received a request at /api/questions");
    let all = match &state.questions {
        Some(cache) => cache.get_questions_or_fallback().await,
        None => {
            tracing::warn!("question generation not configured; serving fallback set");
            fallback_questions()
        }
    };

    Json(QuestionsResponse {
        questions: select::select_for_session(&all),
    })
}

async fn post_recommendations(
    State(state): State<AppState>,
    Json(req): Json<RecommendationsRequest>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let Some(engine) = &state.recommendations else {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Recommendation service is not configured.",
        ));
    };

    if req.answers.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "answers must not be empty"));
    }

    let recommendations = engine.generate(&req.answers).await.map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "recommendation generation failed");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate recommendations from the AI service.",
        )
    })?;

    Ok(Json(RecommendationsResponse { recommendations }))
}
