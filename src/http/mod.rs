//! HTTP Surface
//!
//! Thin axum adapter over the dialog engine. The engine itself is
//! transport-agnostic; these handlers only decode requests, invoke the
//! orchestrator or the aggregate-scoring operation, and encode responses.
//! The streaming reply is exposed as server-sent events carrying the typed
//! reply frames.

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, Sse},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;

use hirevox_core::{ReplyOutcome, ReplyRequest};
use hirevox_llm::OpenAiCompatBackend;
use hirevox_scenario::{ProfileTable, RoleProfile, ScenarioStore};
use hirevox_scoring::{aggregate_scores, AggregateReport, AggregateRequest, ValidationError};

use crate::config::EngineConfig;
use crate::engine::DialogOrchestrator;
use crate::metrics::MetricsClient;
use crate::phrasebank::PhraseBank;

/// Shared state behind every handler; read-only after startup.
pub struct AppState {
    pub orchestrator: Arc<DialogOrchestrator>,
    pub scenarios: Arc<ScenarioStore>,
    pub config: EngineConfig,
}

impl AppState {
    /// Assemble the engine and its dependencies from configuration.
    pub fn from_config(config: EngineConfig) -> Arc<Self> {
        let backend = Arc::new(OpenAiCompatBackend::new(config.backend.clone()));

        let scenarios = Arc::new(match &config.scenario_dir {
            Some(dir) => ScenarioStore::from_dir(dir.clone()),
            None => ScenarioStore::empty(),
        });

        let profiles = Arc::new(match &config.profiles_path {
            Some(path) => ProfileTable::from_path(path).unwrap_or_else(|err| {
                warn!(error = %err, "profile override unusable, using builtin table");
                ProfileTable::builtin()
            }),
            None => ProfileTable::builtin(),
        });

        let phrases = Arc::new(match &config.phrases_path {
            Some(path) => PhraseBank::from_path(path).unwrap_or_else(|err| {
                warn!(error = %err, "phrase bank override unusable, using builtin banks");
                PhraseBank::builtin()
            }),
            None => PhraseBank::builtin(),
        });

        let mut orchestrator =
            DialogOrchestrator::new(backend, Arc::clone(&scenarios), profiles, phrases);
        if let Some(url) = &config.metrics_url {
            orchestrator = orchestrator.with_metrics(MetricsClient::new(url.clone()));
        }

        Arc::new(Self {
            orchestrator: Arc::new(orchestrator),
            scenarios,
            config,
        })
    }
}

/// Build the engine router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/reply", post(reply))
        .route("/reply/stream", post(reply_stream))
        .route("/score/aggregate", post(score_aggregate))
        .route("/health", get(health))
        .route("/roles", get(roles))
        .with_state(state)
}

async fn reply(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReplyRequest>,
) -> Json<ReplyOutcome> {
    Json(state.orchestrator.reply(&request).await)
}

async fn reply_stream(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReplyRequest>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let (tx, rx) = mpsc::channel(32);
    let orchestrator = Arc::clone(&state.orchestrator);
    tokio::spawn(async move {
        orchestrator.reply_stream(&request, tx).await;
    });

    let stream = ReceiverStream::new(rx).map(|frame| Event::default().json_data(&frame));
    Sse::new(stream)
}

async fn score_aggregate(
    Json(request): Json<AggregateRequest>,
) -> Result<Json<AggregateReport>, ApiError> {
    Ok(Json(aggregate_scores(&request)?))
}

#[derive(Debug, Serialize)]
struct BackendInfo {
    engine: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    drill_threshold: f64,
    scenarios_loaded: usize,
    backend: BackendInfo,
    timestamp: String,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "dialog-engine",
        drill_threshold: state.config.drill_threshold,
        scenarios_loaded: state.scenarios.len(),
        backend: BackendInfo {
            engine: state.config.backend.engine.to_string(),
            model: state.config.backend.model.clone(),
            base_url: state.config.backend.base_url.clone(),
        },
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
struct RolesResponse {
    roles: Vec<&'static str>,
    total: usize,
}

async fn roles() -> Json<RolesResponse> {
    let roles: Vec<&'static str> = RoleProfile::ALL.iter().map(|p| p.tag()).collect();
    let total = roles.len();
    Json(RolesResponse { roles, total })
}

/// Validation failures surface as 422 with a JSON error body; everything
/// else in the engine answers 200 by contract.
struct ApiError(ValidationError);

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
