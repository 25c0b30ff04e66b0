use crate::app::dto::*;
use crate::app::engine::DescriptorEngine;
use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[derive(Clone)]
pub struct HttpState {
    pub engine: DescriptorEngine,
}

#[derive(Debug, Clone, Deserialize)]
struct NameQuery {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SubtypesQuery {
    name: String,
    #[serde(default)]
    transitive: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchQuery {
    pattern: String,
    #[serde(default)]
    regex: bool,
    limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct AnnotatedQuery {
    annotation: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TargetsQuery {
    entity: String,
}

#[derive(Debug, Clone, Serialize)]
struct ApiErrorBody {
    error: String,
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ApiErrorBody { error: msg.into() })).into_response()
}

pub fn build_router(engine: DescriptorEngine) -> Router {
    let state = Arc::new(HttpState { engine });

    Router::new()
        .route("/health", get(health))
        .route("/reload", post(reload))
        .route("/type", get(describe_type))
        .route("/hierarchy", post(hierarchy))
        .route("/subtypes", get(subtypes))
        .route("/search", get(search))
        .route("/annotated", get(annotated))
        .route("/entities", get(entities))
        .route("/targets", get(targets))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(engine: DescriptorEngine, addr: SocketAddr) -> Result<()> {
    let app = build_router(engine);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Runs a blocking engine call; engine errors map to `error_status`.
async fn run_blocking<T, F>(error_status: StatusCode, f: F) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    match spawn_blocking(f).await {
        Ok(Ok(res)) => Json(res).into_response(),
        Ok(Err(e)) => api_error(error_status, format!("{e:#}")),
        Err(e) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("task join error: {e}"),
        ),
    }
}

async fn health(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(state.engine.health())
}

async fn reload(State(state): State<Arc<HttpState>>) -> Response {
    let engine = state.engine.clone();
    run_blocking(StatusCode::INTERNAL_SERVER_ERROR, move || engine.reload()).await
}

async fn describe_type(
    State(state): State<Arc<HttpState>>,
    Query(q): Query<NameQuery>,
) -> Response {
    let engine = state.engine.clone();
    run_blocking(StatusCode::NOT_FOUND, move || engine.describe_type(&q.name)).await
}

async fn hierarchy(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<HierarchyRequest>,
) -> Response {
    let engine = state.engine.clone();
    run_blocking(StatusCode::NOT_FOUND, move || engine.hierarchy(req)).await
}

async fn subtypes(
    State(state): State<Arc<HttpState>>,
    Query(q): Query<SubtypesQuery>,
) -> Response {
    let engine = state.engine.clone();
    let req = SubtypesRequest {
        name: q.name,
        transitive: q.transitive,
    };
    run_blocking(StatusCode::NOT_FOUND, move || engine.subtypes(req)).await
}

async fn search(State(state): State<Arc<HttpState>>, Query(q): Query<SearchQuery>) -> Response {
    let engine = state.engine.clone();
    let req = SearchRequest {
        pattern: q.pattern,
        regex: q.regex,
        limit: q.limit,
    };
    run_blocking(StatusCode::BAD_REQUEST, move || engine.search(req)).await
}

async fn annotated(
    State(state): State<Arc<HttpState>>,
    Query(q): Query<AnnotatedQuery>,
) -> Response {
    let engine = state.engine.clone();
    run_blocking(StatusCode::BAD_REQUEST, move || {
        Ok(engine.annotated(&q.annotation))
    })
    .await
}

async fn entities(State(state): State<Arc<HttpState>>) -> Response {
    let engine = state.engine.clone();
    run_blocking(StatusCode::UNPROCESSABLE_ENTITY, move || engine.entities()).await
}

async fn targets(State(state): State<Arc<HttpState>>, Query(q): Query<TargetsQuery>) -> Response {
    let engine = state.engine.clone();
    run_blocking(StatusCode::NOT_FOUND, move || engine.targets(&q.entity)).await
}
