//! HTTP routes

use crate::{ApiError, AppContext};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use graphrag_qa_core::{AskResponse, CoreError, TestPayload};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(home))
        .route("/test", get(test_payload))
        .route("/ask", post(ask))
        .route("/health", get(health))
}

async fn home() -> Json<Value> {
    Json(json!({
        "message": "✅ GraphRAG API Running",
        "status": "online",
        "endpoints": {
            "home": "GET /",
            "ask": "POST /ask?question=YOUR_QUESTION",
            "test": "GET /test"
        }
    }))
}

async fn test_payload(State(ctx): State<AppContext>) -> Json<TestPayload> {
    Json(ctx.fallback.test_payload.clone())
}

#[derive(Debug, Deserialize)]
struct AskQuery {
    question: Option<String>,
}

async fn ask(
    State(ctx): State<AppContext>,
    Query(query): Query<AskQuery>,
) -> Result<Json<AskResponse>, ApiError> {
    let question = query
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(CoreError::EmptyQuestion.to_string()))?;

    let exchange = ctx.answers.answer(&question).await?;
    info!("Answered question ({})", exchange.source.label());

    Ok(Json(exchange.to_response()))
}

async fn health(State(ctx): State<AppContext>) -> Json<Value> {
    // Reported without building the index
    let index = ctx
        .index
        .current_status()
        .map(|status| status.label())
        .unwrap_or("pending");

    Json(json!({
        "status": "healthy",
        "graph_connected": ctx.graph.is_connected(),
        "vector_index": index,
        "llm_configured": ctx.answers.is_llm_configured()
    }))
}
