use crate::{metrics, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use flux_rule::admission::decode_rule;
use flux_rule::{AdmissionRequest, AdmissionReview, ExecResult, Operation, SubmitError};
use flux_types::rule::RuleEndpoint;
use serde_json::{json, Value};
use std::sync::Arc;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/admission/rules", post(review_rule))
        .route("/api/v1/ruleendpoints", post(create_rule_endpoint))
        .route(
            "/api/v1/ruleendpoints/:namespace/:name",
            delete(delete_rule_endpoint),
        )
        .route("/api/v1/rules", post(create_rule))
        .route("/api/v1/rules/:namespace/:name", delete(delete_rule))
        .route("/api/v1/rulestatus", post(submit_rule_status))
        .route(
            "/api/v1/rulestatus/:project_id/:rule_id",
            get(get_rule_status),
        )
        .with_state(state)
}

/// 准入 webhook：AdmissionReview 进，AdmissionReview 出
async fn review_rule(
    State(state): State<Arc<AppState>>,
    Json(review): Json<AdmissionReview>,
) -> impl IntoResponse {
    let Some(request) = review.request else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "admission review has no request" })),
        );
    };

    let response = state.gate.admit(&request).await;
    metrics::record_admission(&request.operation.to_string(), response.allowed);

    (
        StatusCode::OK,
        Json(json!(AdmissionReview::respond(response))),
    )
}

async fn create_rule_endpoint(
    State(state): State<Arc<AppState>>,
    Json(endpoint): Json<RuleEndpoint>,
) -> impl IntoResponse {
    tracing::info!(endpoint = %endpoint.metadata.key(), endpoint_type = %endpoint.endpoint_type(), "RuleEndpoint stored");
    state.store.put_endpoint(endpoint.clone()).await;
    (StatusCode::CREATED, Json(json!(endpoint)))
}

async fn delete_rule_endpoint(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.store.remove_endpoint(&namespace, &name).await {
        Some(_) => {
            tracing::info!(namespace = %namespace, name = %name, "RuleEndpoint deleted");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// 经过准入后写入存储
async fn create_rule(
    State(state): State<Arc<AppState>>,
    Json(object): Json<Value>,
) -> impl IntoResponse {
    let request = AdmissionRequest {
        uid: String::new(),
        operation: Operation::Create,
        namespace: object["metadata"]["namespace"]
            .as_str()
            .unwrap_or("default")
            .to_string(),
        name: object["metadata"]["name"].as_str().unwrap_or_default().to_string(),
        object,
    };

    let response = state.gate.admit(&request).await;
    metrics::record_admission("CREATE", response.allowed);
    if !response.allowed {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": response.message().unwrap_or_default() })),
        );
    }

    match decode_rule(&request) {
        Ok(rule) => {
            state.store.put_rule(rule.clone()).await;
            (StatusCode::CREATED, Json(json!(rule)))
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.store.remove_rule(&namespace, &name).await {
        Some(_) => {
            metrics::record_admission("DELETE", true);
            tracing::info!(namespace = %namespace, name = %name, "Rule deleted");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// 执行引擎提交结果；队列满时请求等待
async fn submit_rule_status(
    State(state): State<Arc<AppState>>,
    Json(result): Json<ExecResult>,
) -> impl IntoResponse {
    match state.results.submit(result).await {
        Ok(()) => {
            metrics::record_status_submitted();
            (StatusCode::ACCEPTED, Json(json!({ "status": "queued" })))
        }
        Err(SubmitError::Closed(r)) | Err(SubmitError::Full(r)) => {
            metrics::record_status_rejected();
            tracing::warn!(rule_id = %r.rule_id, "Result queue unavailable, status dropped");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "result queue is closed" })),
            )
        }
    }
}

async fn get_rule_status(
    State(state): State<Arc<AppState>>,
    Path((project_id, rule_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.statuses.get(&project_id, &rule_id).await {
        Some(result) => (StatusCode::OK, Json(json!(result))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no status for {}/{}", project_id, rule_id) })),
        ),
    }
}
