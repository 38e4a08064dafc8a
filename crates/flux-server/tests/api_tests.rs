use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use flux_config::RouterConfig;
use flux_core::bus::ModuleBus;
use flux_server::{AppState, Workers};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tower::ServiceExt;

fn create_test_app() -> (Router, Arc<AppState>, Workers) {
    let bus = Arc::new(ModuleBus::new());
    let (state, workers) =
        flux_server::build_app(&RouterConfig::default(), bus).expect("Failed to build app");
    (flux_server::api::create_router(state.clone()), state, workers)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn endpoint(name: &str, endpoint_type: &str) -> Value {
    json!({
        "apiVersion": "rules.flux.io/v1",
        "kind": "RuleEndpoint",
        "metadata": {"name": name, "namespace": "default"},
        "spec": {"ruleEndpointType": endpoint_type}
    })
}

fn rule(name: &str, topic: &str, node_name: &str) -> Value {
    json!({
        "apiVersion": "rules.flux.io/v1",
        "kind": "Rule",
        "metadata": {"name": name, "namespace": "default"},
        "spec": {
            "source": "eventbus-test",
            "sourceResource": {"topic": topic, "node_name": node_name},
            "target": "rest-test",
            "targetResource": {"resource": "http://127.0.0.1:8080/data"}
        }
    })
}

fn review(operation: &str, object: Value) -> Value {
    json!({
        "apiVersion": "admission.flux.io/v1",
        "kind": "AdmissionReview",
        "request": {
            "uid": "705ab4f5-6393-11e8-b7cc-42010a800002",
            "operation": operation,
            "namespace": "default",
            "object": object
        }
    })
}

async fn seed_endpoints(app: &Router) {
    for (name, ty) in [("rest-test", "rest"), ("eventbus-test", "eventbus")] {
        let (status, _) = call(app, "POST", "/api/v1/ruleendpoints", Some(endpoint(name, ty))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _state, _workers) = create_test_app();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admission_review_missing_endpoint() {
    let (app, _state, _workers) = create_test_app();

    let (status, json) = call(
        &app,
        "POST",
        "/admission/rules",
        Some(review("CREATE", rule("r1", "t1", "n1"))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["kind"], "AdmissionReview");
    assert_eq!(json["response"]["uid"], "705ab4f5-6393-11e8-b7cc-42010a800002");
    assert_eq!(json["response"]["allowed"], false);
    assert!(json["response"]["result"]["message"]
        .as_str()
        .unwrap()
        .contains("has not been created"));
}

#[tokio::test]
async fn test_admission_review_allows_valid_rule() {
    let (app, _state, _workers) = create_test_app();
    seed_endpoints(&app).await;

    let (status, json) = call(
        &app,
        "POST",
        "/admission/rules",
        Some(review("CREATE", rule("r1", "t1", "n1"))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"]["allowed"], true);
    assert!(json["response"].get("result").is_none());
}

#[tokio::test]
async fn test_admission_review_unsupported_operation() {
    let (app, _state, _workers) = create_test_app();

    let (_, json) = call(
        &app,
        "POST",
        "/admission/rules",
        Some(review("UPDATE", rule("r1", "t1", "n1"))),
    )
    .await;

    assert_eq!(json["response"]["allowed"], false);
    assert_eq!(
        json["response"]["result"]["message"],
        "Unsupported webhook operation!"
    );
}

#[tokio::test]
async fn test_admission_review_without_request() {
    let (app, _state, _workers) = create_test_app();

    let (status, _) = call(
        &app,
        "POST",
        "/admission/rules",
        Some(json!({"kind": "AdmissionReview"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_rule_enforces_source_uniqueness() {
    let (app, state, _workers) = create_test_app();
    seed_endpoints(&app).await;

    let (status, _) = call(&app, "POST", "/api/v1/rules", Some(rule("r1", "t1", "n1"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = call(&app, "POST", "/api/v1/rules", Some(rule("r2", "t1", "n1"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "source properties exist. node_name: n1, topic: t1");

    let (status, _) = call(&app, "POST", "/api/v1/rules", Some(rule("r3", "t1", "n2"))).await;
    assert_eq!(status, StatusCode::CREATED);

    use flux_rule::EndpointStore;
    assert_eq!(state.store.list_rules("default").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_rule_frees_source() {
    let (app, _state, _workers) = create_test_app();
    seed_endpoints(&app).await;

    call(&app, "POST", "/api/v1/rules", Some(rule("r1", "t1", "n1"))).await;

    let (status, _) = call(&app, "DELETE", "/api/v1/rules/default/r1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "DELETE", "/api/v1/rules/default/r1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "POST", "/api/v1/rules", Some(rule("r2", "t1", "n1"))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_delete_rule_endpoint_blocks_new_rules() {
    let (app, _state, _workers) = create_test_app();
    seed_endpoints(&app).await;

    let (status, _) = call(&app, "DELETE", "/api/v1/ruleendpoints/default/eventbus-test", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "DELETE", "/api/v1/ruleendpoints/default/eventbus-test", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = call(&app, "POST", "/api/v1/rules", Some(rule("r1", "t1", "n1"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json["error"],
        "source ruleEndpoint default/eventbus-test has not been created."
    );
}

#[tokio::test]
async fn test_rule_status_relayed_to_reconciler() {
    let (app, _state, _workers) = create_test_app();

    let (status, _) = call(
        &app,
        "POST",
        "/api/v1/rulestatus",
        Some(json!({"RuleID": "r1", "ProjectID": "p1", "Status": "SUCCESS"})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let mut found = None;
    for _ in 0..50 {
        let (status, json) = call(&app, "GET", "/api/v1/rulestatus/p1/r1", None).await;
        if status == StatusCode::OK {
            found = Some(json);
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }

    let json = found.expect("status never reached the reconciler");
    assert_eq!(json["RuleID"], "r1");
    assert_eq!(json["ProjectID"], "p1");
    assert_eq!(json["Status"], "SUCCESS");
}

#[tokio::test]
async fn test_rule_status_unknown() {
    let (app, _state, _workers) = create_test_app();

    let (status, _) = call(&app, "GET", "/api/v1/rulestatus/p1/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rule_status_after_relay_stopped() {
    let (app, _state, workers) = create_test_app();

    workers.relay.stop();
    workers.relay.join().await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/v1/rulestatus",
        Some(json!({"RuleID": "r1", "ProjectID": "p1", "Status": "SUCCESS"})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
