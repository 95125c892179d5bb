mod common;

use axum::http::StatusCode;
use common::{app_with, get_json, MemoryStore, UnreachableStore};
use serde_json::json;
use std::sync::Arc;
use vpcdemo_common::config::AppConfig;

#[tokio::test]
async fn health_is_independent_of_dependencies() {
    let app = app_with(AppConfig::default(), Arc::new(UnreachableStore));

    let (status, body) = get_json(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"Status": "Healthy"}));
}

#[tokio::test]
async fn root_registers_request_even_when_database_is_down() {
    let app = app_with(AppConfig::default(), Arc::new(UnreachableStore));

    let (status, body) = get_json(&app, "/", Some("curl/8.5.0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"Response": "Registered request"}));

    // No identifier at all
    let (status, body) = get_json(&app, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"Response": "Registered request"}));
}

#[tokio::test]
async fn recent_visits_fails_with_fixed_body_when_database_is_down() {
    let app = app_with(AppConfig::default(), Arc::new(UnreachableStore));

    let (status, body) = get_json(&app, "/recent-visits", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"Response": "Error, unable to produce recent visits"}));
}

#[tokio::test]
async fn recent_visits_returns_last_ten_newest_first() {
    let store = Arc::new(MemoryStore::default());
    let app = app_with(AppConfig::default(), store.clone());

    for i in 1..=12 {
        let agent = format!("agent-{}", i);
        let (status, _) = get_json(&app, "/", Some(agent.as_str())).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get_json(&app, "/recent-visits", None).await;
    assert_eq!(status, StatusCode::OK);

    let visits = body["Response"].as_array().expect("Response should be a list");
    let agents: Vec<&str> = visits
        .iter()
        .map(|v| v["user_agent"].as_str().unwrap())
        .collect();
    let expected: Vec<String> = (3..=12).rev().map(|i| format!("agent-{}", i)).collect();
    assert_eq!(agents, expected);

    assert!(visits.iter().all(|v| v["timestamp"].is_string()));
}

#[tokio::test]
async fn recent_visits_with_fewer_than_ten_rows() {
    let store = Arc::new(MemoryStore::default());
    let app = app_with(AppConfig::default(), store.clone());

    get_json(&app, "/", Some("first")).await;
    get_json(&app, "/", None).await;
    get_json(&app, "/", Some("third")).await;

    let (_, body) = get_json(&app, "/recent-visits", None).await;
    let agents: Vec<&str> = body["Response"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["user_agent"].as_str().unwrap())
        .collect();
    assert_eq!(agents, vec!["third", "", "first"]);
}

#[tokio::test]
async fn identifier_with_sql_metacharacters_is_stored_verbatim() {
    let store = Arc::new(MemoryStore::default());
    let app = app_with(AppConfig::default(), store.clone());
    let hostile = "x'); DELETE FROM access; --";

    let (status, _) = get_json(&app, "/", Some(hostile)).await;
    assert_eq!(status, StatusCode::OK);

    let rows = store.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_agent.as_deref(), Some(hostile));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let app = app_with(AppConfig::default(), Arc::new(MemoryStore::default()));

    let response = tower::ServiceExt::oneshot(
        app,
        axum::http::Request::builder()
            .uri("/papers")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
