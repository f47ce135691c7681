use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use pongal_games_back::{
    config::AppConfig,
    dao::record_store::InMemoryRecordStore,
    routes,
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let state =
        AppState::with_store(AppConfig::default(), Arc::new(InMemoryRecordStore::new())).await;
    routes::router(state)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn healthcheck_reports_ok_with_store() {
    let app = app().await;
    let (status, body) = call(&app, Method::GET, "/healthcheck", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn degraded_state_answers_service_unavailable() {
    let app = routes::router(AppState::new(AppConfig::default()));
    let (status, body) = call(&app, Method::GET, "/games", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn team_game_from_schedule_to_results() {
    let app = app().await;

    let (status, game) = call(
        &app,
        Method::POST,
        "/games",
        Some(json!({
            "icon": "🪢",
            "tamil": "கயிறு இழுத்தல்",
            "english": "Tug of War",
            "category": "sports"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let game_id = game["id"].as_str().unwrap().to_owned();

    let (status, schedule) = call(
        &app,
        Method::POST,
        "/scheduled-games",
        Some(json!({
            "game_id": game_id,
            "scheduled_time": "16:00",
            "date": "2025-01-15",
            "venue": "Temple Ground",
            "game_type": "team"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = schedule["id"].as_str().unwrap().to_owned();

    for team in ["Red", "Blue"] {
        let (status, _) = call(
            &app,
            Method::POST,
            "/team-registrations",
            Some(json!({
                "scheduled_game_id": id,
                "team_name": team,
                "captain_name": format!("{team} captain"),
                "players": ["one", "two"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = call(
        &app,
        Method::PATCH,
        &format!("/scheduled-games/{id}/activate"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, live) = call(
        &app,
        Method::POST,
        &format!("/active-games/{id}/update-score"),
        Some(json!({"participant_index": 1, "score_change": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(live["status"], "playing");
    assert_eq!(live["current_scores"]["participants"][1]["name"], "Blue");
    assert_eq!(live["current_scores"]["participants"][1]["score"], 2);

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/active-games/{id}/update-score"),
        Some(json!({"participant_index": 5, "score_change": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/active-games/{id}/declare-winner"),
        Some(json!({"winner_name": "Blue", "winner_score": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, results) = call(&app, Method::GET, "/results", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results.as_array().map(Vec::len), Some(1));
    assert_eq!(results[0]["winner"]["name"], "Blue");
    assert_eq!(results[0]["runner_up"]["name"], "Red");

    let (status, stats) = call(&app, Method::GET, "/results/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_games"], 1);
    assert_eq!(stats["team_events"], 1);
    assert_eq!(stats["by_category"]["sports"], 1);

    let (status, active) = call(&app, Method::GET, "/scheduled-games/active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn unknown_scheduled_game_is_not_found() {
    let app = app().await;
    let id = uuid::Uuid::new_v4();
    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/active-games/{id}/update-score"),
        Some(json!({"participant_index": 0, "score_change": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("not found"));
}
