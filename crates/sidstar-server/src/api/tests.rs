use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use sidstar_core::ChartDocument;
use std::sync::Arc;
use tower::ServiceExt;

use crate::{api, config::Config, persistence, state::AppState};

async fn setup_app() -> (axum::Router, Arc<AppState>) {
    setup_app_with(Config::from_env()).await
}

async fn setup_app_with(mut config: Config) -> (axum::Router, Arc<AppState>) {
    config.database_path = ":memory:".to_string();
    config.database_max_connections = 1;

    let db = persistence::init_database(
        &config.database_path,
        config.database_max_connections,
    )
    .await
    .expect("init db");
    let state = Arc::new(AppState::with_database(db, config.clone()));

    let chart = serde_json::from_value::<ChartDocument>(json!({
        "id": "LLBG-SUVAS1",
        "name": "SUVAS 1",
        "type": "SID",
        "map_url": "/data/LLBG-SUVAS1.png",
        "map_url_no_alt": "/data/LLBG-SUVAS1_no_alt.png",
        "fixes": [
            {"fix_name": "SUVAS", "min_alt": "3000", "max_alt": "5000"},
            {"fix_name": "DAFNA", "min_alt": "", "max_alt": "FL080"}
        ]
    }))
    .expect("chart document")
    .into_chart()
    .expect("chart");
    state.save_chart(chart).await.expect("seed chart");

    let app = api::routes(&config).with_state(state.clone());
    (app, state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn post_score(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/score")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn list_charts_by_airport() {
    let (app, _state) = setup_app().await;

    let res = app.clone().oneshot(get("/api/charts/llbg")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    let charts = body.as_array().expect("chart array");
    assert_eq!(charts.len(), 1);
    assert_eq!(charts[0]["_id"], "LLBG-SUVAS1");
    assert_eq!(charts[0]["airport_id"], "LLBG");
    assert_eq!(charts[0]["type"], "SID");
    assert_eq!(charts[0]["fixes"][1]["fix_name"], "DAFNA");

    let res = app.oneshot(get("/api/charts/KJFK")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = read_json(res).await;
    assert_eq!(body["message"], "No charts found for airport KJFK.");
}

#[tokio::test]
async fn get_chart_with_mode_variant() {
    let (app, _state) = setup_app().await;

    let res = app
        .clone()
        .oneshot(get("/api/chart/LLBG-SUVAS1?mode=NO_ALT"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["active_map_url"], "/data/LLBG-SUVAS1_no_alt.png");
    assert_eq!(body["name"], "SUVAS 1");

    let res = app
        .clone()
        .oneshot(get("/api/chart/LLBG-SUVAS1?mode=CLEAN"))
        .await
        .unwrap();
    let body = read_json(res).await;
    assert_eq!(body["active_map_url"], "/data/LLBG-SUVAS1.png");

    let res = app.oneshot(get("/api/chart/NOPE")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn score_by_name_without_mode() {
    let (app, _state) = setup_app().await;

    let res = app
        .oneshot(post_score(json!({
            "mapId": "LLBG-SUVAS1",
            "waypoints": [
                {"id": "2", "name": "dafna", "minAltitude": "", "maxAltitude": "80", "x": 10, "y": 20},
                {"id": "1", "name": "SUVAS", "minAltitude": "2000", "maxAltitude": "5000", "x": 5, "y": 5},
                null
            ]
        })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["score"], 88);
    assert_eq!(body["totalFixes"], 2);
    assert_eq!(body["correctFixes"], 1);
    assert_eq!(
        body["altitudeErrors"],
        json!(["SUVAS: Minimum altitude expected 3000, got 2000."])
    );
    assert_eq!(body["missedFixes"], json!([]));
    assert_eq!(body["message"], "Good Job!");
    assert!(body.get("scoringMode").is_none());
    assert!(body.get("fixAccuracy").is_none());
}

#[tokio::test]
async fn score_by_position_with_mode() {
    let (app, _state) = setup_app().await;

    let res = app
        .oneshot(post_score(json!({
            "mapId": "LLBG-SUVAS1",
            "practiceMode": "NO_FIX",
            "waypoints": [
                {"name": "SUVAS"},
                {"name": ""}
            ]
        })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["score"], 50);
    assert_eq!(body["scoringMode"], "Fix Names");
    assert_eq!(body["fixAccuracy"], 50);
    assert!(body.get("altAccuracy").is_none());
    assert_eq!(body["missedFixes"], json!(["DAFNA (entered: Empty)"]));
    assert_eq!(body["altitudeErrors"], json!([]));
}

#[tokio::test]
async fn score_rejects_bad_envelopes() {
    let (app, _state) = setup_app().await;

    let res = app
        .clone()
        .oneshot(post_score(json!({"waypoints": []})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(res).await["message"], "Missing mapId");

    let res = app
        .clone()
        .oneshot(post_score(json!({"mapId": "LLBG-SUVAS1", "waypoints": "SUVAS"})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(res).await["message"], "Waypoints must be an array");

    let res = app
        .oneshot(post_score(json!({"mapId": "LLBG-NOPE", "waypoints": []})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(res).await["message"], "Chart not found");
}

#[tokio::test]
async fn score_body_is_read_without_content_type() {
    let (app, _state) = setup_app().await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/score")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(res).await["message"], "Missing mapId");

    let body = json!({"mapId": "LLBG-SUVAS1", "waypoints": [{"name": "SUVAS"}]});
    let req = Request::builder()
        .method("POST")
        .uri("/api/score")
        .header("content-type", "text/plain")
        .body(Body::from(body.to_string()))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_json(res).await["totalFixes"], 2);
}

#[tokio::test]
async fn score_rejects_unparseable_json_with_message() {
    let (app, _state) = setup_app().await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/score")
        .header("content-type", "application/json")
        .body(Body::from("{mapId: 'LLBG-SUVAS1'"))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(res).await["message"], "Request body must be valid JSON");
}

#[tokio::test]
async fn score_with_non_string_mode_matches_by_name() {
    let (app, _state) = setup_app().await;

    let res = app
        .oneshot(post_score(json!({
            "mapId": "LLBG-SUVAS1",
            "practiceMode": 7,
            "waypoints": [
                {"name": "DAFNA", "minAltitude": "", "maxAltitude": "FL080"},
                {"name": "SUVAS", "minAltitude": "3000", "maxAltitude": "5000"}
            ]
        })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["score"], 100);
    assert_eq!(body["message"], "Perfect Flight!");
    assert!(body.get("scoringMode").is_none());
}

#[tokio::test]
async fn chart_images_are_served_from_static_dir() {
    let static_dir = std::env::temp_dir().join(format!("sidstar-static-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("LLBG-SUVAS1.png"), b"chart-bytes").unwrap();

    let mut config = Config::from_env();
    config.static_dir = static_dir.to_string_lossy().to_string();
    let (app, _state) = setup_app_with(config).await;

    let res = app.clone().oneshot(get("/data/LLBG-SUVAS1.png")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "image/png");
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"chart-bytes");

    let res = app.oneshot(get("/data/missing.png")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    std::fs::remove_dir_all(&static_dir).unwrap();
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let (app, _state) = setup_app().await;

    let req = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "trace-me");

    let res = app.oneshot(get("/health")).await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn chart_reads_are_cached() {
    let (app, state) = setup_app().await;

    let res = app.oneshot(get("/api/chart/LLBG-SUVAS1")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(state.cached_chart_count(), 1);
    assert!(state.get_chart("LLBG-SUVAS1").await.unwrap().is_some());
}
