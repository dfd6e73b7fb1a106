use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::FromRequestParts;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde::Deserialize;
use serde_json::Value;
use tower::ServiceExt;

use crate::forecast::BaselinePredictor;
use crate::server::{router, AppState, Config, QueryParams, FORECAST_VERSION_HEADER};
use crate::util::fixtures::{fixture_path, line_graph, ConstantPredictor, FailingPredictor, CAMPUS};
use crate::graph::Graph;

fn campus_state() -> AppState {
    let graph = Graph::from_csv(
        fixture_path(CAMPUS, "nodes.csv"),
        fixture_path(CAMPUS, "edges.csv"),
    )
    .unwrap();

    AppState::new(graph, Arc::new(BaselinePredictor))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let version = response
        .headers()
        .get(FORECAST_VERSION_HEADER)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, version, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn status_reports_graph_and_cache() {
    let app = router(campus_state());

    let (status, _, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["graph"]["nodes"], 9);
    assert_eq!(body["graph"]["edges"], 9);
    assert_eq!(body["graph"]["connected"], false);
    assert_eq!(body["cached_forecasts"], 0);
    assert!(body["active_forecast"].is_null());

    get(&app, "/forecast").await;
    let (_, _, body) = get(&app, "/").await;
    assert_eq!(body["cached_forecasts"], 1);
    assert_eq!(body["active_forecast"], 1);
}

#[tokio::test]
async fn graph_lists_nodes_and_edges() {
    let app = router(campus_state());

    let (status, _, body) = get(&app, "/graph").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"].as_array().unwrap().len(), 9);
    assert_eq!(body["nodes"][6]["label"], "Library");

    let edges = body["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 9);
    assert_eq!(edges[0]["id"], "e1");
    assert_eq!(edges[0]["source"], "n1");
    assert_eq!(edges[0]["target"], "n2");
    assert_eq!(edges[2]["kind"], "road");
    assert_eq!(edges[5]["capacity"], 400.0);
}

#[tokio::test]
async fn forecast_uses_defaults_and_the_cache() {
    let predictor = Arc::new(ConstantPredictor::new(120.0));
    let app = router(AppState::new(line_graph(), predictor.clone()));

    let (status, version, body) = get(&app, "/forecast").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(version.as_deref(), Some("1"));
    assert_eq!(
        body,
        serde_json::json!([
            { "edge_id": "ab", "pred_flow": 120.0, "capacity": 400.0 },
            { "edge_id": "bc", "pred_flow": 120.0, "capacity": 400.0 },
        ])
    );

    // hour=9, day_of_week=1, is_peak=1 are the defaults.
    let (_, version, _) = get(&app, "/forecast?hour=9&day_of_week=1&is_peak=true").await;
    assert_eq!(version.as_deref(), Some("1"));
    assert_eq!(predictor.calls(), 1);

    let (_, version, _) = get(&app, "/forecast?use_cache=false").await;
    assert_eq!(version.as_deref(), Some("2"));
    assert_eq!(predictor.calls(), 2);

    let (_, version, _) = get(&app, "/forecast?hour=17.5&is_peak=0").await;
    assert_eq!(version.as_deref(), Some("3"));
}

#[tokio::test]
async fn forecast_rejects_bad_keys() {
    let app = router(campus_state());

    for uri in [
        "/forecast?hour=noon",
        "/forecast?hour=24",
        "/forecast?day_of_week=7",
        "/forecast?is_peak=maybe",
    ] {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn predictor_failures_are_internal_errors() {
    let app = router(AppState::new(line_graph(), Arc::new(FailingPredictor)));

    let (status, _, body) = get(&app, "/forecast").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "flow model error: model unavailable");

    let (status, _, _) = get(&app, "/route?source=A&target=C&mode=penalized").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn route_requires_a_forecast_first() {
    let app = router(AppState::new(line_graph(), Arc::new(ConstantPredictor::new(350.0))));

    let (status, _, body) = get(&app, "/route?source=A&target=C").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "forecast not loaded; call /forecast first");

    get(&app, "/forecast").await;

    let (status, _, body) = get(&app, "/route?source=A&target=C").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["best"]["path"], serde_json::json!(["A", "B", "C"]));
    assert_eq!(body["best"]["len_m"], 200.0);
    assert_eq!(body["best"]["cost"], 340.0);
    assert_eq!(body["shortest"]["cost"], 200.0);
    assert_eq!(body["best_alts"].as_array().unwrap().len(), 1);
    assert_eq!(body["forecast"]["version"], 1);
    assert_eq!(body["best"]["coords"][0]["label"], "Gate");
}

#[tokio::test]
async fn distance_routes_need_no_forecast() {
    let app = router(campus_state());

    let (status, _, body) = get(&app, "/route?source=n1&target=n3&mode=distance&k=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("best").is_none());
    assert!(body.get("forecast").is_none());
    assert_eq!(body["shortest"]["path"], serde_json::json!(["n1", "n2", "n3"]));
    assert_eq!(body["shortest_alts"].as_array().unwrap().len(), 2);
    assert_eq!(body["shortest_alts"][1]["len_m"], 240.0);
}

#[tokio::test]
async fn route_errors_map_to_statuses() {
    let app = router(campus_state());
    get(&app, "/forecast").await;

    let cases = [
        ("/route?target=n3", StatusCode::BAD_REQUEST),
        ("/route?source=n1&target=zz", StatusCode::BAD_REQUEST),
        ("/route?source=n1&target=n3&mode=fastest", StatusCode::BAD_REQUEST),
        ("/route?source=n1&target=n3&k=0", StatusCode::BAD_REQUEST),
        ("/route?source=n1&target=n9", StatusCode::NOT_FOUND),
    ];

    for (uri, expected) in cases {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, expected, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }

    let (status, _, body) = get(&app, "/route?source=n2&target=n2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["best"]["path"], serde_json::json!(["n2"]));
    assert_eq!(body["best"]["len_m"], 0.0);
}

#[tokio::test]
async fn exhausted_timeout_is_a_gateway_timeout() {
    let app = router(campus_state().with_timeout(Duration::ZERO));

    let (status, _, _) = get(&app, "/route?source=n1&target=n3&mode=distance").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
}

#[test]
fn config_reads_overrides_and_defaults() {
    let config = Config::from_lookup(|_| None).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.address(), "0.0.0.0:5000");

    let config = Config::from_lookup(|name| match name {
        "APP_PORT" => Some("8080".to_string()),
        "ALLOWED_ORIGINS" => Some("http://a.test, http://b.test,".to_string()),
        "FLOW_MODEL" => Some("model.json".to_string()),
        "ROUTE_TIMEOUT_MS" => Some("250".to_string()),
        "NODES_CSV" => Some(" ".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.allowed_origins, ["http://a.test", "http://b.test"]);
    assert_eq!(config.flow_model.as_deref(), Some(std::path::Path::new("model.json")));
    assert_eq!(config.route_timeout, Duration::from_millis(250));
    assert_eq!(config.nodes_csv, Config::default().nodes_csv);

    for (name, value) in [("APP_PORT", "http"), ("ROUTE_TIMEOUT_MS", "-1")] {
        let result = Config::from_lookup(|key| (key == name).then(|| value.to_string()));
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }
}

#[test]
fn loads_state_from_config() {
    let config = Config {
        nodes_csv: fixture_path(CAMPUS, "nodes.csv"),
        edges_csv: fixture_path(CAMPUS, "edges.csv"),
        ..Config::default()
    };
    let state = AppState::from_config(&config).unwrap();
    assert_eq!(state.graph.size(), 9);
    assert_eq!(state.predictor.name(), "baseline");

    let missing = Config {
        flow_model: Some(fixture_path(CAMPUS, "missing.json")),
        ..config
    };
    assert!(matches!(
        AppState::from_config(&missing),
        Err(crate::Error::Predictor(_))
    ));
}

#[derive(Debug, Deserialize)]
struct Limit {
    k: u32,
}

#[tokio::test]
async fn unreadable_queries_are_bad_requests() {
    let (mut parts, _) = Request::builder()
        .uri("/anything?k=many")
        .body(())
        .unwrap()
        .into_parts();

    let rejection = QueryParams::<Limit>::from_request_parts(&mut parts, &())
        .await
        .err()
        .unwrap();

    assert!(matches!(rejection, crate::Error::InvalidQuery(_)));
    assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    assert!(rejection.to_string().starts_with("invalid query string"));

    let (mut parts, _) = Request::builder()
        .uri("/anything?k=7")
        .body(())
        .unwrap()
        .into_parts();
    let QueryParams(limit) = QueryParams::<Limit>::from_request_parts(&mut parts, &())
        .await
        .unwrap();
    assert_eq!(limit.k, 7);
}
