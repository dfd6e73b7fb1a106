use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::forecast::ForecastKey;
use crate::graph::{EdgeKind, GraphSummary};
use crate::route::{Deadline, RouteRequest, RouteResponse};
use crate::server::{AppState, ForecastParams, QueryParams, RouteParams};

pub const FORECAST_VERSION_HEADER: &str = "x-forecast-version";

#[derive(Debug, Serialize)]
pub struct Status {
    pub graph: GraphSummary,
    pub cached_forecasts: usize,
    pub active_forecast: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct NodeView<'a> {
    pub id: &'a str,
    pub lat: f64,
    pub lon: f64,
    pub label: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EdgeView<'a> {
    pub id: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    pub length_m: f64,
    pub capacity: f64,
    pub kind: EdgeKind,
}

#[derive(Debug, Serialize)]
pub struct GraphView<'a> {
    pub nodes: Vec<NodeView<'a>>,
    pub edges: Vec<EdgeView<'a>>,
}

/// Runs blocking engine work off the async workers.
async fn blocking<T, F>(work: F) -> crate::Result<T>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| crate::Error::Internal(err.to_string()))?
}

pub async fn status(State(state): State<AppState>) -> Json<Status> {
    Json(Status {
        graph: state.graph.summary(),
        cached_forecasts: state.cache.len(),
        active_forecast: state.cache.active().map(|table| table.version()),
    })
}

pub async fn graph(State(state): State<AppState>) -> Response {
    let graph = &state.graph;

    let nodes = graph
        .nodes()
        .map(|(_, node)| NodeView {
            id: &node.id,
            lat: node.lat(),
            lon: node.lon(),
            label: &node.label,
        })
        .collect();

    let edges = graph
        .edges()
        .filter_map(|(_, source, target, edge)| {
            Some(EdgeView {
                id: &edge.id,
                source: &graph.node(source)?.id,
                target: &graph.node(target)?.id,
                length_m: edge.length_m,
                capacity: edge.capacity,
                kind: edge.kind,
            })
        })
        .collect();

    Json(GraphView { nodes, edges }).into_response()
}

#[cfg_attr(feature = "tracing", tracing::instrument(skip(state)))]
pub async fn forecast(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ForecastParams>,
) -> crate::Result<Response> {
    let key = ForecastKey::parse(
        params.hour.as_deref(),
        params.day_of_week.as_deref(),
        params.is_peak.as_deref(),
    )?;
    let force_refresh = !params.use_cache();

    let worker = state.clone();
    let table = blocking(move || {
        worker
            .cache
            .get_or_build(
                &worker.graph,
                key,
                &worker.features,
                worker.predictor.as_ref(),
                force_refresh,
            )
            .map_err(crate::Error::from)
    })
    .await?;

    let mut response = Json(table.as_ref()).into_response();
    response.headers_mut().insert(
        FORECAST_VERSION_HEADER,
        HeaderValue::from(table.version()),
    );

    Ok(response)
}

#[cfg_attr(feature = "tracing", tracing::instrument(skip(state)))]
pub async fn route(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<RouteParams>,
) -> crate::Result<Json<RouteResponse>> {
    let request = RouteRequest::parse(
        params.source.as_deref(),
        params.target.as_deref(),
        params.mode.as_deref(),
        params.k.as_deref(),
    )?;

    // One snapshot per request; a concurrent /forecast does not affect it.
    let forecast = state.cache.active();
    let deadline = Deadline::after(state.route_timeout);

    let response = blocking(move || {
        state
            .planner
            .plan(&state.graph, &request, forecast.as_deref(), &deadline)
            .map_err(crate::Error::from)
    })
    .await?;

    Ok(Json(response))
}
