use log::{debug, info};
use serde::Serialize;
use strum::{Display, EnumString};

use crate::forecast::{ForecastKey, ForecastTable};
use crate::graph::Graph;
use crate::route::primitives::astar::endpoints;
use crate::route::{
    find_path, k_shortest_simple_paths, Deadline, DistanceCost, EdgeCost, Path, PenalizedCost,
    RouteError,
};

/// Which families of routes to compute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Both,
    Penalized,
    Distance,
}

impl Mode {
    pub fn penalized(&self) -> bool {
        matches!(self, Mode::Both | Mode::Penalized)
    }

    pub fn distance(&self) -> bool {
        matches!(self, Mode::Both | Mode::Distance)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub source: String,
    pub target: String,
    pub mode: Mode,
    pub k: usize,
}

impl RouteRequest {
    pub const DEFAULT_K: usize = 3;

    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        RouteRequest {
            source: source.into(),
            target: target.into(),
            mode: Mode::default(),
            k: Self::DEFAULT_K,
        }
    }

    pub fn with_mode(self, mode: Mode) -> Self {
        RouteRequest { mode, ..self }
    }

    pub fn with_k(self, k: usize) -> Self {
        RouteRequest { k, ..self }
    }

    /// Builds a request from raw query values. `mode` defaults to `both`
    /// and `k` to 3; endpoints are required.
    pub fn parse(
        source: Option<&str>,
        target: Option<&str>,
        mode: Option<&str>,
        k: Option<&str>,
    ) -> Result<Self, RouteError> {
        let (source, target) = match (source.map(str::trim), target.map(str::trim)) {
            (Some(source), Some(target)) if !source.is_empty() && !target.is_empty() => {
                (source, target)
            }
            _ => {
                return Err(RouteError::InvalidInput(
                    "source and target are required".to_string(),
                ))
            }
        };

        let mode = match mode {
            Some(value) => value.trim().parse::<Mode>().map_err(|_| {
                RouteError::InvalidInput(format!(
                    "invalid mode {value}; expected both, penalized or distance"
                ))
            })?,
            None => Mode::default(),
        };

        let k = match k {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|k| *k >= 1)
                .ok_or_else(|| {
                    RouteError::InvalidInput(format!("k must be a positive integer, given {value}"))
                })?,
            None => Self::DEFAULT_K,
        };

        Ok(RouteRequest::new(source, target).with_mode(mode).with_k(k))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coordinate {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub path: Vec<String>,
    pub len_m: f64,
    pub cost: f64,
    pub walk_minutes: f64,
    pub coords: Vec<Coordinate>,
}

/// The forecast a penalized route was priced against.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ForecastRef {
    pub key: ForecastKey,
    pub version: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best: Option<RouteSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_alts: Option<Vec<RouteSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortest: Option<RouteSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortest_alts: Option<Vec<RouteSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<ForecastRef>,
}

/// Answers route requests against a graph and an optional forecast.
#[derive(Debug, Clone, Copy)]
pub struct Planner {
    pub walking_speed_mps: f64,
}

impl Default for Planner {
    fn default() -> Self {
        Planner {
            walking_speed_mps: Self::WALKING_SPEED_MPS,
        }
    }
}

impl Planner {
    /// Average pedestrian pace.
    pub const WALKING_SPEED_MPS: f64 = 1.3;

    /// Computes the congestion-aware and the distance-only routes the
    /// request asks for.
    ///
    /// The forecast is the snapshot taken when the request arrived. It is
    /// required for the penalized family and ignored otherwise.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, graph, forecast, deadline)))]
    pub fn plan(
        &self,
        graph: &Graph,
        request: &RouteRequest,
        forecast: Option<&ForecastTable>,
        deadline: &Deadline,
    ) -> Result<RouteResponse, RouteError> {
        if request.k == 0 {
            return Err(RouteError::InvalidInput(
                "k must be a positive integer, given 0".to_string(),
            ));
        }

        endpoints(graph, &request.source, &request.target)?;

        let forecast = match (request.mode.penalized(), forecast) {
            (true, None) => return Err(RouteError::ForecastNotLoaded),
            (true, Some(table)) => Some(table),
            (false, _) => None,
        };

        let mut response = RouteResponse::default();

        if let Some(table) = forecast {
            let cost = PenalizedCost::new(graph, table);
            let (best, alternatives) = self.family(graph, request, &cost, deadline)?;

            debug!(
                "Penalized route {} -> {} costs {:.1} under forecast v{}",
                request.source,
                request.target,
                best.cost,
                cost.forecast_version()
            );

            response.best = Some(best);
            response.best_alts = Some(alternatives);
            response.forecast = Some(ForecastRef {
                key: table.key(),
                version: table.version(),
            });
        }

        if request.mode.distance() {
            let (shortest, alternatives) = self.family(graph, request, &DistanceCost, deadline)?;

            response.shortest = Some(shortest);
            response.shortest_alts = Some(alternatives);
        }

        info!(
            "Routed {} -> {} (mode={}, k={})",
            request.source, request.target, request.mode, request.k
        );

        Ok(response)
    }

    fn family<C>(
        &self,
        graph: &Graph,
        request: &RouteRequest,
        cost: &C,
        deadline: &Deadline,
    ) -> Result<(RouteSummary, Vec<RouteSummary>), RouteError>
    where
        C: EdgeCost + ?Sized,
    {
        deadline.check()?;
        let primary = find_path(graph, &request.source, &request.target, cost)?;
        let alternatives = k_shortest_simple_paths(
            graph,
            &request.source,
            &request.target,
            cost,
            request.k,
            deadline,
        )?;

        Ok((
            self.summarise(graph, &primary),
            alternatives
                .iter()
                .map(|path| self.summarise(graph, path))
                .collect(),
        ))
    }

    pub fn summarise(&self, graph: &Graph, path: &Path) -> RouteSummary {
        let nodes = path.resolve(graph);
        let len_m = path.length_m(graph);

        RouteSummary {
            path: nodes.iter().map(|node| node.id.clone()).collect(),
            len_m,
            cost: path.cost,
            walk_minutes: len_m / self.walking_speed_mps / 60.0,
            coords: nodes
                .into_iter()
                .map(|node| Coordinate {
                    id: node.id.clone(),
                    lat: node.lat(),
                    lon: node.lon(),
                    label: node.label.clone(),
                })
                .collect(),
        }
    }
}
