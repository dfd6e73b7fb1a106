//! Edge costing strategies for the path searches.
//!
//! A strategy is built per request and handed to the search explicitly.
//! Two are provided: [`DistanceCost`] weighs an edge by its length, and
//! [`PenalizedCost`] scales that length by the congestion penalty of one
//! specific forecast.
//!
//! Any `Fn(NodeIx, NodeIx, EdgeIx, &Edge) -> f64` is also a strategy.

use crate::congestion::CongestionModel;
use crate::forecast::ForecastTable;
use crate::graph::{Edge, EdgeIx, Graph, NodeIx};

pub trait EdgeCost {
    /// Cost of moving from `u` to `v` over `edge`. Must be non-negative.
    fn cost(&self, u: NodeIx, v: NodeIx, index: EdgeIx, edge: &Edge) -> f64;
}

impl<F> EdgeCost for F
where
    F: Fn(NodeIx, NodeIx, EdgeIx, &Edge) -> f64,
{
    #[inline]
    fn cost(&self, u: NodeIx, v: NodeIx, index: EdgeIx, edge: &Edge) -> f64 {
        self(u, v, index, edge)
    }
}

/// Plain segment length.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceCost;

impl EdgeCost for DistanceCost {
    #[inline]
    fn cost(&self, _: NodeIx, _: NodeIx, _: EdgeIx, edge: &Edge) -> f64 {
        edge.base_weight()
    }
}

/// `length × (1 + penalty)` for every edge, evaluated once against the
/// forecast given at construction.
#[derive(Debug, Clone)]
pub struct PenalizedCost {
    weights: Vec<f64>,
    version: u64,
}

impl PenalizedCost {
    pub fn new(graph: &Graph, forecast: &ForecastTable) -> Self {
        let model = CongestionModel::new(Some(forecast));
        let weights = graph
            .edges()
            .map(|(_, _, _, edge)| edge.base_weight() * (1.0 + model.penalty(&edge.id)))
            .collect();

        PenalizedCost {
            weights,
            version: forecast.version(),
        }
    }

    /// The penalized weight of an edge.
    #[inline]
    pub fn weight(&self, index: EdgeIx) -> Option<f64> {
        self.weights.get(index.index()).copied()
    }

    /// Version of the forecast the weights were derived from.
    pub fn forecast_version(&self) -> u64 {
        self.version
    }
}

impl EdgeCost for PenalizedCost {
    #[inline]
    fn cost(&self, _: NodeIx, _: NodeIx, index: EdgeIx, edge: &Edge) -> f64 {
        self.weight(index).unwrap_or_else(|| edge.base_weight())
    }
}
