//! The flow model contract and the predictors shipped with the crate.
//!
//! A predictor receives one [`FeatureRow`] per edge and answers one
//! predicted flow per row, in the same order. Models are trained offline;
//! the crate only evaluates them.

use std::fs;
use std::path::Path;

use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::forecast::{ForecastKey, PredictorError};
use crate::graph::{Edge, Graph};

/// Column order of the feature schema.
pub const FEATURES: [&str; 7] = [
    "hour",
    "day_of_week",
    "is_peak",
    "capacity",
    "length_m",
    "flow_lag1",
    "flow_lag2",
];

/// One model input row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRow {
    pub hour: f64,
    pub day_of_week: u8,
    pub is_peak: u8,
    pub capacity: f64,
    pub length_m: f64,
    pub flow_lag1: f64,
    pub flow_lag2: f64,
}

impl FeatureRow {
    /// Values in [`FEATURES`] order.
    pub fn values(&self) -> [f64; 7] {
        [
            self.hour,
            self.day_of_week as f64,
            self.is_peak as f64,
            self.capacity,
            self.length_m,
            self.flow_lag1,
            self.flow_lag2,
        ]
    }
}

/// Derives model inputs from static edge attributes.
///
/// No flow history is available at serving time, so both lag features
/// are a fixed fraction of the edge capacity. This is an approximation:
/// the lags never reflect observed flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureBuilder {
    pub lag_fraction: f64,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        FeatureBuilder { lag_fraction: 0.1 }
    }
}

impl FeatureBuilder {
    pub fn row(&self, key: &ForecastKey, edge: &Edge) -> FeatureRow {
        let lag = self.lag_fraction * edge.capacity;
        FeatureRow {
            hour: key.hour(),
            day_of_week: key.day_of_week(),
            is_peak: key.is_peak() as u8,
            capacity: edge.capacity,
            length_m: edge.length_m,
            flow_lag1: lag,
            flow_lag2: lag,
        }
    }

    /// One row per graph edge, in edge index order.
    pub fn rows(&self, graph: &Graph, key: &ForecastKey) -> Vec<FeatureRow> {
        graph
            .graph
            .raw_edges()
            .par_iter()
            .map(|edge| self.row(key, &edge.weight))
            .collect()
    }
}

/// A trained flow model.
pub trait FlowPredictor: Send + Sync {
    /// Predicts the flow of every row, in row order.
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, PredictorError>;

    fn name(&self) -> &str;
}

/// Mean flow of the demand curve the training data was synthesised from:
/// a quarter of capacity, plus 40% at peak (10% off-peak), plus a slight
/// rise over the day.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselinePredictor;

impl BaselinePredictor {
    #[inline]
    fn flow(row: &FeatureRow) -> f64 {
        let capacity = row.capacity;
        let peak_share = if row.is_peak != 0 { 0.4 } else { 0.1 };

        0.25 * capacity + peak_share * capacity + 0.05 * capacity * (row.hour / 24.0)
    }
}

impl FlowPredictor for BaselinePredictor {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, PredictorError> {
        Ok(rows.par_iter().map(BaselinePredictor::flow).collect())
    }

    fn name(&self) -> &str {
        "baseline"
    }
}

#[derive(Debug, Deserialize)]
struct LinearModelFile {
    intercept: f64,
    #[serde(default)]
    coefficients: FxHashMap<String, f64>,
}

/// A linear model exported by the training pipeline as JSON:
///
/// ```json
/// { "intercept": 12.5, "coefficients": { "capacity": 0.61, "is_peak": 140.0 } }
/// ```
///
/// Features left out of `coefficients` weigh nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPredictor {
    intercept: f64,
    coefficients: [f64; 7],
}

impl LinearPredictor {
    pub fn new(intercept: f64, coefficients: [f64; 7]) -> Self {
        LinearPredictor {
            intercept,
            coefficients,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PredictorError> {
        let path = path.as_ref();
        debug!("Loading linear flow model from {path:?}");
        LinearPredictor::from_json(&fs::read_to_string(path)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PredictorError> {
        let file: LinearModelFile = serde_json::from_str(json)?;
        let mut coefficients = [0.0; 7];

        for (feature, weight) in file.coefficients {
            let column = FEATURES
                .iter()
                .position(|name| *name == feature)
                .ok_or_else(|| PredictorError::Model(format!("unknown feature {feature}")))?;
            coefficients[column] = weight;
        }

        if !file.intercept.is_finite() || coefficients.iter().any(|w| !w.is_finite()) {
            return Err(PredictorError::Model(
                "model weights must be finite".to_string(),
            ));
        }

        Ok(LinearPredictor::new(file.intercept, coefficients))
    }
}

impl FlowPredictor for LinearPredictor {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, PredictorError> {
        Ok(rows
            .par_iter()
            .map(|row| {
                row.values()
                    .iter()
                    .zip(self.coefficients.iter())
                    .fold(self.intercept, |acc, (value, weight)| acc + value * weight)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "linear"
    }
}
