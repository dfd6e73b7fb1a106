use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

use crate::forecast::{ForecastKey, PredictorError};
use crate::graph::Graph;

/// Predicted load of a single edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastEntry {
    pub predicted_flow: f64,
    pub capacity: f64,
}

impl ForecastEntry {
    /// Load ratio, with capacity floored at 1.
    #[inline]
    pub fn ratio(&self) -> f64 {
        self.predicted_flow / self.capacity.max(1.0)
    }
}

/// A complete forecast: one entry for every edge of the graph, keyed by
/// edge id and kept in graph edge order.
#[derive(Debug, Clone)]
pub struct ForecastTable {
    key: ForecastKey,
    pub(crate) version: u64,
    entries: IndexMap<String, ForecastEntry>,
}

#[derive(serde::Serialize)]
struct ForecastRecord<'a> {
    edge_id: &'a str,
    pred_flow: f64,
    capacity: f64,
}

impl ForecastTable {
    /// Pairs each graph edge with its prediction.
    ///
    /// Fails unless there is exactly one finite prediction per edge.
    /// Negative predictions are stored as zero flow.
    pub fn from_predictions(
        graph: &Graph,
        key: ForecastKey,
        predictions: Vec<f64>,
    ) -> Result<Self, PredictorError> {
        if predictions.len() != graph.edge_count() {
            return Err(PredictorError::LengthMismatch {
                expected: graph.edge_count(),
                got: predictions.len(),
            });
        }

        let mut entries = IndexMap::with_capacity(predictions.len());
        for ((_, _, _, edge), flow) in graph.edges().zip(predictions) {
            if !flow.is_finite() {
                return Err(PredictorError::NonFinite {
                    edge: edge.id.clone(),
                    value: flow,
                });
            }

            entries.insert(
                edge.id.clone(),
                ForecastEntry {
                    predicted_flow: flow.max(0.0),
                    capacity: edge.capacity,
                },
            );
        }

        Ok(ForecastTable {
            key,
            version: 0,
            entries,
        })
    }

    #[inline]
    pub fn key(&self) -> ForecastKey {
        self.key
    }

    /// Assigned by the cache when the table is stored, starting at 1.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn get(&self, edge_id: &str) -> Option<&ForecastEntry> {
        self.entries.get(edge_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ForecastEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }
}

/// Serialized as a list of `{edge_id, pred_flow, capacity}` records.
impl Serialize for ForecastTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(edge_id, entry)| ForecastRecord {
            edge_id,
            pred_flow: entry.predicted_flow,
            capacity: entry.capacity,
        }))
    }
}
