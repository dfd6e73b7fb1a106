use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::forecast::{FeatureRow, FlowPredictor, PredictorError};
use crate::graph::{EdgeKind, Graph, GraphBuilder};

pub const CAMPUS: &str = "campus";
pub const BROKEN_EDGES: &str = "broken";

/// Path of a CSV file inside a named fixture directory.
pub fn fixture_path(fixture: &str, file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(fixture)
        .join(file)
}

/// `A - B - C`, both segments 100m with capacity 400.
pub fn line_graph() -> Graph {
    let mut builder = GraphBuilder::new();
    builder.add_node("A", 33.9420, 72.6410, "Gate").unwrap();
    builder.add_node("B", 33.9429, 72.6410, "Crossing").unwrap();
    builder.add_node("C", 33.9438, 72.6410, "Library").unwrap();
    builder
        .add_edge("ab", "A", "B", 100.0, 400.0, EdgeKind::Path)
        .unwrap();
    builder
        .add_edge("bc", "B", "C", 100.0, 400.0, EdgeKind::Path)
        .unwrap();
    builder.build()
}

/// Builds a graph from `(id, source, target, length, capacity)` tuples,
/// creating nodes on first mention.
pub fn graph_of(edges: &[(&str, &str, &str, f64, f64)]) -> Graph {
    let mut builder = GraphBuilder::new();
    for (_, source, target, _, _) in edges {
        for id in [source, target] {
            // Re-adding an existing node is the only expected failure.
            let _ = builder.add_node(*id, 0.0, 0.0, *id);
        }
    }

    for (id, source, target, length, capacity) in edges {
        builder
            .add_edge(*id, source, target, *length, *capacity, EdgeKind::Path)
            .unwrap();
    }

    builder.build()
}

/// Predicts the same flow for every edge and counts its invocations.
#[derive(Debug, Default)]
pub struct ConstantPredictor {
    pub flow: f64,
    pub calls: AtomicUsize,
}

impl ConstantPredictor {
    pub fn new(flow: f64) -> Self {
        ConstantPredictor {
            flow,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FlowPredictor for ConstantPredictor {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, PredictorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.flow; rows.len()])
    }

    fn name(&self) -> &str {
        "constant"
    }
}

/// Predicts from a fixed list, regardless of the rows given.
#[derive(Debug)]
pub struct ScriptedPredictor(pub Vec<f64>);

impl FlowPredictor for ScriptedPredictor {
    fn predict(&self, _: &[FeatureRow]) -> Result<Vec<f64>, PredictorError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[derive(Debug)]
pub struct FailingPredictor;

impl FlowPredictor for FailingPredictor {
    fn predict(&self, _: &[FeatureRow]) -> Result<Vec<f64>, PredictorError> {
        Err(PredictorError::Model("model unavailable".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
