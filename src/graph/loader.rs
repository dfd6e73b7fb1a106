//! Reads the network produced by the offline preparation step.
//!
//! Two CSV files are expected:
//!
//! ```text
//! nodes.csv  id,lat,lon,label
//! edges.csv  id,source,target,length_m,capacity,kind
//! ```
//!
//! `label`, `length_m`, `capacity` and `kind` may be left blank,
//! see [`GraphBuilder::add_edge_with`] for how blanks are filled.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::graph::{EdgeAttributes, EdgeKind, Graph, GraphBuilder, GraphError};

#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    id: String,
    source: String,
    target: String,
    #[serde(default)]
    length_m: Option<f64>,
    #[serde(default)]
    capacity: Option<f64>,
    #[serde(default)]
    kind: Option<EdgeKind>,
}

impl Graph {
    /// Loads the graph from a node file and an edge file.
    pub fn from_csv(
        nodes: impl AsRef<Path>,
        edges: impl AsRef<Path>,
    ) -> Result<Graph, GraphError> {
        let nodes = nodes.as_ref();
        let edges = edges.as_ref();
        debug!("Loading graph from {nodes:?} and {edges:?}");

        Graph::from_readers(File::open(nodes)?, File::open(edges)?)
    }

    /// Loads the graph from any pair of CSV sources with headers.
    pub fn from_readers<N: Read, E: Read>(nodes: N, edges: E) -> Result<Graph, GraphError> {
        let start_time = Instant::now();
        let mut builder = GraphBuilder::new();

        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(nodes);
        for record in reader.deserialize::<NodeRecord>() {
            let record = record?;
            builder.add_node(
                record.id,
                record.lat,
                record.lon,
                record.label.unwrap_or_default(),
            )?;
        }

        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(edges);
        for record in reader.deserialize::<EdgeRecord>() {
            let record = record?;
            if record.source == record.target {
                warn!("Edge {} is a self-loop on {}", record.id, record.source);
            }

            builder.add_edge_with(
                record.id,
                &record.source,
                &record.target,
                EdgeAttributes {
                    length_m: record.length_m,
                    capacity: record.capacity,
                    kind: record.kind,
                },
            )?;
        }

        let graph = builder.build();
        info!(
            "Loaded {} nodes and {} edges in {}ms",
            graph.size(),
            graph.edge_count(),
            start_time.elapsed().as_millis()
        );

        Ok(graph)
    }
}
