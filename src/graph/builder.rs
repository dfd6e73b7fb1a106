use geo::{Distance, Haversine};
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::{Edge, EdgeIx, EdgeKind, Graph, GraphError, GraphStructure, Node, NodeIx};

/// Attributes of an edge as they arrive from the source data.
/// Blank attributes are derived when the edge is added.
#[derive(Debug, Clone, Default)]
pub struct EdgeAttributes {
    pub length_m: Option<f64>,
    pub capacity: Option<f64>,
    pub kind: Option<EdgeKind>,
}

/// Construct a [`Graph`] incrementally, then call [`build`](Self::build).
///
/// Nodes must be added before the edges that reference them.
///
/// ```
/// use footfall::graph::{EdgeKind, GraphBuilder};
///
/// let mut builder = GraphBuilder::new();
/// builder.add_node("A", 33.0, 72.0, "Library").unwrap();
/// builder.add_node("B", 33.001, 72.0, "Hall").unwrap();
/// builder.add_edge("e1", "A", "B", 111.0, 400.0, EdgeKind::Path).unwrap();
///
/// let graph = builder.build();
/// assert_eq!(graph.size(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    graph: GraphStructure,
    hash: FxHashMap<String, NodeIx>,
    edge_ids: FxHashSet<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: GraphStructure::with_capacity(nodes, edges),
            hash: FxHashMap::default(),
            edge_ids: FxHashSet::default(),
        }
    }

    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        lat: f64,
        lon: f64,
        label: impl Into<String>,
    ) -> Result<NodeIx, GraphError> {
        let node = Node::new(id, lat, lon, label);

        if !(lat.is_finite() && lon.is_finite()) {
            return Err(GraphError::InvalidAttribute {
                id: node.id,
                reason: format!("coordinate ({lat}, {lon}) is not finite"),
            });
        }

        if self.hash.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }

        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.hash.insert(id, index);

        Ok(index)
    }

    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        source: &str,
        target: &str,
        length_m: f64,
        capacity: f64,
        kind: EdgeKind,
    ) -> Result<EdgeIx, GraphError> {
        self.add_edge_with(
            id,
            source,
            target,
            EdgeAttributes {
                length_m: Some(length_m),
                capacity: Some(capacity),
                kind: Some(kind),
            },
        )
    }

    /// Adds an edge, deriving blank attributes: the kind defaults to
    /// [`EdgeKind::Path`], the capacity to the kind's default and the
    /// length to the great-circle distance between the endpoints.
    pub fn add_edge_with(
        &mut self,
        id: impl Into<String>,
        source: &str,
        target: &str,
        attributes: EdgeAttributes,
    ) -> Result<EdgeIx, GraphError> {
        let id = id.into();

        if self.edge_ids.contains(&id) {
            return Err(GraphError::DuplicateEdge(id));
        }

        let (a, b) = match (self.hash.get(source), self.hash.get(target)) {
            (Some(a), Some(b)) => (*a, *b),
            (None, _) => {
                return Err(GraphError::UnknownNode {
                    edge: id,
                    node: source.to_string(),
                })
            }
            (_, None) => {
                return Err(GraphError::UnknownNode {
                    edge: id,
                    node: target.to_string(),
                })
            }
        };

        let kind = attributes.kind.unwrap_or_default();
        let capacity = attributes.capacity.unwrap_or(kind.default_capacity());
        let length_m = match attributes.length_m {
            Some(length) => length,
            None => {
                let length = Haversine.distance(self.graph[a].position, self.graph[b].position);
                debug!("Derived length {length:.1}m for edge {id}");
                length
            }
        };

        if !(length_m.is_finite() && length_m >= 0.0) {
            return Err(GraphError::InvalidAttribute {
                id,
                reason: format!("length_m must be a non-negative number, got {length_m}"),
            });
        }

        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(GraphError::InvalidAttribute {
                id,
                reason: format!("capacity must be positive, got {capacity}"),
            });
        }

        self.edge_ids.insert(id.clone());
        Ok(self.graph.add_edge(
            a,
            b,
            Edge {
                id,
                length_m,
                capacity,
                kind,
            },
        ))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn build(self) -> Graph {
        Graph {
            graph: self.graph,
            hash: self.hash,
        }
    }
}
