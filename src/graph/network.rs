use std::fmt::{Debug, Formatter};

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::graph::{Edge, Node};

pub type NodeIx = NodeIndex<u32>;
pub type EdgeIx = EdgeIndex<u32>;

pub type GraphStructure = UnGraph<Node, Edge>;

/// Routing graph over the pedestrian network.
///
/// Built once through [`GraphBuilder`](crate::graph::GraphBuilder) or
/// [`Graph::from_csv`], then shared read-only for the life of the process.
/// Parallel edges between the same pair of nodes are kept with their
/// own attributes.
pub struct Graph {
    pub(crate) graph: GraphStructure,
    pub(crate) hash: FxHashMap<String, NodeIx>,
}

/// Shape of the loaded network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub connected: bool,
}

impl Debug for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Graph with Nodes: {}, Edges: {}",
            self.graph.node_count(),
            self.graph.edge_count()
        )
    }
}

impl Graph {
    pub fn size(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[inline]
    pub fn node_index(&self, id: &str) -> Option<NodeIx> {
        self.hash.get(id).copied()
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.hash.contains_key(id)
    }

    #[inline]
    pub fn node(&self, index: NodeIx) -> Option<&Node> {
        self.graph.node_weight(index)
    }

    #[inline]
    pub fn edge(&self, index: EdgeIx) -> Option<&Edge> {
        self.graph.edge_weight(index)
    }

    #[inline]
    pub fn endpoints(&self, index: EdgeIx) -> Option<(NodeIx, NodeIx)> {
        self.graph.edge_endpoints(index)
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIx, &Node)> {
        self.graph
            .node_indices()
            .filter_map(|ix| self.graph.node_weight(ix).map(|node| (ix, node)))
    }

    /// All edges as `(index, source, target, edge)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeIx, NodeIx, NodeIx, &Edge)> {
        self.graph
            .edge_references()
            .map(|e| (e.id(), e.source(), e.target(), e.weight()))
    }

    /// Edges incident to `node`, as `(neighbour, edge index, edge)`.
    /// A self-loop yields `node` as its own neighbour.
    #[inline]
    pub fn neighbours(&self, node: NodeIx) -> impl Iterator<Item = (NodeIx, EdgeIx, &Edge)> {
        self.graph.edges(node).map(move |e| {
            let other = if e.source() == node {
                e.target()
            } else {
                e.source()
            };

            (other, e.id(), e.weight())
        })
    }

    pub fn summary(&self) -> GraphSummary {
        let nodes = self.graph.node_count();
        GraphSummary {
            nodes,
            edges: self.graph.edge_count(),
            connected: nodes > 0 && petgraph::algo::connected_components(&self.graph) == 1,
        }
    }
}
