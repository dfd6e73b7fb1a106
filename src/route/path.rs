use rustc_hash::FxHashSet;

use crate::graph::{EdgeIx, Graph, Node, NodeIx};
use crate::route::EdgeCost;

/// A walk through the graph: `nodes[i]` and `nodes[i + 1]` are joined by
/// `edges[i]`, and `cost` is the total under the cost function that
/// produced the path.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeIx>,
    pub edges: Vec<EdgeIx>,
    pub cost: f64,
}

impl Path {
    /// The zero-length path that starts and ends at `node`.
    pub fn trivial(node: NodeIx) -> Self {
        Path {
            nodes: vec![node],
            edges: vec![],
            cost: 0.0,
        }
    }

    /// Builds a path from its hops, summing `cost` from source to target.
    pub(crate) fn from_hops<C>(graph: &Graph, cost: &C, nodes: Vec<NodeIx>, edges: Vec<EdgeIx>) -> Self
    where
        C: EdgeCost + ?Sized,
    {
        debug_assert_eq!(nodes.len(), edges.len() + 1);

        let total = nodes
            .windows(2)
            .zip(edges.iter())
            .filter_map(|(pair, index)| {
                graph
                    .edge(*index)
                    .map(|edge| cost.cost(pair[0], pair[1], *index, edge))
            })
            .fold(0.0, |acc, step| acc + step);

        Path {
            nodes,
            edges,
            cost: total,
        }
    }

    #[inline]
    pub fn source(&self) -> NodeIx {
        self.nodes[0]
    }

    #[inline]
    pub fn target(&self) -> NodeIx {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// `true` when no node is visited twice.
    pub fn is_simple(&self) -> bool {
        let mut seen = FxHashSet::default();
        self.nodes.iter().all(|node| seen.insert(*node))
    }

    /// Physical length in metres, whatever cost function produced the path.
    pub fn length_m(&self, graph: &Graph) -> f64 {
        self.edges
            .iter()
            .filter_map(|index| graph.edge(*index))
            .fold(0.0, |acc, edge| acc + edge.length_m)
    }

    pub fn resolve<'a>(&self, graph: &'a Graph) -> Vec<&'a Node> {
        self.nodes
            .iter()
            .filter_map(|index| graph.node(*index))
            .collect()
    }

    pub fn node_ids(&self, graph: &Graph) -> Vec<String> {
        self.resolve(graph)
            .into_iter()
            .map(|node| node.id.clone())
            .collect()
    }
}
