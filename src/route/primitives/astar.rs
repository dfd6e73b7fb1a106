use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::BuildHasherDefault;

use indexmap::map::Entry;
use indexmap::IndexMap;
use log::debug;
use rustc_hash::{FxHashSet, FxHasher};

use crate::graph::{EdgeIx, Graph, NodeIx};
use crate::route::{EdgeCost, Path, RouteError};

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

#[derive(Debug)]
struct SmallestHolder {
    estimate: f64,
    cost: f64,
    index: usize,
}

impl PartialEq for SmallestHolder {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SmallestHolder {}

impl PartialOrd for SmallestHolder {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestHolder {
    /// Reversed so the max-heap pops the smallest estimate first.
    /// Equal estimates pop in discovery order.
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Nodes and moves a search may not use.
#[derive(Debug, Default)]
pub(crate) struct Restrictions {
    pub nodes: FxHashSet<NodeIx>,
    pub moves: FxHashSet<(NodeIx, NodeIx)>,
}

impl Restrictions {
    #[inline]
    fn allows(&self, from: NodeIx, to: NodeIx) -> bool {
        !self.nodes.contains(&to) && !self.moves.contains(&(from, to))
    }
}

struct Visit {
    parent: usize,
    edge: Option<EdgeIx>,
    cost: f64,
}

/// Best-first search from `source` to `target` under `cost`, guided by
/// `heuristic`. The heuristic must never overestimate the remaining cost.
///
/// Returns the cheapest path avoiding everything in `restrictions`, or
/// `None` when the target cannot be reached. Parallel edges collapse into
/// a single move over the cheapest of them.
pub(crate) fn astar<C, H>(
    graph: &Graph,
    source: NodeIx,
    target: NodeIx,
    cost: &C,
    heuristic: H,
    restrictions: &Restrictions,
) -> Option<Path>
where
    C: EdgeCost + ?Sized,
    H: Fn(NodeIx) -> f64,
{
    if source == target {
        return Some(Path::trivial(source));
    }

    let mut to_see = BinaryHeap::new();
    let mut closed = FxHashSet::default();
    let mut parents: FxIndexMap<NodeIx, Visit> = FxIndexMap::default();

    parents.insert(
        source,
        Visit {
            parent: usize::MAX,
            edge: None,
            cost: 0.0,
        },
    );
    to_see.push(SmallestHolder {
        estimate: heuristic(source),
        cost: 0.0,
        index: 0,
    });

    while let Some(SmallestHolder { cost: so_far, index, .. }) = to_see.pop() {
        if !closed.insert(index) {
            continue;
        }

        let Some((&node, _)) = parents.get_index(index) else {
            continue;
        };

        if node == target {
            return Some(reverse_path(&parents, index));
        }

        for (next, edge_index, edge) in graph.neighbours(node) {
            if next == node || !restrictions.allows(node, next) {
                continue;
            }

            let step = cost.cost(node, next, edge_index, edge);
            let new_cost = so_far + step;

            let next_index = match parents.entry(next) {
                Entry::Vacant(e) => {
                    let n = e.index();
                    e.insert(Visit {
                        parent: index,
                        edge: Some(edge_index),
                        cost: new_cost,
                    });
                    n
                }
                Entry::Occupied(mut e) => {
                    if new_cost < e.get().cost && !closed.contains(&e.index()) {
                        e.insert(Visit {
                            parent: index,
                            edge: Some(edge_index),
                            cost: new_cost,
                        });
                        e.index()
                    } else {
                        continue;
                    }
                }
            };

            to_see.push(SmallestHolder {
                estimate: new_cost + heuristic(next),
                cost: new_cost,
                index: next_index,
            });
        }
    }

    None
}

fn reverse_path(parents: &FxIndexMap<NodeIx, Visit>, mut index: usize) -> Path {
    let mut nodes = vec![];
    let mut edges = vec![];
    let total = parents.get_index(index).map_or(0.0, |(_, visit)| visit.cost);

    while let Some((node, visit)) = parents.get_index(index) {
        nodes.push(*node);
        if let Some(edge) = visit.edge {
            edges.push(edge);
        }
        index = visit.parent;
    }

    nodes.reverse();
    edges.reverse();

    Path {
        nodes,
        edges,
        cost: total,
    }
}

/// Resolves both route endpoints, source first.
pub(crate) fn endpoints(graph: &Graph, source: &str, target: &str) -> Result<(NodeIx, NodeIx), RouteError> {
    let src = graph
        .node_index(source)
        .ok_or_else(|| RouteError::InvalidEndpoint(source.to_string()))?;
    let tgt = graph
        .node_index(target)
        .ok_or_else(|| RouteError::InvalidEndpoint(target.to_string()))?;

    Ok((src, tgt))
}

/// Cheapest path between two node ids under `cost`.
///
/// Runs A* with a zero heuristic, so every node closer than the target
/// is expanded. A route from a node to itself is the single-node path.
///
/// ```
/// use footfall::graph::{EdgeKind, GraphBuilder};
/// use footfall::route::{find_path, DistanceCost};
///
/// let mut builder = GraphBuilder::new();
/// builder.add_node("a", 0.0, 0.0, "").unwrap();
/// builder.add_node("b", 0.0, 0.001, "").unwrap();
/// builder.add_edge("ab", "a", "b", 50.0, 400.0, EdgeKind::Path).unwrap();
/// let graph = builder.build();
///
/// let path = find_path(&graph, "a", "b", &DistanceCost).unwrap();
/// assert_eq!(path.node_ids(&graph), ["a", "b"]);
/// assert_eq!(path.cost, 50.0);
/// ```
#[cfg_attr(feature = "tracing", tracing::instrument(skip(graph, cost)))]
pub fn find_path<C>(graph: &Graph, source: &str, target: &str, cost: &C) -> Result<Path, RouteError>
where
    C: EdgeCost + ?Sized,
{
    let (src, tgt) = endpoints(graph, source, target)?;

    astar(graph, src, tgt, cost, |_| 0.0, &Restrictions::default()).ok_or_else(|| {
        debug!("No path between {source} and {target}");
        RouteError::NoPath {
            source: source.to_string(),
            target: target.to_string(),
        }
    })
}
