use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;
use rustc_hash::FxHashSet;

use crate::graph::{Graph, NodeIx};
use crate::route::primitives::astar::{astar, endpoints, Restrictions};
use crate::route::{Deadline, EdgeCost, Path, RouteError};

/// A spur path waiting to be accepted, ordered cheapest first and then by
/// the order in which it was found.
struct Candidate {
    path: Path,
    sequence: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .path
            .cost
            .total_cmp(&self.path.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Up to `k` loopless paths from `source` to `target`, cheapest first.
///
/// Yen's algorithm over [`find_path`](crate::route::find_path): every
/// accepted path is deviated at each of its nodes, with the prefix up to
/// the deviation fixed and the moves already taken from that prefix
/// forbidden. Paths are distinct by node sequence and come out in
/// non-decreasing cost, equal costs in the order they were found.
///
/// Fewer than `k` paths are returned when the graph has no more. The
/// deadline is checked before each deviation search.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(graph, cost, deadline)))]
pub fn k_shortest_simple_paths<C>(
    graph: &Graph,
    source: &str,
    target: &str,
    cost: &C,
    k: usize,
    deadline: &Deadline,
) -> Result<Vec<Path>, RouteError>
where
    C: EdgeCost + ?Sized,
{
    let (src, tgt) = endpoints(graph, source, target)?;

    if k == 0 {
        return Ok(vec![]);
    }

    deadline.check()?;

    let first = astar(graph, src, tgt, cost, |_| 0.0, &Restrictions::default()).ok_or_else(|| {
        RouteError::NoPath {
            source: source.to_string(),
            target: target.to_string(),
        }
    })?;

    if first.is_trivial() {
        return Ok(vec![first]);
    }

    let mut seen: FxHashSet<Vec<NodeIx>> = FxHashSet::default();
    seen.insert(first.nodes.clone());

    let mut accepted = vec![first];
    let mut candidates = BinaryHeap::new();
    let mut sequence = 0usize;

    while accepted.len() < k {
        let Some(last) = accepted.last() else {
            break;
        };
        let last = last.clone();

        for i in 0..last.nodes.len() - 1 {
            deadline.check()?;

            let spur = last.nodes[i];
            let root = &last.nodes[..=i];

            let mut restrictions = Restrictions::default();
            restrictions.nodes.extend(root[..i].iter().copied());
            for path in &accepted {
                if path.nodes.len() > i + 1 && path.nodes[..=i] == *root {
                    restrictions.moves.insert((spur, path.nodes[i + 1]));
                }
            }

            let Some(spur_path) = astar(graph, spur, tgt, cost, |_| 0.0, &restrictions) else {
                continue;
            };

            let mut nodes = root[..i].to_vec();
            nodes.extend_from_slice(&spur_path.nodes);

            if !seen.insert(nodes.clone()) {
                continue;
            }

            let mut edges = last.edges[..i].to_vec();
            edges.extend_from_slice(&spur_path.edges);

            candidates.push(Candidate {
                path: Path::from_hops(graph, cost, nodes, edges),
                sequence,
            });
            sequence += 1;
        }

        match candidates.pop() {
            Some(Candidate { path, .. }) => accepted.push(path),
            None => break,
        }
    }

    debug!(
        "Found {} of {k} paths from {source} to {target} ({} candidates left)",
        accepted.len(),
        candidates.len()
    );

    Ok(accepted)
}
