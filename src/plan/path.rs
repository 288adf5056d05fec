//! Copy/move planning for path (chain and branch) nodes.
//!
//! Destinations are handled in reverse-topological order: a node is only
//! overwritten after every node that inherits from it has taken its copy.
//! A source keeps being copied while it still has other consumers; its last
//! consumer gets a move.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use super::emit::Operation;
use super::graph::Graph;

pub(crate) fn plan_paths(graph: &Graph, path_nodes: &BTreeSet<String>) -> Vec<Operation> {
    let order = reverse_topological_order(graph, path_nodes);
    let mut remaining_out: BTreeMap<&str, usize> = BTreeMap::new();
    let mut ops = Vec::with_capacity(order.len());

    for dest in order {
        let Some(src) = graph.predecessor(dest) else {
            continue;
        };
        // self-edge: content already in place
        if src == dest {
            continue;
        }
        let left = remaining_out
            .entry(src)
            .or_insert_with(|| graph.out_degree(src));
        if *left > 1 {
            *left -= 1;
            ops.push(Operation::Copy {
                from: src.to_owned(),
                to: dest.to_owned(),
            });
        } else {
            ops.push(Operation::Move {
                from: src.to_owned(),
                to: dest.to_owned(),
            });
        }
    }
    ops
}

/// Kahn's algorithm over the reversed induced subgraph, smallest ready node first.
fn reverse_topological_order<'g>(
    graph: &'g Graph,
    nodes: &'g BTreeSet<String>,
) -> Vec<&'g str> {
    // Per node: successors inside `nodes` that still have to be emitted.
    let mut pending: BTreeMap<&'g str, usize> = nodes
        .iter()
        .map(|n| {
            let count = graph
                .successors(n)
                .filter(|s| *s != n.as_str() && nodes.contains(*s))
                .count();
            (n.as_str(), count)
        })
        .collect();
    let mut ready: BTreeSet<&'g str> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(n, _)| *n)
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(node) = ready.pop_first() {
        order.push(node);
        let Some(pred) = graph.predecessor(node) else {
            continue;
        };
        if pred == node {
            continue;
        }
        if let Some(count) = pending.get_mut(pred) {
            *count -= 1;
            if *count == 0 {
                ready.insert(pred);
            }
        }
    }

    if order.len() != nodes.len() {
        warn!(
            expected = nodes.len(),
            ordered = order.len(),
            "path subgraph is not acyclic; some destinations were left out"
        );
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::graph::{Edge, PlanInput};

    fn run(nodes: &[&str], edges: Vec<Edge>) -> Vec<Operation> {
        let graph = Graph::build(&PlanInput::new(nodes.iter().copied(), edges)).unwrap();
        let path: BTreeSet<String> = graph.nodes().map(str::to_owned).collect();
        plan_paths(&graph, &path)
    }

    fn mv(from: &str, to: &str) -> Operation {
        Operation::Move {
            from: from.into(),
            to: to.into(),
        }
    }

    fn cp(from: &str, to: &str) -> Operation {
        Operation::Copy {
            from: from.into(),
            to: to.into(),
        }
    }

    #[test]
    fn chain_moves_from_the_far_end() {
        let ops = run(&["a", "b", "c"], vec![Edge::new("a", "b"), Edge::new("b", "c")]);
        assert_eq!(ops, vec![mv("b", "c"), mv("a", "b")]);
    }

    #[test]
    fn fan_out_copies_then_moves() {
        let ops = run(&["a", "b", "c"], vec![Edge::new("a", "b"), Edge::new("a", "c")]);
        assert_eq!(ops, vec![cp("a", "b"), mv("a", "c")]);
    }

    #[test]
    fn self_edge_source_is_only_copied() {
        let ops = run(&["i"], vec![Edge::new("i", "i"), Edge::new("i", "j")]);
        assert_eq!(ops, vec![cp("i", "j")]);
    }

    #[test]
    fn roots_without_predecessor_are_skipped() {
        let ops = run(&["a", "z"], vec![Edge::new("a", "b")]);
        assert_eq!(ops, vec![mv("a", "b")]);
    }

    #[test]
    fn order_waits_for_all_descendants() {
        // a -> b, b -> c, b -> d: b is copied to c, moved to d, then overwritten from a
        let ops = run(
            &["a", "b"],
            vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("b", "d")],
        );
        assert_eq!(ops, vec![cp("b", "c"), mv("b", "d"), mv("a", "b")]);
    }
}
