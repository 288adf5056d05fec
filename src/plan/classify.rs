//! Node classification.
//!
//! Every non-sentinel node lands in exactly one bucket:
//! created, isolated, self-loop, cyclic or path. Buckets are sorted so that the
//! operations derived from them come out in the same order on every run.

use std::collections::{BTreeMap, BTreeSet};

use super::graph::{Graph, SENTINEL};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Direct successors of the sentinel.
    pub created: BTreeSet<String>,
    /// Nodes without any incident edge; their paths get removed.
    pub isolated: BTreeSet<String>,
    /// Nodes whose only edge points back at themselves; nothing to do.
    pub self_loop: BTreeSet<String>,
    /// Simple cycles (length >= 2) in edge direction, each starting at its
    /// smallest node, ordered by length and then node sequence.
    pub cycles: Vec<Vec<String>>,
    /// Everything else: chains and branches, possibly hanging off a cycle.
    pub path: BTreeSet<String>,
}

impl Classification {
    pub fn of(graph: &Graph) -> Self {
        let created: BTreeSet<String> = graph.successors(SENTINEL).map(str::to_owned).collect();

        let mut isolated = BTreeSet::new();
        let mut self_loop = BTreeSet::new();
        let mut remaining: BTreeSet<&str> = BTreeSet::new();
        for node in graph.nodes() {
            if created.contains(node) {
                continue;
            }
            let (in_degree, out_degree) = (graph.in_degree(node), graph.out_degree(node));
            if in_degree == 0 && out_degree == 0 {
                isolated.insert(node.to_owned());
            } else if in_degree == 1 && out_degree == 1 && graph.has_self_loop(node) {
                self_loop.insert(node.to_owned());
            } else {
                remaining.insert(node);
            }
        }

        let cycles = find_cycles(graph, &remaining);
        let on_cycle: BTreeSet<&str> = cycles.iter().flatten().map(String::as_str).collect();
        let path = remaining
            .into_iter()
            .filter(|n| !on_cycle.contains(n))
            .map(str::to_owned)
            .collect();

        Self {
            created,
            isolated,
            self_loop,
            cycles,
            path,
        }
    }

    /// All nodes that sit on some cycle.
    pub fn cyclic(&self) -> impl Iterator<Item = &str> {
        self.cycles.iter().flatten().map(String::as_str)
    }

    /// Total number of classified nodes (each counted once).
    pub fn len(&self) -> usize {
        self.created.len()
            + self.isolated.len()
            + self.self_loop.len()
            + self.cycles.iter().map(Vec::len).sum::<usize>()
            + self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Find simple cycles among `candidates`.
///
/// With in-degree <= 1 every node has at most one predecessor, so walking
/// predecessors from any node either leaves the candidate set, reaches a node
/// already explained by an earlier walk, or closes exactly one cycle. Each node
/// is visited once. Length-1 cycles (self-edges) are ignored.
fn find_cycles(graph: &Graph, candidates: &BTreeSet<&str>) -> Vec<Vec<String>> {
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut cycles = Vec::new();

    for &start in candidates {
        if visited.contains(start) {
            continue;
        }
        // trail[i + 1] is the predecessor of trail[i]
        let mut trail: Vec<&str> = Vec::new();
        let mut on_trail: BTreeMap<&str, usize> = BTreeMap::new();
        let mut current = Some(start);
        while let Some(node) = current {
            if let Some(&pos) = on_trail.get(node) {
                if trail.len() - pos >= 2 {
                    let mut cycle: Vec<String> =
                        trail[pos..].iter().rev().map(|n| (*n).to_owned()).collect();
                    canonicalize(&mut cycle);
                    cycles.push(cycle);
                }
                break;
            }
            if visited.contains(node) || !candidates.contains(node) {
                break;
            }
            visited.insert(node);
            on_trail.insert(node, trail.len());
            trail.push(node);
            current = graph.predecessor(node);
        }
    }

    cycles.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    cycles
}

/// Rotate so the smallest node comes first; edge direction is preserved.
fn canonicalize(cycle: &mut [String]) {
    if let Some((min_idx, _)) = cycle.iter().enumerate().min_by(|a, b| a.1.cmp(b.1)) {
        cycle.rotate_left(min_idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::graph::{Edge, PlanInput};

    fn classify(nodes: &[&str], edges: Vec<Edge>) -> Classification {
        let graph = Graph::build(&PlanInput::new(nodes.iter().copied(), edges)).unwrap();
        Classification::of(&graph)
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn mixed_graph_is_partitioned() {
        let c = classify(
            &["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "x", "y"],
            vec![
                Edge::new("a", "b"),
                Edge::new("b", "c"),
                Edge::new("c", "a"),
                Edge::new("c", "d"),
                Edge::new("d", "d1"),
                Edge::new("d", "e"),
                Edge::new("f", "g"),
                Edge::new("g", "f"),
                Edge::new("f", "h"),
                Edge::new("i", "i"),
                Edge::link("x", ["xxx"]),
                Edge::create("y"),
            ],
        );
        assert_eq!(c.created, set(&["x", "y"]));
        assert_eq!(c.isolated, set(&["j"]));
        assert_eq!(c.self_loop, set(&["i"]));
        assert_eq!(
            c.cycles,
            vec![vec!["f".to_string(), "g".into()], vec!["a".into(), "b".into(), "c".into()]]
        );
        assert_eq!(c.path, set(&["d", "d1", "e", "h"]));
        assert_eq!(c.len(), 13);
    }

    #[test]
    fn cycle_follows_edge_direction_from_smallest_node() {
        let c = classify(
            &["m", "k", "z"],
            vec![Edge::new("z", "k"), Edge::new("k", "m"), Edge::new("m", "z")],
        );
        assert_eq!(c.cycles, vec![vec!["k".to_string(), "m".into(), "z".into()]]);
        assert!(c.path.is_empty());
    }

    #[test]
    fn equal_length_cycles_sort_by_sequence() {
        let c = classify(
            &["p", "q", "a", "b"],
            vec![
                Edge::new("p", "q"),
                Edge::new("q", "p"),
                Edge::new("b", "a"),
                Edge::new("a", "b"),
            ],
        );
        assert_eq!(c.cycles[0], vec!["a".to_string(), "b".into()]);
        assert_eq!(c.cycles[1], vec!["p".to_string(), "q".into()]);
    }

    #[test]
    fn self_edge_with_fan_out_is_a_path_node() {
        let c = classify(&["i"], vec![Edge::new("i", "i"), Edge::new("i", "j")]);
        assert!(c.self_loop.is_empty());
        assert!(c.cycles.is_empty());
        assert_eq!(c.path, set(&["i", "j"]));
    }

    #[test]
    fn branch_out_of_cycle_is_a_path_node() {
        let c = classify(
            &["a", "b", "t"],
            vec![Edge::new("a", "b"), Edge::new("b", "a"), Edge::new("b", "t")],
        );
        assert_eq!(c.cycles, vec![vec!["a".to_string(), "b".into()]]);
        assert_eq!(c.path, set(&["t"]));
        assert_eq!(c.cyclic().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn empty_graph_has_empty_classification() {
        let c = classify(&[], vec![]);
        assert!(c.is_empty());
    }
}
