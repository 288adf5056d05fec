//! Desired file-state graph.
//! - Nodes are paths; an edge `a -> b` means "what lives at `a` ends up at `b`".
//! - The empty path is the sentinel: an edge from it creates its destination.
//!
//! Validation happens once in [`Graph::build`]; every query afterwards may rely on
//! in-degree <= 1 for real nodes and in-degree 0 for the sentinel.

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{FsCodeError, Result};

/// Reserved node meaning "no prior source".
pub const SENTINEL: &str = "";

/// One desired transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub destination: String,
    /// Extra words for a link-style create. Only valid when `source` is the sentinel.
    pub args: Option<Vec<String>>,
}

impl Edge {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            args: None,
        }
    }

    /// Create `destination` from nothing (empty file).
    pub fn create(destination: impl Into<String>) -> Self {
        Self::new(SENTINEL, destination)
    }

    /// Create `destination` as a link; `args` are placed before it on the command line.
    pub fn link<I, S>(destination: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        Self {
            args: (!args.is_empty()).then_some(args),
            ..Self::create(destination)
        }
    }

    #[inline]
    pub fn is_creation(&self) -> bool {
        self.source == SENTINEL
    }
}

/// Raw planner input: declared nodes plus edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanInput {
    pub nodes: Vec<String>,
    pub edges: Vec<Edge>,
}

impl PlanInput {
    pub fn new<I, S>(nodes: I, edges: Vec<Edge>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            edges,
        }
    }
}

/// Validated directed graph with sorted adjacency in both directions.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: BTreeSet<String>,
    outgoing: BTreeMap<String, BTreeSet<String>>,
    incoming: BTreeMap<String, BTreeSet<String>>,
    create_args: BTreeMap<String, Vec<String>>,
}

impl Graph {
    /// Build and validate a graph.
    ///
    /// Edge destinations that were not declared become nodes (a renamed path is a
    /// new node). Sources must be declared nodes or the sentinel: an undeclared
    /// destination does not exist yet, so nothing can be taken from it.
    /// Identical edges collapse; the same pair with different `args` is rejected.
    pub fn build(input: &PlanInput) -> Result<Self> {
        let mut graph = Graph::default();
        graph.nodes.insert(SENTINEL.to_string());
        graph.nodes.extend(input.nodes.iter().cloned());

        let mut seen: BTreeMap<(&str, &str), Option<&[String]>> = BTreeMap::new();
        // Reported after the degree checks so a bad in-degree is named first.
        let mut unknown_source = None;
        for edge in &input.edges {
            let (src, dst) = (edge.source.as_str(), edge.destination.as_str());
            if unknown_source.is_none() && !graph.nodes.contains(src) {
                unknown_source = Some((src, dst));
            }
            let args = edge.args.as_deref().filter(|a| !a.is_empty());
            if args.is_some() && !edge.is_creation() {
                return Err(FsCodeError::MalformedInput(format!(
                    "edge '{src}' -> '{dst}' carries args but does not create its destination"
                )));
            }
            match seen.get(&(src, dst)) {
                Some(prev) if *prev != args => {
                    return Err(FsCodeError::MalformedInput(format!(
                        "edge '{src}' -> '{dst}' given twice with different args"
                    )));
                }
                Some(_) => continue,
                None => {
                    seen.insert((src, dst), args);
                }
            }

            graph
                .outgoing
                .entry(src.to_string())
                .or_default()
                .insert(dst.to_string());
            graph
                .incoming
                .entry(dst.to_string())
                .or_default()
                .insert(src.to_string());
            if let Some(args) = args {
                graph.create_args.insert(dst.to_string(), args.to_vec());
            }
        }

        graph
            .nodes
            .extend(input.edges.iter().map(|e| e.destination.clone()));
        graph.check_in_degrees()?;
        if let Some((src, dst)) = unknown_source {
            return Err(FsCodeError::MalformedInput(format!(
                "edge '{src}' -> '{dst}' starts at a path that is not in the input"
            )));
        }
        graph.check_created_are_leaves()?;
        Ok(graph)
    }

    fn check_in_degrees(&self) -> Result<()> {
        for node in &self.nodes {
            let limit = if node == SENTINEL { 0 } else { 1 };
            let in_degree = self.in_degree(node);
            if in_degree > limit {
                return Err(FsCodeError::Validation {
                    node: node.clone(),
                    in_degree,
                });
            }
        }
        Ok(())
    }

    // A created path has no prior content, so nothing can be taken from it.
    fn check_created_are_leaves(&self) -> Result<()> {
        for created in self.successors(SENTINEL) {
            if let Some(dst) = self.successors(created).next() {
                return Err(FsCodeError::MalformedInput(format!(
                    "'{created}' is created from nothing but also feeds '{dst}'"
                )));
            }
        }
        Ok(())
    }

    /// All non-sentinel nodes, sorted.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .map(String::as_str)
            .filter(|n| *n != SENTINEL)
    }

    /// Number of non-sentinel nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn contains(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    pub fn successors<'g>(&'g self, node: &str) -> impl Iterator<Item = &'g str> + use<'g> {
        self.outgoing
            .get(node)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// The unique predecessor of `node`, read from the incoming adjacency.
    pub fn predecessor(&self, node: &str) -> Option<&str> {
        self.incoming
            .get(node)
            .and_then(|preds| preds.iter().next())
            .map(String::as_str)
    }

    pub fn in_degree(&self, node: &str) -> usize {
        self.incoming.get(node).map_or(0, BTreeSet::len)
    }

    pub fn out_degree(&self, node: &str) -> usize {
        self.outgoing.get(node).map_or(0, BTreeSet::len)
    }

    pub fn has_self_loop(&self, node: &str) -> bool {
        self.outgoing
            .get(node)
            .is_some_and(|succ| succ.contains(node))
    }

    /// Link arguments attached to the creation of `node`, if any.
    pub fn create_args(&self, node: &str) -> Option<&[String]> {
        self.create_args.get(node).map(Vec::as_slice)
    }
}
