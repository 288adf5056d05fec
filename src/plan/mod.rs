//! Planner: desired file-state graph -> ordered filesystem operations.
//!
//! Pipeline: [`Graph::build`] validates, [`Classification::of`] partitions the
//! nodes, then path and cycle operations are produced independently and
//! concatenated in a fixed section order:
//!
//! 1. removes (isolated nodes, sorted)
//! 2. creates (sorted; link-create when args are present)
//! 3. copies/moves for path nodes, reverse-topological
//! 4. cycle rotations, cycles sorted by length then node sequence
//!
//! The planner is a pure function of its input and never touches the filesystem.
//! Operations must be replayed in order: later ones rely on paths vacated by
//! earlier ones.

mod classify;
mod cycle;
mod emit;
mod graph;
mod path;

pub use classify::Classification;
pub use cycle::{CycleMode, SCRATCH_DEFAULT};
pub use emit::{
    CommandSet, Operation, COPY_DEFAULT, CREATE_DEFAULT, CREATE_WITH_ARGS_DEFAULT,
    EXCHANGE_DEFAULT, MOVE_DEFAULT, REMOVE_DEFAULT,
};
pub use graph::{Edge, Graph, PlanInput, SENTINEL};

use std::path::{Component, Path};

use tracing::debug;

use crate::errors::{FsCodeError, Result};

/// Knobs that change which operations are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    pub cycle_mode: CycleMode,
    /// Emit `#` comments around the cycle section.
    pub annotate: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            cycle_mode: CycleMode::default(),
            annotate: true,
        }
    }
}

/// Result of a planning call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub classification: Classification,
    pub operations: Vec<Operation>,
}

impl Plan {
    /// Render every operation to `[command-words…, operands…]`.
    pub fn to_commands(&self, commands: &CommandSet) -> Vec<Vec<String>> {
        self.operations
            .iter()
            .map(|op| op.to_words(commands))
            .collect()
    }

    /// Operations that actually change the filesystem.
    pub fn effective_len(&self) -> usize {
        self.operations.iter().filter(|op| !op.is_comment()).count()
    }
}

/// Validate `input` and produce the ordered operations.
pub fn plan(input: &PlanInput, options: &PlanOptions) -> Result<Plan> {
    let graph = Graph::build(input)?;
    let classification = Classification::of(&graph);
    debug!(
        nodes = graph.node_count(),
        created = classification.created.len(),
        isolated = classification.isolated.len(),
        self_loop = classification.self_loop.len(),
        cycles = classification.cycles.len(),
        path = classification.path.len(),
        "classified nodes"
    );

    if let CycleMode::Scratch(scratch) = &options.cycle_mode
        && !classification.cycles.is_empty()
        && graph.nodes().any(|node| same_path(node, scratch))
    {
        return Err(FsCodeError::MalformedInput(format!(
            "scratch path '{scratch}' is also part of the plan"
        )));
    }

    let mut operations = emit::removes_and_creates(&graph, &classification);
    let path_ops = path::plan_paths(&graph, &classification.path);
    let cycle_ops = cycle::break_cycles(
        &classification.cycles,
        &options.cycle_mode,
        options.annotate,
    );
    debug!(
        removes_and_creates = operations.len(),
        path = path_ops.len(),
        cycle = cycle_ops.len(),
        "planned operations"
    );
    operations.extend(path_ops);
    operations.extend(cycle_ops);

    Ok(Plan {
        classification,
        operations,
    })
}

/// `./x` and `x` name the same file; so do `x/` and `x`.
fn same_path(a: &str, b: &str) -> bool {
    fn key(path: &str) -> Vec<Component<'_>> {
        Path::new(path)
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }
    key(a) == key(b)
}

/// Convenience wrapper: plan and render in one call.
pub fn plan_commands<I, S>(
    nodes: I,
    edges: Vec<Edge>,
    options: &PlanOptions,
    commands: &CommandSet,
) -> Result<Vec<Vec<String>>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let plan = plan(&PlanInput::new(nodes, edges), options)?;
    Ok(plan.to_commands(commands))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_plans_nothing() {
        let ops = plan_commands(
            Vec::<String>::new(),
            vec![],
            &PlanOptions::default(),
            &CommandSet::default(),
        )
        .unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn scratch_collision_is_rejected() {
        let input = PlanInput::new(
            ["a", "b", "__mv_tmp"],
            vec![Edge::new("a", "b"), Edge::new("b", "a")],
        );
        let err = plan(&input, &PlanOptions::default()).unwrap_err();
        assert!(matches!(err, FsCodeError::MalformedInput(_)));

        let exchange = PlanOptions {
            cycle_mode: CycleMode::Exchange,
            ..PlanOptions::default()
        };
        assert!(plan(&input, &exchange).is_ok());
    }

    #[test]
    fn scratch_collision_ignores_leading_dot_slash() {
        let input = PlanInput::new(
            ["__mv_tmp", "a", "b"],
            vec![Edge::new("a", "b"), Edge::new("b", "a")],
        );
        let dotted = PlanOptions {
            cycle_mode: CycleMode::Scratch("./__mv_tmp".into()),
            ..PlanOptions::default()
        };
        assert!(matches!(
            plan(&input, &dotted).unwrap_err(),
            FsCodeError::MalformedInput(_)
        ));

        let input = PlanInput::new(
            ["./swap/", "a", "b"],
            vec![Edge::new("a", "b"), Edge::new("b", "a")],
        );
        let plain = PlanOptions {
            cycle_mode: CycleMode::Scratch("swap".into()),
            ..PlanOptions::default()
        };
        assert!(plan(&input, &plain).is_err());
        assert!(!same_path("swap", "swap2"));
    }

    #[test]
    fn scratch_name_is_free_without_cycles() {
        let input = PlanInput::new(["__mv_tmp"], vec![]);
        let plan = plan(&input, &PlanOptions::default()).unwrap();
        assert_eq!(
            plan.operations,
            vec![Operation::Remove {
                path: "__mv_tmp".into()
            }]
        );
    }
}
