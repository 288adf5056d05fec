//! Cycle breaking.
//!
//! A cycle `n0 -> n1 -> … -> n(k-1) -> n0` is a rotation of contents, so no
//! plain move can go first without clobbering something. Two strategies:
//!
//! - scratch: park `n(k-1)` in a scratch path, shift the rest backwards, then
//!   restore the parked content into `n0` (k+1 moves);
//! - exchange: one backward bubble pass of atomic swaps (k-1 exchanges).

use super::emit::Operation;

/// Default scratch path used by [`CycleMode::Scratch`].
pub const SCRATCH_DEFAULT: &str = "__mv_tmp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleMode {
    /// Rotate through a scratch path with plain moves.
    ///
    /// The same scratch path is reused by every cycle in order. Replaying the
    /// resulting operations is only safe when a single script runs at a time;
    /// two scripts sharing one scratch path may overwrite each other's parked file.
    Scratch(String),
    /// Rotate with atomic two-path exchanges. The executing platform must
    /// support exchanging both paths (same filesystem, e.g. `renameat2`).
    Exchange,
}

impl Default for CycleMode {
    fn default() -> Self {
        CycleMode::Scratch(SCRATCH_DEFAULT.to_string())
    }
}

pub(crate) fn break_cycles(
    cycles: &[Vec<String>],
    mode: &CycleMode,
    annotate: bool,
) -> Vec<Operation> {
    if cycles.is_empty() {
        return Vec::new();
    }

    let mut ops = Vec::new();
    if annotate {
        ops.push(comment(["Start processing cycles".to_string()]));
    }
    for (idx, cycle) in cycles.iter().enumerate() {
        if annotate {
            let header = format!("Processing cycle {}:", idx + 1);
            ops.push(comment(std::iter::once(header).chain(cycle.iter().cloned())));
        }
        match mode {
            CycleMode::Scratch(scratch) => rotate_via_scratch(cycle, scratch, &mut ops),
            CycleMode::Exchange => rotate_via_exchange(cycle, &mut ops),
        }
    }
    if annotate {
        ops.push(comment([format!("Total of {} cycles", cycles.len())]));
    }
    ops
}

fn comment(words: impl IntoIterator<Item = String>) -> Operation {
    Operation::Comment(words.into_iter().collect())
}

fn rotate_via_scratch(cycle: &[String], scratch: &str, ops: &mut Vec<Operation>) {
    let Some(last) = cycle.last() else {
        return;
    };
    ops.push(Operation::Move {
        from: last.clone(),
        to: scratch.to_string(),
    });
    for pair in cycle.windows(2).rev() {
        ops.push(Operation::Move {
            from: pair[0].clone(),
            to: pair[1].clone(),
        });
    }
    ops.push(Operation::Move {
        from: scratch.to_string(),
        to: cycle[0].clone(),
    });
}

fn rotate_via_exchange(cycle: &[String], ops: &mut Vec<Operation>) {
    for pair in cycle.windows(2).rev() {
        ops.push(Operation::Exchange {
            a: pair[0].clone(),
            b: pair[1].clone(),
        });
    }
}
