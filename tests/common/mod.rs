//! In-memory replay of planned operations, used to check plans end-to-end.
#![allow(dead_code)]

use std::collections::BTreeMap;

use fscode::{Edge, Operation, SENTINEL};

/// Path -> content.
pub type MemFs = BTreeMap<String, String>;

/// Every declared node exists and holds its own name.
pub fn initial_fs(nodes: &[String]) -> MemFs {
    nodes.iter().map(|n| (n.clone(), format!("data:{n}"))).collect()
}

/// What the filesystem should look like once the edges are applied.
pub fn expected_fs(nodes: &[String], edges: &[Edge]) -> MemFs {
    let initial = initial_fs(nodes);
    let mut out = MemFs::new();
    for edge in edges {
        let content = if edge.source == SENTINEL {
            match &edge.args {
                Some(args) => format!("link:{}", args.join(" ")),
                None => "empty".to_string(),
            }
        } else {
            initial[&edge.source].clone()
        };
        out.insert(edge.destination.clone(), content);
    }
    out
}

/// Apply `ops` in order; any read from a missing path is an error.
pub fn replay(fs: &mut MemFs, ops: &[Operation]) -> Result<(), String> {
    for op in ops {
        match op {
            Operation::Remove { path } => {
                fs.remove(path).ok_or_else(|| format!("rm of missing '{path}'"))?;
            }
            Operation::Create { path } => {
                fs.entry(path.clone()).or_insert_with(|| "empty".to_string());
            }
            Operation::Link { args, path } => {
                if fs.contains_key(path) {
                    return Err(format!("link over existing '{path}'"));
                }
                fs.insert(path.clone(), format!("link:{}", args.join(" ")));
            }
            Operation::Copy { from, to } => {
                let data = fs
                    .get(from)
                    .cloned()
                    .ok_or_else(|| format!("cp from missing '{from}'"))?;
                fs.insert(to.clone(), data);
            }
            Operation::Move { from, to } => {
                let data = fs
                    .remove(from)
                    .ok_or_else(|| format!("mv from missing '{from}'"))?;
                fs.insert(to.clone(), data);
            }
            Operation::Exchange { a, b } => {
                let da = fs.remove(a).ok_or_else(|| format!("exchange with missing '{a}'"))?;
                let db = fs.remove(b).ok_or_else(|| format!("exchange with missing '{b}'"))?;
                fs.insert(a.clone(), db);
                fs.insert(b.clone(), da);
            }
            Operation::Comment(_) => {}
        }
    }
    Ok(())
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
