//! Operations and their rendering to command words.

use super::classify::Classification;
use super::graph::Graph;

/// Default command words, one slot per verb.
pub const REMOVE_DEFAULT: &[&str] = &["rm"];
pub const COPY_DEFAULT: &[&str] = &["cp"];
pub const MOVE_DEFAULT: &[&str] = &["mv"];
pub const EXCHANGE_DEFAULT: &[&str] = &["mv", "--exchange"];
pub const CREATE_DEFAULT: &[&str] = &["touch"];
pub const CREATE_WITH_ARGS_DEFAULT: &[&str] = &["ln", "-snT"];

/// One elementary filesystem step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Remove { path: String },
    Create { path: String },
    /// Link-style create: `args` come before `path`.
    Link { args: Vec<String>, path: String },
    Copy { from: String, to: String },
    Move { from: String, to: String },
    /// Atomic swap of two paths.
    Exchange { a: String, b: String },
    /// No-op annotation; rendered as `["#", words…]`.
    Comment(Vec<String>),
}

impl Operation {
    pub fn is_comment(&self) -> bool {
        matches!(self, Operation::Comment(_))
    }

    /// Render to `[command-words…, operands…]`.
    pub fn to_words(&self, commands: &CommandSet) -> Vec<String> {
        fn join(prefix: &[String], operands: &[&String]) -> Vec<String> {
            prefix
                .iter()
                .chain(operands.iter().copied())
                .cloned()
                .collect()
        }

        match self {
            Operation::Remove { path } => join(&commands.remove, &[path]),
            Operation::Create { path } => join(&commands.create, &[path]),
            Operation::Link { args, path } => {
                let mut words = join(&commands.create_with_args, &[]);
                words.extend(args.iter().cloned());
                words.push(path.clone());
                words
            }
            Operation::Copy { from, to } => join(&commands.copy, &[from, to]),
            Operation::Move { from, to } => join(&commands.r#move, &[from, to]),
            Operation::Exchange { a, b } => join(&commands.exchange, &[a, b]),
            Operation::Comment(text) => std::iter::once("#".to_string())
                .chain(text.iter().cloned())
                .collect(),
        }
    }
}

/// Command words substituted verbatim in front of each operation's operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    pub remove: Vec<String>,
    pub copy: Vec<String>,
    pub r#move: Vec<String>,
    pub exchange: Vec<String>,
    pub create: Vec<String>,
    pub create_with_args: Vec<String>,
}

fn words(ws: &[&str]) -> Vec<String> {
    ws.iter().map(|w| (*w).to_string()).collect()
}

impl Default for CommandSet {
    fn default() -> Self {
        Self {
            remove: words(REMOVE_DEFAULT),
            copy: words(COPY_DEFAULT),
            r#move: words(MOVE_DEFAULT),
            exchange: words(EXCHANGE_DEFAULT),
            create: words(CREATE_DEFAULT),
            create_with_args: words(CREATE_WITH_ARGS_DEFAULT),
        }
    }
}

impl CommandSet {
    /// Prepend `prefix` (e.g. `["sudo"]`) to every verb.
    pub fn with_prefix(mut self, prefix: &[String]) -> Self {
        if prefix.is_empty() {
            return self;
        }
        for slot in [
            &mut self.remove,
            &mut self.copy,
            &mut self.r#move,
            &mut self.exchange,
            &mut self.create,
            &mut self.create_with_args,
        ] {
            let verb = std::mem::take(slot);
            *slot = prefix.iter().cloned().chain(verb).collect();
        }
        self
    }
}

/// Removes for isolated nodes, then creates, both sorted by path.
pub(crate) fn removes_and_creates(graph: &Graph, classes: &Classification) -> Vec<Operation> {
    let removes = classes.isolated.iter().map(|path| Operation::Remove {
        path: path.clone(),
    });
    let creates = classes
        .created
        .iter()
        .map(|path| match graph.create_args(path) {
            Some(args) => Operation::Link {
                args: args.to_vec(),
                path: path.clone(),
            },
            None => Operation::Create { path: path.clone() },
        });
    removes.chain(creates).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_words() {
        let cmds = CommandSet::default();
        let op = Operation::Exchange {
            a: "x".into(),
            b: "y".into(),
        };
        assert_eq!(op.to_words(&cmds), vec!["mv", "--exchange", "x", "y"]);
        let op = Operation::Link {
            args: vec!["target".into()],
            path: "x".into(),
        };
        assert_eq!(op.to_words(&cmds), vec!["ln", "-snT", "target", "x"]);
    }

    #[test]
    fn prefix_applies_to_every_verb() {
        let cmds = CommandSet::default().with_prefix(&["sudo".to_string()]);
        assert_eq!(cmds.remove, vec!["sudo", "rm"]);
        assert_eq!(cmds.create_with_args, vec!["sudo", "ln", "-snT"]);
        let op = Operation::Copy {
            from: "a".into(),
            to: "b".into(),
        };
        assert_eq!(op.to_words(&cmds), vec!["sudo", "cp", "a", "b"]);
    }

    #[test]
    fn comment_ignores_commands() {
        let cmds = CommandSet::default().with_prefix(&["sudo".to_string()]);
        let op = Operation::Comment(vec!["hello".into(), "world".into()]);
        assert!(op.is_comment());
        assert_eq!(op.to_words(&cmds), vec!["#", "hello", "world"]);
    }
}
