//! Edit session: paths -> numbered edit buffer -> editor -> edges.
//!
//! Buffer format, one entry per line:
//!
//! ```text
//! <ID>\t<shell-quoted path>
//! ```
//!
//! IDs start at 1 and name the original paths. Keeping a line unchanged keeps
//! the file, editing the path renames it, deleting the line removes the file
//! and repeating an ID copies it. ID 0 creates a new path; with a second word
//! the new path becomes a symlink to that target.

use anyhow::{Context, anyhow};
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::config::split_words;
use crate::errors::{FsCodeError, Result};
use crate::plan::{Edge, PlanInput};

/// Comment block written at the top of every edit buffer.
pub const BUFFER_HEADER: &str = "\
# File Operation Plan
# Format: <ID>\t<Path>
# Lines starting with '#' are ignored.
# To delete a file, remove its line or comment it out.
# To rename/move a file, edit its path.
# To copy a file, add a new line with the same ID and a different path.
# To create an empty file, add a line with ID 0 and the new path.
# To create a symlink, add a line with ID 0, the new path and the link target.
# Paths follow shell quoting rules: quote names with spaces or special characters.
";

/// Original paths, numbered from 1 in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    paths: Vec<String>,
}

impl EditBuffer {
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Render the initial buffer text.
    pub fn render(&self) -> Result<String> {
        let mut text = String::from(BUFFER_HEADER);
        for (idx, path) in self.paths.iter().enumerate() {
            let quoted =
                shlex::try_quote(path).map_err(|_| FsCodeError::Unquotable(path.clone()))?;
            text.push_str(&format!("{}\t{}\n", idx + 1, quoted));
        }
        Ok(text)
    }

    /// Parse an edited buffer into planner input.
    ///
    /// Nodes are the original paths; edges come from the surviving lines.
    pub fn parse(&self, edited: &str) -> Result<PlanInput> {
        let mut edges = Vec::new();
        for (idx, raw) in edited.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = || FsCodeError::MalformedLine {
                line: line_no,
                content: line.to_string(),
            };

            let (id_str, rest) = line.split_once(char::is_whitespace).ok_or_else(malformed)?;
            let id: u64 = id_str.parse().map_err(|_| FsCodeError::InvalidId {
                line: line_no,
                id: id_str.to_string(),
            })?;
            let words = shlex::split(rest.trim()).ok_or_else(malformed)?;
            if words.iter().any(String::is_empty) {
                return Err(malformed());
            }

            let edge = match (id, words.as_slice()) {
                (0, [path]) => Edge::create(path.as_str()),
                (0, [path, target]) => Edge::link(path.as_str(), [target.as_str()]),
                (_, [path]) => {
                    let original = usize::try_from(id - 1)
                        .ok()
                        .and_then(|i| self.paths.get(i))
                        .ok_or(FsCodeError::UnknownId { line: line_no, id })?;
                    Edge::new(original.as_str(), path.as_str())
                }
                _ => return Err(malformed()),
            };
            edges.push(edge);
        }
        debug!(nodes = self.paths.len(), edges = edges.len(), "parsed edit buffer");
        Ok(PlanInput::new(self.paths.iter().cloned(), edges))
    }
}

/// Collect input paths from CLI arguments, then from `stdin` (one per line).
/// Blank entries are dropped; stdin lines are trimmed.
pub fn collect_input_paths<R: BufRead>(
    args: &[String],
    stdin: Option<R>,
) -> io::Result<Vec<String>> {
    let mut paths: Vec<String> = args
        .iter()
        .filter(|p| !p.trim().is_empty())
        .cloned()
        .collect();
    if let Some(reader) = stdin {
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                paths.push(trimmed.to_string());
            }
        }
    }
    Ok(paths)
}

/// Write the buffer to a temp file, run `editor <file>` and parse the result.
///
/// Blocks until the editor exits. The temp file is removed on return.
pub fn edit_in_editor(
    buffer: &EditBuffer,
    editor: &str,
    suffix: &str,
) -> anyhow::Result<PlanInput> {
    let words = split_words("editor", editor)?;
    let (program, args) = words
        .split_first()
        .ok_or_else(|| anyhow!("editor command is empty"))?;

    let mut file = tempfile::Builder::new()
        .prefix("fscode-")
        .suffix(suffix)
        .tempfile()
        .context("create edit buffer")?;
    file.write_all(buffer.render()?.as_bytes())
        .context("write edit buffer")?;
    file.flush().context("flush edit buffer")?;
    let path = file.path().to_path_buf();

    info!(editor, buffer = %path.display(), "Opening edit buffer");
    let mut cmd = Command::new(program);
    cmd.args(args).arg(&path);
    if let Some(tty) = controlling_tty() {
        cmd.stdin(tty);
    }
    let status = cmd.status().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            anyhow::Error::new(FsCodeError::EditorNotFound(editor.to_string()))
        } else {
            anyhow::Error::new(e).context(format!("launch editor '{editor}'"))
        }
    })?;
    if !status.success() {
        return Err(FsCodeError::EditorFailed {
            editor: editor.to_string(),
            status: status.to_string(),
        }
        .into());
    }

    // Read by path: editors commonly replace the file instead of writing in place.
    let edited = fs::read_to_string(&path)
        .with_context(|| format!("read edit buffer '{}'", path.display()))?;
    Ok(buffer.parse(&edited)?)
}

/// When paths were piped in, stdin is exhausted; hand terminal editors the tty instead.
#[cfg(unix)]
fn controlling_tty() -> Option<Stdio> {
    if atty::is(atty::Stream::Stdin) {
        return None;
    }
    fs::File::open("/dev/tty").ok().map(Stdio::from)
}

#[cfg(not(unix))]
fn controlling_tty() -> Option<Stdio> {
    None
}
