//! Typed error definitions for fscode.
//! Provides a small set of well-known failure modes for better logs and tests.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsCodeError {
    /// A node has more incoming edges than allowed (sentinel: 0, others: 1).
    #[error("Node '{node}' has an in-degree of {in_degree}")]
    Validation { node: String, in_degree: usize },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Malformed line {line}: {content}")]
    MalformedLine { line: usize, content: String },

    #[error("Invalid id on line {line}: '{id}'")]
    InvalidId { line: usize, id: String },

    #[error("Unknown id on line {line}: {id}")]
    UnknownId { line: usize, id: u64 },

    #[error("Editor command not found: '{0}'")]
    EditorNotFound(String),

    #[error("Editor '{editor}' exited with {status}")]
    EditorFailed { editor: String, status: String },

    #[error("Cannot shell-quote argument: {0:?}")]
    Unquotable(String),
}

impl FsCodeError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            FsCodeError::Validation { .. } => 10,
            FsCodeError::MalformedInput(_) => 11,
            FsCodeError::MalformedLine { .. } => 20,
            FsCodeError::InvalidId { .. } => 21,
            FsCodeError::UnknownId { .. } => 22,
            FsCodeError::EditorNotFound(_) => 30,
            FsCodeError::EditorFailed { .. } => 31,
            FsCodeError::Unquotable(_) => 40,
        }
    }

    /// Short machine-friendly kind, used as the `kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FsCodeError::Validation { .. } => "validation",
            FsCodeError::MalformedInput(_) => "malformed_input",
            FsCodeError::MalformedLine { .. } => "malformed_line",
            FsCodeError::InvalidId { .. } => "invalid_id",
            FsCodeError::UnknownId { .. } => "unknown_id",
            FsCodeError::EditorNotFound(_) => "editor_not_found",
            FsCodeError::EditorFailed { .. } => "editor_failed",
            FsCodeError::Unquotable(_) => "unquotable",
        }
    }
}

pub type Result<T> = std::result::Result<T, FsCodeError>;
