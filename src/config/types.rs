//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::plan::{CommandSet, CycleMode, PlanOptions};

use super::paths::expand_tilde;
use super::{EDITOR_FALLBACK, EDIT_SUFFIX_DEFAULT, OUTPUT_SCRIPT_DEFAULT, SCRATCH_PATH_DEFAULT};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and progress (default)
    #[default]
    Normal,
    /// Planner details
    Info,
    /// Everything
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for the edit session, planner and script writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Editor command line; the edit buffer path is appended
    pub editor: String,
    /// Where the generated script is written (`-` for stdout)
    pub output_script: PathBuf,
    /// Suffix of the temporary edit buffer (drives editor syntax highlighting)
    pub edit_suffix: String,
    /// Command words per verb, before `cmd_prefix` is applied
    pub commands: CommandSet,
    /// Words prepended to every command (e.g. `sudo`)
    pub cmd_prefix: Vec<String>,
    /// Scratch path for cycle rotation without exchange
    pub scratch_path: String,
    /// Rotate cycles with atomic exchange instead of a scratch path
    pub exchange: bool,
    /// Emit comments around the cycle section
    pub annotate: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: default_editor(),
            output_script: PathBuf::from(OUTPUT_SCRIPT_DEFAULT),
            edit_suffix: EDIT_SUFFIX_DEFAULT.to_string(),
            commands: CommandSet::default(),
            cmd_prefix: Vec::new(),
            scratch_path: SCRATCH_PATH_DEFAULT.to_string(),
            exchange: false,
            annotate: true,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Config {
    /// Planner options derived from this config; `~` in the scratch path is expanded.
    pub fn plan_options(&self) -> PlanOptions {
        let cycle_mode = if self.exchange {
            CycleMode::Exchange
        } else {
            CycleMode::Scratch(expand_tilde(&self.scratch_path))
        };
        PlanOptions {
            cycle_mode,
            annotate: self.annotate,
        }
    }

    /// Command words with `cmd_prefix` applied.
    pub fn command_set(&self) -> CommandSet {
        self.commands.clone().with_prefix(&self.cmd_prefix)
    }
}

/// `$VISUAL`, then `$EDITOR`, then the built-in fallback.
pub fn default_editor() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| EDITOR_FALLBACK.to_string())
}
