//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - CLI flags override config values (which are loaded from XML if present).
//! - --debug is a shorthand for --log-level debug.
//! - Command flags take a full command line, e.g. `--mv "mv -n"`.

use anyhow::Result;
use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::split_words;
use crate::config::types::{Config, LogLevel};

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Edit file paths in your editor, get a shell script that applies the changes"
)]
pub struct Args {
    /// Paths to process. More paths are read from stdin (one per line) when it is not a terminal.
    #[arg(value_name = "PATH", value_hint = ValueHint::AnyPath)]
    pub paths: Vec<String>,

    /// Editor command (defaults to $VISUAL, then $EDITOR, then `code -w`).
    #[arg(long, short = 'e')]
    pub editor: Option<String>,

    /// Where to write the generated script; `-` prints it to stdout.
    #[arg(long, short = 'o', value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Suffix for the temporary edit buffer.
    #[arg(long, value_name = "SUFFIX")]
    pub edit_suffix: Option<String>,

    /// Command used for removals.
    #[arg(long = "rm", value_name = "CMD")]
    pub rm: Option<String>,

    /// Command used for copies.
    #[arg(long = "cp", value_name = "CMD")]
    pub cp: Option<String>,

    /// Command used for moves.
    #[arg(long = "mv", value_name = "CMD")]
    pub mv: Option<String>,

    /// Command used for atomic exchanges (with --exchange).
    #[arg(long = "mv-exchange", value_name = "CMD")]
    pub mv_exchange: Option<String>,

    /// Command used to create empty files.
    #[arg(long = "create", value_name = "CMD")]
    pub create: Option<String>,

    /// Command used to create links; the link target goes between it and the new path.
    #[arg(long = "create-with-args", value_name = "CMD")]
    pub create_with_args: Option<String>,

    /// Words prepended to every command (e.g. `sudo`).
    #[arg(long, value_name = "WORDS")]
    pub cmd_prefix: Option<String>,

    /// Scratch path used to rotate cycles with plain moves.
    #[arg(long, alias = "mv-temp-filename", value_name = "PATH")]
    pub scratch_path: Option<String>,

    /// Rotate cycles with atomic exchange instead of a scratch path (needs platform support).
    #[arg(long)]
    pub exchange: bool,

    /// Do not emit comments around cycle operations.
    #[arg(long)]
    pub no_annotate: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Set log level: quiet, normal, info, debug.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Append logs to this file as well.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long)]
    pub json: bool,

    /// Print the config file location used by fscode and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Write a commented template config to the config location and exit.
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) -> Result<()> {
        if let Some(editor) = &self.editor {
            cfg.editor = editor.clone();
        }
        if let Some(out) = &self.output {
            cfg.output_script = out.clone();
        }
        if let Some(suffix) = &self.edit_suffix {
            cfg.edit_suffix = suffix.clone();
        }

        let commands = [
            ("--rm", &self.rm, &mut cfg.commands.remove),
            ("--cp", &self.cp, &mut cfg.commands.copy),
            ("--mv", &self.mv, &mut cfg.commands.r#move),
            ("--mv-exchange", &self.mv_exchange, &mut cfg.commands.exchange),
            ("--create", &self.create, &mut cfg.commands.create),
            ("--create-with-args", &self.create_with_args, &mut cfg.commands.create_with_args),
        ];
        for (flag, value, slot) in commands {
            if let Some(value) = value {
                *slot = split_words(flag, value)?;
            }
        }
        if let Some(prefix) = &self.cmd_prefix {
            cfg.cmd_prefix = split_words("--cmd-prefix", prefix)?;
        }

        if let Some(scratch) = &self.scratch_path {
            cfg.scratch_path = scratch.clone();
        }
        if self.exchange {
            cfg.exchange = true;
        }
        if self.no_annotate {
            cfg.annotate = false;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(log_file) = &self.log_file {
            cfg.log_file = Some(log_file.clone());
        }
        Ok(())
    }
}

pub fn parse() -> Args {
    Args::parse()
}
