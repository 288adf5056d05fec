//! Core library for `fscode`.
//!
//! Edit a list of paths as text, then turn the edited list into an ordered,
//! safe sequence of `rm`/`touch`/`ln`/`cp`/`mv` operations:
//! - [`session`] renders paths into a numbered edit buffer and parses it back into edges;
//! - [`plan`] validates the resulting graph and orders the operations;
//! - [`script`] renders operations into a POSIX shell script.
//!
//! The planner itself performs no I/O.

pub mod cli;
pub mod config;
pub mod errors;
pub mod output;
pub mod plan;
pub mod script;
pub mod session;

pub use config::{
    Config, LoadResult, LogLevel, create_template_config, default_config_path, default_log_path,
    load_config, load_config_from_xml_path, path_has_symlink_ancestor,
};
pub use errors::FsCodeError;
pub use plan::{
    Classification, CommandSet, CycleMode, Edge, Operation, Plan, PlanInput, PlanOptions,
    SENTINEL, plan, plan_commands,
};
pub use script::render_script;
pub use session::{EditBuffer, collect_input_paths, edit_in_editor};
