//! Config module.
//! Provides configuration types, default paths and XML loading.
//! Precedence: CLI flags > XML config file > built-in defaults.

pub mod paths;
pub mod types;
pub mod xml;

use anyhow::{Result, anyhow};

pub use paths::{default_config_path, default_log_path, expand_tilde, path_has_symlink_ancestor};
pub use types::{default_editor, Config, LogLevel};
pub use xml::{create_template_config, load_config, load_config_from_xml_path, LoadResult};

/// Environment variable naming an explicit config file (or directory).
pub const CONFIG_ENV: &str = "FSCODE_CONFIG";
pub const OUTPUT_SCRIPT_DEFAULT: &str = "file_ops.sh";
pub const EDIT_SUFFIX_DEFAULT: &str = ".sh";
pub const SCRATCH_PATH_DEFAULT: &str = "./__mv_tmp";
pub const EDITOR_FALLBACK: &str = "code -w";

/// Split a command string into words with shell rules
/// (`"mv --exchange"` -> `["mv", "--exchange"]`).
pub fn split_words(field: &str, value: &str) -> Result<Vec<String>> {
    shlex::split(value).ok_or_else(|| anyhow!("{field}: unbalanced quoting in '{value}'"))
}
