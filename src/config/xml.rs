//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request (`--init-config`).
//!
//! Notes:
//! - Unknown XML fields are a hard error to surface misconfigurations early.
//! - Command fields hold a command line (`mv --exchange`) split with shell rules.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use super::{
    CONFIG_ENV, EDIT_SUFFIX_DEFAULT, OUTPUT_SCRIPT_DEFAULT, SCRATCH_PATH_DEFAULT, split_words,
};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    editor: Option<String>,
    output_script: Option<String>,
    edit_suffix: Option<String>,
    remove: Option<String>,
    copy: Option<String>,
    #[serde(rename = "move")]
    move_cmd: Option<String>,
    exchange_command: Option<String>,
    create: Option<String>,
    create_with_args: Option<String>,
    cmd_prefix: Option<String>,
    scratch_path: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    exchange: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    annotate: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
}

// Custom deserializer that trims surrounding whitespace for optional bool
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<bool>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected true/false, got '{s}'"))),
    }
}

/// Outcome of [`load_config`].
#[derive(Debug, Clone)]
pub enum LoadResult {
    /// Config read from this file.
    Loaded(Config, PathBuf),
    /// No file at the default location; built-in defaults apply.
    Defaults(Config, PathBuf),
}

impl LoadResult {
    pub fn into_config(self) -> Config {
        match self {
            LoadResult::Loaded(cfg, _) | LoadResult::Defaults(cfg, _) => cfg,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            LoadResult::Loaded(_, p) | LoadResult::Defaults(_, p) => p,
        }
    }
}

/// Load the config from `$FSCODE_CONFIG` or the default location.
///
/// A missing default file means defaults; a missing explicit file is an error.
pub fn load_config() -> Result<LoadResult> {
    let explicit = env::var_os(CONFIG_ENV).is_some_and(|v| !v.is_empty());
    let path = default_config_path()?;
    if !path.exists() {
        if explicit {
            bail!("{CONFIG_ENV} points to a missing file: {}", path.display());
        }
        debug!("No config at {}; using defaults", path.display());
        return Ok(LoadResult::Defaults(Config::default(), path));
    }
    let cfg = load_config_from_xml_path(&path)?;
    debug!("Loaded config from {}", path.display());
    Ok(LoadResult::Loaded(cfg, path))
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// Map XmlConfig -> Config, starting from defaults
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(editor) = non_empty(parsed.editor) {
        cfg.editor = editor;
    }
    if let Some(out) = non_empty(parsed.output_script) {
        cfg.output_script = PathBuf::from(out);
    }
    if let Some(suffix) = non_empty(parsed.edit_suffix) {
        cfg.edit_suffix = suffix;
    }

    let commands = [
        ("remove", parsed.remove, &mut cfg.commands.remove),
        ("copy", parsed.copy, &mut cfg.commands.copy),
        ("move", parsed.move_cmd, &mut cfg.commands.r#move),
        ("exchange_command", parsed.exchange_command, &mut cfg.commands.exchange),
        ("create", parsed.create, &mut cfg.commands.create),
        ("create_with_args", parsed.create_with_args, &mut cfg.commands.create_with_args),
    ];
    for (field, value, slot) in commands {
        if let Some(value) = non_empty(value) {
            *slot = split_words(field, &value)?;
        }
    }
    if let Some(prefix) = non_empty(parsed.cmd_prefix) {
        cfg.cmd_prefix = split_words("cmd_prefix", &prefix)?;
    }

    if let Some(scratch) = non_empty(parsed.scratch_path) {
        cfg.scratch_path = scratch;
    }
    if let Some(exchange) = parsed.exchange {
        cfg.exchange = exchange;
    }
    if let Some(annotate) = parsed.annotate {
        cfg.annotate = annotate;
    }

    if let Some(level) = non_empty(parsed.log_level) {
        cfg.log_level = level.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    cfg.log_file = non_empty(parsed.log_file).map(PathBuf::from);

    Ok(cfg)
}

/// Write a commented template config to `path`. Refuses to overwrite or to
/// follow a symlinked ancestor.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config dir '{}'", parent.display()))?;
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/fscode.log".into());

    let content = format!(
        "\
<!--
  fscode configuration (XML)

  editor            -> editor command line; the edit buffer path is appended
  output_script     -> where the generated script is written (- for stdout)
  edit_suffix       -> suffix of the temporary edit buffer
  remove, copy, move, exchange_command, create, create_with_args
                    -> command lines used for each operation
  cmd_prefix        -> words prepended to every command (e.g. sudo)
  scratch_path      -> scratch path used to rotate cycles without exchange
  exchange          -> true to rotate cycles with atomic exchange (needs platform support)
  annotate          -> true to emit comments around cycle operations
  log_level         -> quiet | normal | info | debug
  log_file          -> optional log file (suggested: {suggested_log})

  CLI flags override XML values. Empty elements keep the built-in default.
-->
<config>
  <editor></editor>
  <output_script>{OUTPUT_SCRIPT_DEFAULT}</output_script>
  <edit_suffix>{EDIT_SUFFIX_DEFAULT}</edit_suffix>
  <remove>rm</remove>
  <copy>cp</copy>
  <move>mv</move>
  <exchange_command>mv --exchange</exchange_command>
  <create>touch</create>
  <create_with_args>ln -snT</create_with_args>
  <cmd_prefix></cmd_prefix>
  <scratch_path>{SCRATCH_PATH_DEFAULT}</scratch_path>
  <exchange>false</exchange>
  <annotate>true</annotate>
  <log_level>normal</log_level>
  <log_file></log_file>
</config>
"
    );

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("create config '{}'", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("write config '{}'", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Best-effort: ignore permission-setting errors on odd filesystems.
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }

    info!("Created template config at {}", path.display());
    Ok(())
}
