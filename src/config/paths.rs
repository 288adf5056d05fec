//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log paths, expands `~`, and detects
//! symlinked ancestors for safety.

use anyhow::{Result, anyhow};
use dirs::{config_dir, data_dir, home_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::CONFIG_ENV;

/// Config path: `$FSCODE_CONFIG` if set (a directory means `<dir>/config.xml`),
/// else the OS config dir.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        let p = PathBuf::from(p);
        return Ok(if p.is_dir() { p.join("config.xml") } else { p });
    }
    if let Some(mut base) = config_dir() {
        base.push("fscode");
        base.push("config.xml");
        return Ok(base);
    }
    home_dir()
        .map(|h| h.join(".config").join("fscode").join("config.xml"))
        .ok_or_else(|| anyhow!("cannot determine a config directory (no HOME)"))
}

/// Suggested log file location (OS data dir). Not created here.
pub fn default_log_path() -> Option<PathBuf> {
    data_dir()
        .or_else(|| home_dir().map(|h| h.join(".local").join("share")))
        .map(|base| base.join("fscode").join("fscode.log"))
}

/// Expand a leading `~` or `~/` to the home directory. Other paths are returned unchanged.
pub fn expand_tilde(path: &str) -> String {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return path.to_string(),
    };
    match home_dir() {
        Some(home) => format!("{}{}", home.display(), rest),
        None => path.to_string(),
    }
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
