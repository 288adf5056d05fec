//! Tracing setup for the binary.
//!
//! - The filter comes from the program's `LogLevel`; `RUST_LOG` is not consulted.
//! - Console output goes to stderr (compact or JSON).
//! - An optional log file gets its own non-blocking layer without ANSI colors.
//!   Files under a symlinked directory are refused.

use anyhow::Result;
use chrono::Local;
use fscode::output as out;
use fscode::{LogLevel, path_has_symlink_ancestor};
use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{self as tsfmt, MakeWriter};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Local wall-clock timestamps, millisecond precision.
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_filter(level).into())
        .parse_lossy("")
}

fn fmt_layer<W>(writer: W, json: bool, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tsfmt::layer()
        .with_timer(LocalTime)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    if json {
        layer.json().boxed()
    } else {
        layer.compact().boxed()
    }
}

/// File layer for `path`, or the reason it could not be enabled.
fn file_layer(path: &Path, json: bool) -> std::result::Result<(BoxedLayer, WorkerGuard), String> {
    match path_has_symlink_ancestor(path) {
        Ok(false) => {}
        Ok(true) => return Err(format!("an ancestor of {} is a symlink", path.display())),
        Err(e) => return Err(format!("cannot inspect {}: {e}", path.display())),
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| format!("cannot create {}: {e}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("cannot open {}: {e}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    Ok((fmt_layer(writer, json, false), guard))
}

/// Install the global subscriber. The returned guard flushes the log file
/// when dropped, so keep it alive for the whole run.
pub fn init_tracing(
    level: LogLevel,
    log_file: Option<&Path>,
    json: bool,
) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(std::io::stderr, json, out::stderr_is_tty())];

    let guard = match log_file.map(|path| (path, file_layer(path, json))) {
        Some((_, Ok((layer, guard)))) => {
            layers.push(layer);
            Some(guard)
        }
        Some((path, Err(reason))) => {
            out::print_warn(&format!(
                "File logging to '{}' disabled ({reason}); logs continue on stderr.",
                path.display()
            ));
            None
        }
        None => None,
    };

    registry().with(layers).with(filter_for(level)).try_init()?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_level_opens_one_more_tracing_level() {
        assert_eq!(level_filter(LogLevel::Quiet), LevelFilter::ERROR);
        assert_eq!(level_filter(LogLevel::Normal), LevelFilter::INFO);
        assert_eq!(level_filter(LogLevel::Info), LevelFilter::DEBUG);
        assert_eq!(level_filter(LogLevel::Debug), LevelFilter::TRACE);
    }

    #[test]
    fn refuses_log_file_under_symlinked_dir() {
        let td = tempfile::tempdir().unwrap();
        let base = fs::canonicalize(td.path()).unwrap();
        let real = base.join("real");
        fs::create_dir(&real).unwrap();
        #[cfg(unix)]
        {
            let link = base.join("link");
            std::os::unix::fs::symlink(&real, &link).unwrap();
            let err = file_layer(&link.join("fscode.log"), false).err().unwrap();
            assert!(err.contains("symlink"), "{err}");
        }
        assert!(file_layer(&real.join("fscode.log"), true).is_ok());
        assert!(real.join("fscode.log").exists());
    }
}
