//! Application orchestrator.
//! Loads/merges config, initializes logging, collects paths, runs the edit
//! session, plans the operations and writes the script.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, error, info};

use fscode::cli::Args;
use fscode::output as out;
use fscode::{
    EditBuffer, FsCodeError, LoadResult, collect_input_paths, create_template_config,
    default_config_path, edit_in_editor, load_config, plan, render_script,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config / --init-config before logging init
    if args.print_config {
        let path = default_config_path()?;
        out::print_info(&format!("fscode config path:\n  {}\n", path.display()));
        if path.exists() {
            out::print_info("A config file exists at that location.");
        } else {
            out::print_info(
                "No config file there yet; run with --init-config to create a template.",
            );
        }
        return Ok(());
    }
    if args.init_config {
        let path = default_config_path()?;
        create_template_config(&path)?;
        out::print_success(&format!("Template config written to {}", path.display()));
        return Ok(());
    }

    // Config file, then CLI overrides (CLI wins)
    let loaded = load_config()?;
    let source = matches!(loaded, LoadResult::Loaded(..)).then(|| loaded.path().to_path_buf());
    let mut cfg = loaded.into_config();
    args.apply_overrides(&mut cfg)?;

    // Held until return so the file appender flushes
    let _guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
    })?;
    debug!(config = ?source, "Starting fscode: {:?}", args);

    let stdin_piped = !atty::is(atty::Stream::Stdin);
    let paths = collect_input_paths(&args.paths, stdin_piped.then(|| io::stdin().lock()))
        .context("read paths from stdin")?;
    if paths.is_empty() {
        out::print_warn("No input file paths provided. Exiting.");
        return Ok(());
    }

    let buffer = EditBuffer::new(paths);
    out::print_info(&format!(
        "Opening {} path(s) in editor: {}. Save and close the editor to continue...",
        buffer.paths().len(),
        cfg.editor
    ));
    let input = edit_in_editor(&buffer, &cfg.editor, &cfg.edit_suffix)
        .inspect_err(|e| log_failure(e, "Edit session failed"))?;

    let planned = plan(&input, &cfg.plan_options())
        .map_err(anyhow::Error::from)
        .inspect_err(|e| log_failure(e, "Planning failed"))?;
    let commands = planned.to_commands(&cfg.command_set());
    let script = render_script(&commands)?;
    info!(
        operations = planned.effective_len(),
        cycles = planned.classification.cycles.len(),
        "Plan ready"
    );

    write_script(&cfg.output_script, &script)?;
    if cfg.output_script != Path::new("-") {
        out::print_success(&format!(
            "Generated script with {} operation(s) at {}",
            planned.effective_len(),
            cfg.output_script.display()
        ));
    }
    Ok(())
}

fn write_script(path: &Path, script: &str) -> Result<()> {
    if path == Path::new("-") {
        let mut stdout = io::stdout().lock();
        stdout.write_all(script.as_bytes()).context("write script to stdout")?;
        return stdout.flush().context("flush stdout");
    }
    fs::write(path, script).with_context(|| format!("write script '{}'", path.display()))
}

fn log_failure(e: &anyhow::Error, msg: &str) {
    match e.downcast_ref::<FsCodeError>() {
        Some(known @ FsCodeError::Validation { node, in_degree }) => {
            error!(code = known.code(), kind = known.kind(), node = %node, in_degree, "{msg}")
        }
        Some(known @ FsCodeError::MalformedLine { line, content }) => {
            error!(code = known.code(), kind = known.kind(), line, content = %content, "{msg}")
        }
        Some(known) => error!(code = known.code(), kind = known.kind(), error = %known, "{msg}"),
        None => error!(error = ?e, "{msg}"),
    }
}
