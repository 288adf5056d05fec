use clap::Parser;
use fscode::cli::Args;
use fscode::config::types::{Config, LogLevel};
use fscode::{CycleMode, PlanOptions};
use std::path::PathBuf;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn positional_paths_are_collected_in_order() {
    let args = Args::parse_from(["fscode", "b.txt", "a dir/x", "c"]);
    assert_eq!(args.paths, strings(&["b.txt", "a dir/x", "c"]));
}

#[test]
fn effective_log_level_precedence() {
    let args = Args::parse_from(["fscode", "--debug", "--log-level", "quiet"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));

    let args = Args::parse_from(["fscode", "--log-level", "info"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Info));

    let args = Args::parse_from(["fscode", "--log-level", "shouty"]);
    assert_eq!(args.effective_log_level(), None);
}

#[test]
fn apply_overrides_sets_flags() {
    let args = Args::parse_from([
        "fscode",
        "--editor",
        "vim -n",
        "-o",
        "-",
        "--edit-suffix",
        ".txt",
        "--mv",
        "mv -n",
        "--mv-exchange",
        "renameat2 --swap",
        "--cmd-prefix",
        "sudo -u 'web user'",
        "--exchange",
        "--no-annotate",
        "--log-level",
        "info",
        "--log-file",
        "/tmp/fscode.log",
    ]);
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg).unwrap();

    assert_eq!(cfg.editor, "vim -n");
    assert_eq!(cfg.output_script, PathBuf::from("-"));
    assert_eq!(cfg.edit_suffix, ".txt");
    assert_eq!(cfg.commands.r#move, strings(&["mv", "-n"]));
    assert_eq!(cfg.commands.exchange, strings(&["renameat2", "--swap"]));
    assert_eq!(cfg.commands.copy, strings(&["cp"]));
    assert_eq!(cfg.cmd_prefix, strings(&["sudo", "-u", "web user"]));
    assert!(cfg.exchange);
    assert!(!cfg.annotate);
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/fscode.log")));

    assert_eq!(
        cfg.plan_options(),
        PlanOptions {
            cycle_mode: CycleMode::Exchange,
            annotate: false,
        }
    );
    assert_eq!(
        cfg.command_set().r#move,
        strings(&["sudo", "-u", "web user", "mv", "-n"])
    );
}

#[test]
fn unset_flags_leave_config_untouched() {
    let args = Args::parse_from(["fscode", "some/path"]);
    let mut cfg = Config::default();
    let before = cfg.clone();
    args.apply_overrides(&mut cfg).unwrap();
    assert_eq!(cfg, before);
}

#[test]
fn legacy_scratch_flag_alias() {
    let args = Args::parse_from(["fscode", "--mv-temp-filename", "/tmp/swap"]);
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg).unwrap();
    assert_eq!(
        cfg.plan_options().cycle_mode,
        CycleMode::Scratch("/tmp/swap".into())
    );
}

#[test]
fn unbalanced_quotes_in_command_flag_are_rejected() {
    let args = Args::parse_from(["fscode", "--rm", "rm 'oops"]);
    let mut cfg = Config::default();
    let err = args.apply_overrides(&mut cfg).unwrap_err();
    assert!(err.to_string().contains("--rm"), "{err}");
}
