//! User-facing status lines on stderr.
//! stdout stays clean so `--output -` can carry the script alone.

use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy)]
enum Tone {
    Info,
    Warn,
    Error,
    Success,
}

impl Tone {
    fn label(self) -> &'static str {
        match self {
            Tone::Info => "info:",
            Tone::Warn => "warn:",
            Tone::Error => "error:",
            Tone::Success => "ok:",
        }
    }
}

/// Colors are used only when stderr is a terminal.
pub fn stderr_is_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

fn emit(tone: Tone, msg: &str) {
    let label = tone.label();
    if !stderr_is_tty() {
        eprintln!("{label} {msg}");
        return;
    }
    match tone {
        Tone::Info => eprintln!("{} {msg}", label.cyan().bold()),
        Tone::Warn => eprintln!("{} {msg}", label.yellow().bold()),
        Tone::Error => eprintln!("{} {msg}", label.red().bold()),
        Tone::Success => eprintln!("{} {msg}", label.green().bold()),
    }
}

pub fn print_info(msg: &str) {
    emit(Tone::Info, msg);
}

pub fn print_warn(msg: &str) {
    emit(Tone::Warn, msg);
}

pub fn print_error(msg: &str) {
    emit(Tone::Error, msg);
}

pub fn print_success(msg: &str) {
    emit(Tone::Success, msg);
}
