//! Shell script rendering.
//! Each operation becomes one POSIX-quoted command line; comment operations
//! become `#` lines.

use crate::errors::{FsCodeError, Result};

pub const SCRIPT_HEADER: &str = "\
#!/bin/sh
# Generated by fscode. Review before running.
# Run it from the directory where fscode was invoked, e.g.: sh ./file_ops.sh
# Operations must run in order; stop at the first failure (set -e).
set -e
";

/// Render one operation's words as a script line.
pub fn render_line(words: &[String]) -> Result<String> {
    match words.split_first() {
        Some((first, rest)) if first == "#" => {
            // Line breaks inside a comment would turn the remainder into a command.
            let text = rest.join(" ").replace(['\n', '\r'], " ");
            Ok(format!("# {text}").trim_end().to_string())
        }
        _ => shlex::try_join(words.iter().map(String::as_str))
            .map_err(|_| FsCodeError::Unquotable(words.join(" "))),
    }
}

/// Render a complete script: header plus one line per operation.
pub fn render_script(commands: &[Vec<String>]) -> Result<String> {
    let mut script = String::from(SCRIPT_HEADER);
    for words in commands {
        script.push_str(&render_line(words)?);
        script.push('\n');
    }
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn commands_are_quoted() {
        assert_eq!(
            render_line(&words(&["mv", "--exchange", "a b", "c"])).unwrap(),
            "mv --exchange 'a b' c"
        );
    }

    #[test]
    fn comments_are_not_quoted_and_stay_single_line() {
        assert_eq!(
            render_line(&words(&["#", "Processing cycle 1:", "a", "b"])).unwrap(),
            "# Processing cycle 1: a b"
        );
        assert_eq!(
            render_line(&words(&["#", "evil\nrm -rf /"])).unwrap(),
            "# evil rm -rf /"
        );
    }

    #[test]
    fn nul_bytes_are_rejected() {
        let err = render_line(&words(&["rm", "bad\0name"])).unwrap_err();
        assert!(matches!(err, FsCodeError::Unquotable(_)));
    }

    #[test]
    fn script_starts_with_header() {
        let script = render_script(&[words(&["rm", "x"])]).unwrap();
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.ends_with("set -e\nrm x\n"));
    }
}
