use std::io::{self, Write};
use nu_ansi_term::Style;
use crate::error::{InterpreterError, RunError};
use crate::theme::catppuccin::Mocha as P;

/// Pretty-print a failed run with caret positioning.
/// If `program` is `Some("brainguck")`, prefix messages with "brainguck: ...".
pub fn print_run_error(program: Option<&str>, code: &[u8], err: &RunError, color: bool) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    let msg = match &err.source {
        InterpreterError::InputExhausted { .. } => {
            "Runtime error: input exhausted while reading for ','".to_string()
        }
        InterpreterError::UnmatchedBracket { kind, .. } => {
            format!("Runtime error: unmatched bracket {kind}")
        }
        InterpreterError::PointerOutOfBounds { ptr, .. } => {
            format!("Runtime error: pointer out of bounds (ptr={ptr}, op='>')")
        }
        InterpreterError::Io { source, .. } => format!("I/O error: {source}"),
        other => other.to_string(),
    };
    let msg = prefix_program(&msg);

    match err.source.ip() {
        Some(ip) => print_error_with_context(&msg, code, ip, color),
        None => {
            eprintln!("{}", paint(color, Style::new().fg(P::RED).bold(), &msg));
        }
    }
    eprintln!(
        "{}",
        paint(color, Style::new().fg(P::SURFACE2), &format!("{} bytes processed", err.processed))
    );
    let _ = io::stderr().flush();
}

/// Print a concise error with instruction index and a caret context window.
pub fn print_error_with_context(prefix: &str, code: &[u8], pos: usize, color: bool) {
    let (line, underline) = context_window(code, pos);
    eprintln!(
        "{} at instruction {pos}",
        paint(color, Style::new().fg(P::RED).bold(), prefix)
    );
    eprintln!("  {line}");
    eprintln!("  {}", paint(color, Style::new().fg(P::YELLOW).bold(), &underline));
    let _ = io::stderr().flush();
}

/// A short printable window of `code` around `pos` and the caret line under it.
fn context_window(code: &[u8], pos: usize) -> (String, String) {
    const WINDOW: usize = 32;

    let start = pos.saturating_sub(WINDOW).min(code.len());
    let end = (pos + WINDOW + 1).min(code.len());
    let line: String = code[start..end]
        .iter()
        .map(|&b| match b {
            b if b.is_ascii_graphic() || b == b' ' => b as char,
            b if b.is_ascii_whitespace() => ' ',
            _ => '?',
        })
        .collect();

    let mut underline = " ".repeat(pos.saturating_sub(start));
    underline.push('^');
    (line, underline)
}

/// Print the verbose processed-byte count.
pub fn print_byte_count(processed: usize, color: bool) {
    eprintln!(
        "{}",
        paint(color, Style::new().fg(P::PEACH), &format!("{processed} bytes read."))
    );
    let _ = io::stderr().flush();
}

fn paint(color: bool, style: Style, text: &str) -> String {
    if color {
        style.paint(text).to_string()
    } else {
        text.to_string()
    }
}
