//! Styled terminal output for the verification binaries.
//!
//! `anstream` strips the ANSI styles from `anstyle` when stdout is not a
//! terminal, so piped runs produce plain text. Diagnostics go through
//! `tracing` on stderr; this module only prints the human-facing report.

mod styles;

use std::io::Write;

pub use styles::clap_styles;

use styles::{DIM, ERROR, HEADER, LABEL, PROGRESS, SUCCESS, WARNING};

/// Green checkmark line.
pub fn success(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{SUCCESS}✓ {msg}{SUCCESS:#}").ok();
}

/// Red cross line on stderr.
pub fn error(msg: impl std::fmt::Display) {
    let mut out = anstream::stderr().lock();
    writeln!(out, "{ERROR}✗ {msg}{ERROR:#}").ok();
}

/// Red cross line on stdout, for failed checks that are part of the report.
pub fn failure(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{ERROR}✗ {msg}{ERROR:#}").ok();
}

pub fn warning(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{WARNING}! {msg}{WARNING:#}").ok();
}

pub fn header(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{HEADER}{msg}{HEADER:#}").ok();
}

/// "  Label: value" with the label bolded.
pub fn label(name: impl std::fmt::Display, value: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "  {LABEL}{name}:{LABEL:#} {value}").ok();
}

pub fn dim(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{DIM}{msg}{DIM:#}").ok();
}

/// Attempt counters and pauses.
pub fn progress(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{PROGRESS}{msg}{PROGRESS:#}").ok();
}

/// Indented check line with a pass/fail icon.
pub fn status_icon(ok: bool, msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    if ok {
        writeln!(out, "  {SUCCESS}✓{SUCCESS:#} {msg}").ok();
    } else {
        writeln!(out, "  {ERROR}✗{ERROR:#} {msg}").ok();
    }
}

pub fn blank() {
    let mut out = anstream::stdout().lock();
    writeln!(out).ok();
}

/// Pretty-printed JSON, dimmed and indented under the current line.
pub fn json(value: &serde_json::Value) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    let mut out = anstream::stdout().lock();
    for line in rendered.lines() {
        writeln!(out, "    {DIM}{line}{DIM:#}").ok();
    }
}
