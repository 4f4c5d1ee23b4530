//! Structured status output.
//!
//! Core code reports `(StatusKind, message)` pairs; this renderer decides
//! how they look. Color is applied only here, so everything upstream stays
//! testable as plain strings.

use std::io::IsTerminal;

/// Semantic category of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Good,
    Warn,
    Fail,
    Accent,
    Muted,
}

impl StatusKind {
    fn ansi(self) -> &'static str {
        match self {
            StatusKind::Info => "\x1b[94m",
            StatusKind::Good => "\x1b[92m",
            StatusKind::Warn => "\x1b[93m",
            StatusKind::Fail => "\x1b[91m",
            StatusKind::Accent => "\x1b[95m",
            StatusKind::Muted => "\x1b[36m",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Applies (or suppresses) color when turning status values into text.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    /// Color when stdout is a terminal and `NO_COLOR` is unset.
    pub fn auto() -> Self {
        let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { color }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn paint(&self, kind: StatusKind, text: &str) -> String {
        if self.color {
            format!("{}{text}{RESET}", kind.ansi())
        } else {
            text.to_string()
        }
    }

    /// Print one status line to stdout.
    pub fn line(&self, kind: StatusKind, text: &str) {
        println!("{}", self.paint(kind, text));
    }

    /// Print a status line to stderr (per-repository failures in batches).
    pub fn error_line(&self, text: &str) {
        eprintln!("{}", self.paint(StatusKind::Fail, text));
    }
}
