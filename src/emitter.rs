// src/emitter.rs

//! Build-log emitter.
//!
//! This is the user-facing progress log of the build step, distinct from the
//! `tracing` diagnostics set up in [`crate::logging`]. Lines are nested by
//! indentation:
//!
//! ```text
//! Go Mod Vendor 0.1.0
//!   Executing build process
//!     Running 'go mod vendor'
//!       Completed in 1.204s
//! ```

use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::Mutex;

const INDENT: &str = "  ";

/// Leveled build-log sink.
pub trait LogEmitter: Send + Sync + Debug {
    fn title(&self, message: &str);
    fn process(&self, message: &str);
    fn subprocess(&self, message: &str);
    fn action(&self, message: &str);
    /// Raw diagnostic text such as captured command output.
    fn detail(&self, message: &str);
    /// Blank separator line.
    fn break_line(&self);
}

/// [`LogEmitter`] writing indented lines to any writer.
///
/// Write failures are dropped: losing a progress line must never fail the
/// build step itself.
#[derive(Debug)]
pub struct Emitter<W: Write + Send> {
    out: Mutex<W>,
}

impl Emitter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, depth: usize, message: &str) {
        let text = indent(depth, message);
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = out.write_all(text.as_bytes()).and_then(|()| out.flush());
    }
}

impl<W: Write + Send + Debug> LogEmitter for Emitter<W> {
    fn title(&self, message: &str) {
        self.emit(0, message);
    }

    fn process(&self, message: &str) {
        self.emit(1, message);
    }

    fn subprocess(&self, message: &str) {
        self.emit(2, message);
    }

    fn action(&self, message: &str) {
        self.emit(3, message);
    }

    fn detail(&self, message: &str) {
        self.emit(4, message);
    }

    fn break_line(&self) {
        self.emit(0, "");
    }
}

/// Prefix every line of `message` with `depth` indents and terminate it.
///
/// A single trailing newline in `message` does not produce an extra blank
/// line; empty lines stay empty.
fn indent(depth: usize, message: &str) -> String {
    let prefix = INDENT.repeat(depth);
    let body = message.strip_suffix('\n').unwrap_or(message);
    if body.is_empty() {
        return "\n".to_string();
    }

    let mut text = String::with_capacity(body.len() + prefix.len() + 1);
    for line in body.split('\n') {
        if !line.is_empty() {
            text.push_str(&prefix);
            text.push_str(line);
        }
        text.push('\n');
    }
    text
}
