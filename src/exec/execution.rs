// src/exec/execution.rs

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Ordered environment handed to a child process.
pub type Environment = Vec<(OsString, OsString)>;

/// Everything needed to run an executable once.
pub struct Execution {
    pub args: Vec<String>,
    /// Complete environment of the child; nothing is inherited implicitly.
    pub env: Environment,
    pub dir: PathBuf,
    pub stdout: Box<dyn Write + Send>,
    pub stderr: Box<dyn Write + Send>,
}

impl fmt::Debug for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Execution")
            .field("args", &self.args)
            .field("env", &self.env.len())
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

/// The current process environment with `key` set to `value`.
///
/// An inherited entry for `key` is dropped so the override is the only one
/// and sits at the end of the list.
pub fn environ_with(key: &str, value: impl Into<OsString>) -> Environment {
    let mut env: Environment = std::env::vars_os()
        .filter(|(k, _)| k.as_os_str() != OsStr::new(key))
        .collect();
    env.push((OsString::from(key), value.into()));
    env
}

/// Growable byte sink that can be handed out as several writers.
///
/// Clones share the same bytes, which is how stdout and stderr end up in a
/// single transcript.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Contents decoded lossily as UTF-8.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u8>> {
        // A writer that panicked mid-write leaves a valid Vec behind.
        self.bytes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
