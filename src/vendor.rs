// src/vendor.rs

//! The `go mod vendor` step.
//!
//! [`ModVendor`] decides whether vendoring is needed ([`ModVendor::should_run`])
//! and performs it ([`ModVendor::execute`]). Everything with side effects
//! (process spawning, time, the build log, the filesystem) is injected so the
//! step can be exercised without a Go toolchain.

use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clock::{Clock, GoDuration, round_to_millis};
use crate::emitter::LogEmitter;
use crate::errors::Result;
use crate::exec::execution::environ_with;
use crate::exec::{Executable, Execution, SharedBuffer};
use crate::fs::{FileSystem, RealFileSystem};

/// Name of the directory `go mod vendor` populates.
pub const VENDOR_DIR: &str = "vendor";

/// Environment variable the go tool reads the module cache root from.
pub const MODULE_CACHE_ENV: &str = "GOMODCACHE";

/// Arguments passed to the go executable.
pub const VENDOR_ARGS: [&str; 2] = ["mod", "vendor"];

pub const ALREADY_VENDORED: &str = "modules are already vendored";

#[derive(Debug, Clone)]
pub struct ModVendor {
    executable: Arc<dyn Executable>,
    logs: Arc<dyn LogEmitter>,
    clock: Clock,
    fs: Arc<dyn FileSystem>,
}

impl ModVendor {
    pub fn new(executable: Arc<dyn Executable>, logs: Arc<dyn LogEmitter>, clock: Clock) -> Self {
        Self {
            executable,
            logs,
            clock,
            fs: Arc::new(RealFileSystem),
        }
    }

    /// Replace the filesystem used for the vendor directory check.
    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Whether `go mod vendor` should run in `working_dir`.
    ///
    /// Returns `(false, reason)` when a `vendor` entry is already present and
    /// `(true, "")` when it is absent. Any lookup error other than "not
    /// found" is returned as is.
    pub fn should_run(&self, working_dir: impl AsRef<Path>) -> Result<(bool, String)> {
        let vendor_dir = working_dir.as_ref().join(VENDOR_DIR);
        match self.fs.stat(&vendor_dir) {
            Ok(kind) => {
                debug!(path = %vendor_dir.display(), ?kind, "vendor directory present");
                Ok((false, ALREADY_VENDORED.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok((true, String::new())),
            Err(err) => Err(err.into()),
        }
    }

    /// Run `go mod vendor` in `working_dir` with `GOMODCACHE` pointing at
    /// `module_cache_path`.
    ///
    /// On failure the captured output is written to the build log and the
    /// executable's error is returned unchanged.
    pub fn execute(
        &self,
        module_cache_path: impl AsRef<Path>,
        working_dir: impl AsRef<Path>,
    ) -> Result<()> {
        let module_cache_path = module_cache_path.as_ref();
        let working_dir = working_dir.as_ref();

        self.logs.process("Executing build process");
        self.logs.subprocess("Running 'go mod vendor'");

        let buffer = SharedBuffer::new();

        debug!(
            module_cache = %module_cache_path.display(),
            working_dir = %working_dir.display(),
            "running go mod vendor"
        );

        let (duration, result) = self.clock.measure(|| {
            self.executable.execute(Execution {
                args: VENDOR_ARGS.iter().map(|arg| arg.to_string()).collect(),
                env: environ_with(MODULE_CACHE_ENV, module_cache_path.as_os_str()),
                dir: working_dir.to_path_buf(),
                stdout: Box::new(buffer.clone()),
                stderr: Box::new(buffer.clone()),
            })
        });
        let duration = GoDuration(round_to_millis(duration));

        if let Err(err) = result {
            warn!(error = %err, elapsed = %duration, "go mod vendor failed");
            self.logs.action(&format!("Failed after {duration}"));
            self.logs.detail(&buffer.to_string_lossy());
            return Err(err);
        }

        info!(elapsed = %duration, "go mod vendor completed");
        self.logs.action(&format!("Completed in {duration}"));
        self.logs.break_line();

        Ok(())
    }
}
