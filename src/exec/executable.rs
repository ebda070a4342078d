// src/exec/executable.rs

//! Pluggable executable abstraction.
//!
//! The vendoring step talks to an `Executable` instead of building a
//! `std::process::Command` itself. Production code uses [`RealExecutable`];
//! tests provide their own implementation that records what it was asked to
//! run and writes canned output into the sinks.

use std::fmt::Debug;
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread;

use anyhow::anyhow;
use tracing::debug;

use crate::errors::{Result, VendorError};

use super::execution::Execution;

/// Trait abstracting how a named program is run.
pub trait Executable: Send + Sync + Debug {
    /// Run once and block until the program exits.
    ///
    /// Implementations must write everything the program prints into the
    /// execution's sinks and return an error for a non-zero exit.
    fn execute(&self, execution: Execution) -> Result<()>;
}

/// Runs a program found on `PATH` (or at an explicit path).
#[derive(Debug, Clone)]
pub struct RealExecutable {
    name: String,
}

impl RealExecutable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Executable for RealExecutable {
    fn execute(&self, execution: Execution) -> Result<()> {
        let Execution {
            args,
            env,
            dir,
            stdout,
            stderr,
        } = execution;

        debug!(
            program = %self.name,
            ?args,
            dir = %dir.display(),
            "spawning process"
        );

        let mut child = Command::new(&self.name)
            .args(&args)
            .env_clear()
            .envs(env)
            .current_dir(&dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| VendorError::Spawn {
                command: self.name.clone(),
                source,
            })?;

        let child_stdout = child.stdout.take();
        let child_stderr = child.stderr.take();

        // Both pipes are drained concurrently so neither can fill up and
        // stall the child while we wait on the other.
        let (status, pumped_out, pumped_err) = thread::scope(|scope| {
            let out = scope.spawn(move || pump(child_stdout, stdout));
            let err = scope.spawn(move || pump(child_stderr, stderr));
            let status = child.wait();
            (status, out.join(), err.join())
        });

        for pumped in [pumped_out, pumped_err] {
            pumped.map_err(|_| anyhow!("output pump for '{}' panicked", self.name))??;
        }

        let status = status?;
        debug!(program = %self.name, code = ?status.code(), "process exited");

        if status.success() {
            Ok(())
        } else {
            Err(VendorError::ExitStatus {
                command: self.name.clone(),
                code: status.code(),
            })
        }
    }
}

fn pump<R: Read>(source: Option<R>, mut sink: Box<dyn Write + Send>) -> io::Result<u64> {
    let Some(mut source) = source else {
        return Ok(0);
    };
    let copied = io::copy(&mut source, &mut sink)?;
    sink.flush()?;
    Ok(copied)
}
