// src/build.rs

//! Build-step flow around [`ModVendor`]: announce, gate, vendor.

use std::path::Path;

use tracing::info;

use crate::emitter::LogEmitter;
use crate::errors::Result;
use crate::vendor::ModVendor;

/// What a build step ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Vendored,
    Skipped { reason: String },
    /// `--dry-run`: vendoring was needed but nothing was executed.
    DryRun,
}

/// Title line printed at the start of every build step.
pub fn title() -> String {
    format!("Go Mod Vendor {}", env!("CARGO_PKG_VERSION"))
}

/// Run the vendoring step unless `working_dir` is already vendored.
///
/// Errors from the vendor check and from the go tool are returned as is.
pub fn run_build_step(
    vendor: &ModVendor,
    logs: &dyn LogEmitter,
    module_cache: &Path,
    working_dir: &Path,
) -> Result<BuildOutcome> {
    logs.title(&title());

    let (should_run, reason) = vendor.should_run(working_dir)?;
    if !should_run {
        info!(working_dir = %working_dir.display(), %reason, "skipping go mod vendor");
        logs.process(&format!("Skipping build process: {reason}"));
        logs.break_line();
        return Ok(BuildOutcome::Skipped { reason });
    }

    vendor.execute(module_cache, working_dir)?;
    Ok(BuildOutcome::Vendored)
}
