// src/lib.rs

pub mod build;
pub mod cli;
pub mod clock;
pub mod config;
pub mod emitter;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod vendor;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::build::{BuildOutcome, run_build_step};
use crate::cli::CliArgs;
use crate::clock::Clock;
use crate::config::{load_optional, resolve_module_cache};
use crate::emitter::{Emitter, LogEmitter};
use crate::exec::RealExecutable;
use crate::fs::{FileSystem, RealFileSystem};
use crate::vendor::{MODULE_CACHE_ENV, ModVendor, VENDOR_ARGS};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and module cache resolution
/// - the real executable, clock and stdout build log
/// - the vendor check and `go mod vendor` itself
pub fn run(args: CliArgs) -> Result<BuildOutcome> {
    let working_dir = match args.working_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("resolving current working directory")?,
    };

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let cfg = load_optional(fs.as_ref(), args.config.as_deref(), &working_dir)?;
    let module_cache = resolve_module_cache(args.mod_cache.as_deref(), &cfg, |key| {
        std::env::var_os(key)
    })?;

    debug!(
        working_dir = %working_dir.display(),
        module_cache = %module_cache.display(),
        go = %cfg.vendor.go,
        "resolved build step inputs"
    );

    let logs: Arc<dyn LogEmitter> = Arc::new(Emitter::stdout());
    let vendor = ModVendor::new(
        Arc::new(RealExecutable::new(cfg.vendor.go.clone())),
        Arc::clone(&logs),
        Clock::system(),
    )
    .with_filesystem(fs);

    if args.dry_run {
        return print_dry_run(&vendor, &cfg.vendor.go, &module_cache, &working_dir);
    }

    Ok(run_build_step(&vendor, logs.as_ref(), &module_cache, &working_dir)?)
}

/// Simple dry-run output: the vendor decision and the command that would run.
fn print_dry_run(
    vendor: &ModVendor,
    go: &str,
    module_cache: &Path,
    working_dir: &Path,
) -> Result<BuildOutcome> {
    let (should_run, reason) = vendor.should_run(working_dir)?;

    println!("go-mod-vendor dry-run");
    println!("  working_dir = {}", working_dir.display());
    if !should_run {
        println!("  skip: {reason}");
        return Ok(BuildOutcome::Skipped { reason });
    }
    println!(
        "  would run: {MODULE_CACHE_ENV}={} {go} {}",
        module_cache.display(),
        VENDOR_ARGS.join(" ")
    );

    debug!("dry-run complete (no execution)");
    Ok(BuildOutcome::DryRun)
}
