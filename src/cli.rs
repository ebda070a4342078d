// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `go-mod-vendor`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "go-mod-vendor",
    version,
    about = "Vendor a Go module's dependencies with `go mod vendor`.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory containing the module's `go.mod`.
    ///
    /// Default: the current working directory.
    #[arg(long, value_name = "PATH")]
    pub working_dir: Option<PathBuf>,

    /// Module cache root passed to the go tool as `GOMODCACHE`.
    ///
    /// Overrides `[vendor].module_cache` and the environment.
    #[arg(long, value_name = "PATH")]
    pub mod_cache: Option<PathBuf>,

    /// Path to the config file (TOML).
    ///
    /// Default: `GoModVendor.toml` in the working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GO_MOD_VENDOR_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Decide whether vendoring is needed and print the command, but don't run it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
