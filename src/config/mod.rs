// src/config/mod.rs

//! Configuration loading for go-mod-vendor.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load and validate a config file through the filesystem seam
//!   (`loader.rs`).
//! - Resolve the module cache root from flags, config and environment.

pub mod loader;
pub mod model;

pub use loader::{load_and_validate, load_from_path, load_optional, resolve_module_cache};
pub use model::{ConfigFile, VendorSection};
