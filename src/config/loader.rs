// src/config/loader.rs

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::model::ConfigFile;
use crate::errors::{Result, VendorError};
use crate::fs::FileSystem;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "GoModVendor.toml";

/// Load a configuration file and return the raw `ConfigFile`.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] for
/// semantic checks.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs
        .read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file and check it is usable.
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ConfigFile> {
    let config = load_from_path(fs, path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load `explicit` if given, otherwise the default file in `working_dir` if it
/// exists, otherwise built-in defaults.
///
/// An explicit path that cannot be read is an error; a missing default file
/// is not.
pub fn load_optional(
    fs: &dyn FileSystem,
    explicit: Option<&Path>,
    working_dir: &Path,
) -> Result<ConfigFile> {
    match explicit {
        Some(path) => load_and_validate(fs, path),
        None => {
            let path = working_dir.join(DEFAULT_CONFIG_FILE);
            if fs.exists(&path) {
                load_and_validate(fs, &path)
            } else {
                Ok(ConfigFile::default())
            }
        }
    }
}

pub fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.vendor.go.trim().is_empty() {
        return Err(VendorError::ConfigError(
            "[vendor].go must name an executable".to_string(),
        ));
    }
    if let Some(cache) = &config.vendor.module_cache {
        if cache.as_os_str().is_empty() {
            return Err(VendorError::ConfigError(
                "[vendor].module_cache must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

/// Pick the module cache root, first match wins:
///
/// 1. `flag` (`--mod-cache`)
/// 2. `[vendor].module_cache`
/// 3. `GOMODCACHE`
/// 4. `<first GOPATH entry>/pkg/mod`
/// 5. `$HOME/go/pkg/mod`
///
/// `var` reads an environment variable; it is a parameter so callers and
/// tests control the environment.
pub fn resolve_module_cache(
    flag: Option<&Path>,
    config: &ConfigFile,
    var: impl Fn(&str) -> Option<OsString>,
) -> Result<PathBuf> {
    let non_empty = |value: OsString| (!value.is_empty()).then_some(value);

    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = &config.vendor.module_cache {
        return Ok(path.clone());
    }
    if let Some(cache) = var("GOMODCACHE").and_then(non_empty) {
        return Ok(PathBuf::from(cache));
    }
    if let Some(gopath) = var("GOPATH").and_then(non_empty) {
        if let Some(first) = std::env::split_paths(&gopath).find(|p| !p.as_os_str().is_empty()) {
            return Ok(first.join("pkg").join("mod"));
        }
    }
    if let Some(home) = var("HOME").and_then(non_empty) {
        return Ok(PathBuf::from(home).join("go").join("pkg").join("mod"));
    }

    Err(VendorError::ConfigError(
        "no module cache root: pass --mod-cache, set [vendor].module_cache, or set GOMODCACHE"
            .to_string(),
    ))
}
