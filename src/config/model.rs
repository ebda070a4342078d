// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [vendor]
/// go = "/usr/local/go/bin/go"
/// module_cache = "/cache/go-mod"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub vendor: VendorSection,
}

/// `[vendor]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorSection {
    /// Program used to run `mod vendor`. Looked up on `PATH` unless it
    /// contains a path separator.
    #[serde(default = "default_go")]
    pub go: String,

    /// Module cache root handed to the go tool as `GOMODCACHE`.
    #[serde(default)]
    pub module_cache: Option<PathBuf>,
}

fn default_go() -> String {
    "go".to_string()
}

impl Default for VendorSection {
    fn default() -> Self {
        Self {
            go: default_go(),
            module_cache: None,
        }
    }
}
