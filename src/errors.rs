// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VendorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Filesystem errors surface with the OS description untouched.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// `code` is `None` when the process was terminated by a signal.
    #[error("'{command}' exited with {}", describe_exit(.code))]
    ExitStatus { command: String, code: Option<i32> },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, VendorError>;
