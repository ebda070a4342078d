// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`execution`] describes one invocation: arguments, environment,
//!   working directory and the sinks stdout/stderr are written to.
//! - [`executable`] provides the `Executable` trait and a concrete
//!   `RealExecutable` that spawns OS processes, which tests can replace
//!   with a fake implementation.

pub mod executable;
pub mod execution;

pub use executable::{Executable, RealExecutable};
pub use execution::{Environment, Execution, SharedBuffer};
