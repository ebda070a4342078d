use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use go_mod_vendor::errors::Result;
use go_mod_vendor::exec::{Executable, Execution};

/// The parts of an [`Execution`] worth asserting on after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedExecution {
    pub args: Vec<String>,
    pub env: Vec<(OsString, OsString)>,
    pub dir: PathBuf,
}

type Stub = dyn Fn(&mut Execution) -> Result<()> + Send + Sync;

/// A fake executable that:
/// - records every execution it receives
/// - runs a stub against it (writing output, choosing success or failure).
#[derive(Clone)]
pub struct FakeExecutable {
    received: Arc<Mutex<Vec<ReceivedExecution>>>,
    stub: Arc<Stub>,
}

impl FakeExecutable {
    /// Succeeds without writing anything.
    pub fn new() -> Self {
        Self::with_stub(|_| Ok(()))
    }

    pub fn with_stub(stub: impl Fn(&mut Execution) -> Result<()> + Send + Sync + 'static) -> Self {
        Self {
            received: Arc::new(Mutex::new(Vec::new())),
            stub: Arc::new(stub),
        }
    }

    pub fn call_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    /// The most recent execution, if any.
    pub fn last_received(&self) -> Option<ReceivedExecution> {
        self.received.lock().unwrap().last().cloned()
    }
}

impl Default for FakeExecutable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FakeExecutable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeExecutable")
            .field("calls", &self.call_count())
            .finish_non_exhaustive()
    }
}

impl Executable for FakeExecutable {
    fn execute(&self, mut execution: Execution) -> Result<()> {
        self.received.lock().unwrap().push(ReceivedExecution {
            args: execution.args.clone(),
            env: execution.env.clone(),
            dir: execution.dir.clone(),
        });
        (self.stub)(&mut execution)
    }
}
