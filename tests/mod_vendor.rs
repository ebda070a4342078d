// tests/mod_vendor.rs

use std::error::Error;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use regex::Regex;
use tempfile::TempDir;

use go_mod_vendor::clock::Clock;
use go_mod_vendor::emitter::Emitter;
use go_mod_vendor::errors::VendorError;
use go_mod_vendor::exec::{Execution, SharedBuffer};
use go_mod_vendor::fs::mock::MockFileSystem;
use go_mod_vendor::vendor::ModVendor;
use go_mod_vendor_test_utils::{FakeExecutable, fixed_step_clock, init_tracing};

type TestResult = Result<(), Box<dyn Error>>;

struct Harness {
    working_dir: TempDir,
    executable: FakeExecutable,
    logs: SharedBuffer,
    vendor: ModVendor,
}

impl Harness {
    fn new(executable: FakeExecutable) -> Self {
        Self::with_clock(executable, fixed_step_clock(Duration::from_secs(1)))
    }

    fn with_clock(executable: FakeExecutable, clock: Clock) -> Self {
        init_tracing();
        let logs = SharedBuffer::new();
        let vendor = ModVendor::new(
            Arc::new(executable.clone()),
            Arc::new(Emitter::new(logs.clone())),
            clock,
        );
        Self {
            working_dir: tempfile::tempdir().expect("creating working directory"),
            executable,
            logs,
            vendor,
        }
    }

    fn dir(&self) -> &Path {
        self.working_dir.path()
    }

    fn logs(&self) -> String {
        self.logs.to_string_lossy()
    }
}

fn writes_output(stdout: &'static str, stderr: &'static str) -> impl Fn(&mut Execution) -> go_mod_vendor::errors::Result<()> {
    move |execution| {
        writeln!(execution.stdout, "{stdout}")?;
        writeln!(execution.stderr, "{stderr}")?;
        Ok(())
    }
}

/// Inherited environment with `GOMODCACHE` replaced by `value` at the end.
fn expected_env(value: &str) -> Vec<(OsString, OsString)> {
    let mut env: Vec<(OsString, OsString)> = std::env::vars_os()
        .filter(|(key, _)| key != "GOMODCACHE")
        .collect();
    env.push(("GOMODCACHE".into(), value.into()));
    env
}

/// Position of each needle in `haystack`, failing if one is missing.
fn positions(haystack: &str, needles: &[&str]) -> Vec<usize> {
    needles
        .iter()
        .map(|needle| {
            haystack
                .find(needle)
                .unwrap_or_else(|| panic!("expected {needle:?} in logs:\n{haystack}"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// should_run
// ---------------------------------------------------------------------------

#[test]
fn should_run_is_false_when_vendor_directory_exists() -> TestResult {
    let harness = Harness::new(FakeExecutable::new());
    std::fs::create_dir(harness.dir().join("vendor"))?;

    let (ok, reason) = harness.vendor.should_run(harness.dir())?;
    assert!(!ok);
    assert_eq!(reason, "modules are already vendored");
    Ok(())
}

#[test]
fn should_run_is_true_when_vendor_directory_is_absent() -> TestResult {
    let harness = Harness::new(FakeExecutable::new());

    let (ok, reason) = harness.vendor.should_run(harness.dir())?;
    assert!(ok);
    assert_eq!(reason, "");
    Ok(())
}

#[test]
fn should_run_has_no_side_effects() -> TestResult {
    let harness = Harness::new(FakeExecutable::new());

    harness.vendor.should_run(harness.dir())?;
    assert_eq!(harness.executable.call_count(), 0);
    assert!(harness.logs.is_empty());
    assert!(!harness.dir().join("vendor").exists());
    Ok(())
}

#[test]
fn should_run_propagates_stat_failures() {
    let harness = Harness::new(FakeExecutable::new());
    let fs = MockFileSystem::new();
    fs.fail_with(harness.dir().join("vendor"), io::ErrorKind::PermissionDenied);
    let vendor = harness.vendor.clone().with_filesystem(Arc::new(fs));

    let err = vendor.should_run(harness.dir()).unwrap_err();
    match &err {
        VendorError::Io(io_err) => assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied),
        other => panic!("expected Io error, got {other:?}"),
    }
    assert!(err.to_string().contains("permission denied"), "got {err}");
}

#[cfg(unix)]
#[test]
fn should_run_fails_on_unreadable_working_directory() -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    let harness = Harness::new(FakeExecutable::new());
    std::fs::set_permissions(harness.dir(), std::fs::Permissions::from_mode(0o000))?;

    // Privileged users bypass permission bits; nothing to observe then.
    let privileged = std::fs::read_dir(harness.dir()).is_ok();
    let result = harness.vendor.should_run(harness.dir());
    std::fs::set_permissions(harness.dir(), std::fs::Permissions::from_mode(0o755))?;

    if !privileged {
        let err = result.expect_err("stat inside an unreadable directory should fail");
        assert!(err.to_string().to_lowercase().contains("permission denied"), "got {err}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// execute
// ---------------------------------------------------------------------------

#[test]
fn execute_runs_go_mod_vendor() -> TestResult {
    let harness = Harness::new(FakeExecutable::with_stub(writes_output(
        "stdout-output",
        "stderr-output",
    )));

    harness.vendor.execute("mod-cache-path", harness.dir())?;

    let received = harness.executable.last_received().expect("executable was not called");
    assert_eq!(received.args, vec!["mod", "vendor"]);
    assert_eq!(received.env, expected_env("mod-cache-path"));
    assert_eq!(received.dir, harness.dir());

    let logs = harness.logs();
    let order = positions(
        &logs,
        &[
            "  Executing build process",
            "    Running 'go mod vendor'",
            "      Completed in 1s",
        ],
    );
    assert!(order.windows(2).all(|w| w[0] < w[1]), "out of order:\n{logs}");
    assert!(logs.ends_with("Completed in 1s\n\n"), "missing break line:\n{logs}");
    Ok(())
}

#[test]
fn execute_does_not_log_output_on_success() -> TestResult {
    let harness = Harness::new(FakeExecutable::with_stub(writes_output(
        "stdout-output",
        "stderr-output",
    )));

    harness.vendor.execute("mod-cache-path", harness.dir())?;

    let logs = harness.logs();
    assert!(!logs.contains("stdout-output"), "{logs}");
    assert!(!logs.contains("stderr-output"), "{logs}");
    Ok(())
}

#[test]
fn execute_logs_output_and_returns_the_error_on_failure() {
    let harness = Harness::new(FakeExecutable::with_stub(|execution| {
        writeln!(execution.stdout, "build error stdout")?;
        writeln!(execution.stderr, "build error stderr")?;
        Err(anyhow!("executable failed").into())
    }));

    let err = harness
        .vendor
        .execute("mod-cache-path", harness.dir())
        .unwrap_err();
    assert_eq!(err.to_string(), "executable failed");
    assert!(matches!(err, VendorError::Other(_)));

    let logs = harness.logs();
    let order = positions(
        &logs,
        &[
            "  Executing build process",
            "    Running 'go mod vendor'",
            "      Failed after 1s",
            "        build error stdout",
            "        build error stderr",
        ],
    );
    assert!(order.windows(2).all(|w| w[0] < w[1]), "out of order:\n{logs}");
    assert!(!logs.contains("Completed in"), "{logs}");
}

#[test]
fn execute_returns_runner_errors_unchanged() {
    let harness = Harness::new(FakeExecutable::with_stub(|_| {
        Err(VendorError::ExitStatus {
            command: "go".to_string(),
            code: Some(1),
        })
    }));

    let err = harness.vendor.execute("cache", harness.dir()).unwrap_err();
    assert!(matches!(
        err,
        VendorError::ExitStatus {
            ref command,
            code: Some(1)
        } if command == "go"
    ));
}

#[test]
fn execute_replaces_an_inherited_module_cache() -> TestResult {
    let harness = Harness::new(FakeExecutable::new());

    harness.vendor.execute("/layers/mod-cache", harness.dir())?;

    let env = harness.executable.last_received().expect("called").env;
    let caches: Vec<_> = env.iter().filter(|(key, _)| key == "GOMODCACHE").collect();
    assert_eq!(caches.len(), 1);
    assert_eq!(caches[0].1, "/layers/mod-cache");
    Ok(())
}

#[test]
fn execute_runs_the_command_every_time() -> TestResult {
    let harness = Harness::with_clock(FakeExecutable::new(), Clock::system());

    harness.vendor.execute("cache", harness.dir())?;
    harness.vendor.execute("cache", harness.dir())?;

    assert_eq!(harness.executable.call_count(), 2);
    assert_eq!(harness.logs().matches("Executing build process").count(), 2);
    Ok(())
}

#[test]
fn execute_logs_durations_rounded_to_milliseconds() -> TestResult {
    let harness = Harness::with_clock(
        FakeExecutable::new(),
        fixed_step_clock(Duration::from_micros(1_234_567)),
    );

    harness.vendor.execute("cache", harness.dir())?;

    assert!(harness.logs().contains("      Completed in 1.235s\n"), "{}", harness.logs());
    Ok(())
}

#[test]
fn execute_logs_a_go_style_duration_with_the_system_clock() -> TestResult {
    let harness = Harness::with_clock(FakeExecutable::new(), Clock::system());

    harness.vendor.execute("cache", harness.dir())?;

    let line = Regex::new(r"      Completed in (0s|\d+ms|\d+(\.\d+)?s)\n")?;
    assert!(line.is_match(&harness.logs()), "{}", harness.logs());
    Ok(())
}
