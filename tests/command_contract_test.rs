mod common;

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn get_binary() -> String {
    env!("CARGO_BIN_EXE_mdreport").to_string()
}

/// Command isolated from any user configuration
fn mdreport(workdir: &Path) -> Command {
    let mut cmd = Command::new(get_binary());
    cmd.current_dir(workdir)
        .env("HOME", workdir)
        .env_remove("RUST_LOG");
    cmd
}

fn write_stream(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write stream");
    path.display().to_string()
}

fn render_stdin(dir: &TempDir, args: &[&str], input: &str) -> Output {
    let mut child = mdreport(dir.path())
        .arg("render")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute render command");

    child
        .stdin
        .take()
        .expect("stdin not piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    child.wait_with_output().expect("Failed to wait for render")
}

#[test]
fn test_render_pytest_log_file() {
    let dir = TempDir::new().unwrap();
    let log = write_stream(&dir, "report.jsonl", &common::pytest_example_log());

    let output = mdreport(dir.path())
        .args(["render", "--format", "pytest", log.as_str()])
        .output()
        .expect("Failed to execute render command");

    assert_eq!(String::from_utf8_lossy(&output.stdout), common::PYTEST_EXAMPLE_REPORT);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_render_quiet_from_stdin() {
    let dir = TempDir::new().unwrap();

    let output = render_stdin(&dir, &["--format", "libtest", "-q", "-"], &common::libtest_lines());

    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "**Summary:** 1/2 passed, 1 failed\n"
    );
    assert_eq!(output.status.code(), Some(101));
}

#[test]
fn test_render_quiet_with_rerun_cmd() {
    let dir = TempDir::new().unwrap();

    let output = render_stdin(
        &dir,
        &["--format", "libtest", "-q", "--markdown-rerun-cmd", "cargo test -- --exact tests::test_critical_path"],
        &common::libtest_lines(),
    );

    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "**Summary:** 1/2 passed, 1 failed\n\nRe-run failed: `cargo test -- --exact tests::test_critical_path`\n"
    );
}

#[test]
fn test_render_saves_identical_report_file() {
    let dir = TempDir::new().unwrap();
    let log = write_stream(&dir, "report.jsonl", &common::pytest_example_log());
    let report = dir.path().join("report.md");

    let output = mdreport(dir.path())
        .args(["render", log.as_str(), "--markdown-report"])
        .arg(&report)
        .output()
        .expect("Failed to execute render command");

    let saved = std::fs::read_to_string(&report).expect("Report file missing");
    assert_eq!(saved, String::from_utf8_lossy(&output.stdout));
    assert_eq!(saved, common::PYTEST_EXAMPLE_REPORT);
}

#[test]
fn test_render_report_file_failure_is_a_warning() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("missing").join("report.md");
    let stream = r#"{ "type": "test", "name": "tests::works", "event": "ok" }
{ "type": "suite", "event": "ok", "passed": 1, "failed": 0 }"#;

    let report = report.display().to_string();
    let output = render_stdin(
        &dir,
        &["--format", "libtest", "--markdown-report", report.as_str()],
        stream,
    );

    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "# Test Report\n\n**Summary:** 1/1 passed\n"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARN"));
    assert!(stderr.contains("failed to write report"));
    assert!(output.status.success());
}

#[test]
fn test_render_unknown_format_fails() {
    let dir = TempDir::new().unwrap();

    let output = render_stdin(&dir, &["--format", "junit"], "");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown host format 'junit'"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_config_file_sets_format_and_verbosity() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".mdreportrc"),
        "[report]\nverbosity = -1\n\n[run]\nformat = \"libtest\"\n",
    )
    .unwrap();

    let output = render_stdin(&dir, &[], &common::libtest_lines());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "**Summary:** 1/2 passed, 1 failed\n"
    );

    // Command-line verbosity wins over the file
    let output = render_stdin(&dir, &["-v"], &common::libtest_lines());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("# Test Report\n"));
}

#[test]
fn test_init_config_writes_loadable_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mdreport.toml");

    let output = mdreport(dir.path())
        .arg("--init-config")
        .arg(&path)
        .output()
        .expect("Failed to execute init-config");

    assert!(output.status.success());
    let config = mdreport::config::Config::load_from_file(&path).expect("Invalid config written");
    assert_eq!(config.run.format, "pytest");
}

#[cfg(unix)]
#[test]
fn test_run_suppresses_host_output_and_keeps_exit_code() {
    let dir = TempDir::new().unwrap();
    let script = format!(
        "echo 'Compiling demo v0.1.0'; echo 'host noise' >&2; cat <<'EOS'\n{}\nEOS\nexit 101",
        common::libtest_lines()
    );

    let output = mdreport(dir.path())
        .args(["run", "--format", "libtest", "--", "sh", "-c", script.as_str()])
        .output()
        .expect("Failed to execute run command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "# Test Report\n\n**Summary:** 1/2 passed, 1 failed\n\n## Failures\n\n\
         ### tests::test_critical_path FAILED\n\n```\nAssertionError: boom\n```\n"
    );
    assert!(!String::from_utf8_lossy(&output.stderr).contains("host noise"));
    assert_eq!(output.status.code(), Some(101));
}

#[cfg(unix)]
#[test]
fn test_run_startup_failure_becomes_collection_error() {
    let dir = TempDir::new().unwrap();

    let output = mdreport(dir.path())
        .args([
            "run",
            "--format",
            "libtest",
            "--",
            "sh",
            "-c",
            "echo 'error[E0425]: cannot find value `x`' >&2; exit 3",
        ])
        .output()
        .expect("Failed to execute run command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# Collection Errors\n\n**1 collection error**\n\n### sh -c "));
    assert!(stdout.contains("```\nerror[E0425]: cannot find value `x`\n```\n"));
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_run_missing_program_fails() {
    let dir = TempDir::new().unwrap();

    let output = mdreport(dir.path())
        .args(["run", "--format", "libtest", "--", "mdreport-no-such-host-binary"])
        .output()
        .expect("Failed to execute run command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to start host command"));
}

#[cfg(unix)]
#[test]
fn test_run_survives_invalid_utf8_host_output() {
    let dir = TempDir::new().unwrap();
    let script = format!(
        "printf 'noise \\377\\n' >&2; printf 'binary \\377 fixture\\n'; cat <<'EOS'\n{}\nEOS\nexit 101",
        common::libtest_lines()
    );

    let output = mdreport(dir.path())
        .args(["run", "--format", "libtest", "--", "sh", "-c", script.as_str()])
        .output()
        .expect("Failed to execute run command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# Test Report\n\n**Summary:** 1/2 passed, 1 failed\n"));
    assert!(!stdout.contains("fixture"));
    assert_eq!(output.status.code(), Some(101));
}

#[cfg(unix)]
#[test]
fn test_run_interrupt_prints_partial_report() {
    use std::time::{Duration, Instant};

    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("started");
    let script = format!(
        "echo '{{ \"type\": \"test\", \"name\": \"tests::test_simple\", \"event\": \"ok\" }}'; touch '{}'; exec sleep 30",
        marker.display()
    );

    let child = mdreport(dir.path())
        .args(["run", "--format", "libtest", "--", "sh", "-c", script.as_str()])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute run command");

    let deadline = Instant::now() + Duration::from_secs(10);
    while !marker.exists() {
        assert!(Instant::now() < deadline, "host command never started");
        std::thread::sleep(Duration::from_millis(20));
    }
    std::thread::sleep(Duration::from_millis(200));

    let status = Command::new("kill")
        .args(["-INT", child.id().to_string().as_str()])
        .status()
        .expect("Failed to send SIGINT");
    assert!(status.success());

    let output = child.wait_with_output().expect("Failed to wait for run");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "# Test Report\n\n**Summary:** 1/1 passed\n"
    );
    assert_eq!(output.status.code(), Some(130));
}
