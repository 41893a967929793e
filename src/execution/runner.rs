// Host runner - spawns the host test command and feeds its events to a reporter

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};

use crate::host::{self, EventDecoder, HostFormat};
use crate::output;
use crate::report::Reporter;
use crate::state::{CollectReport, Outcome};

/// Exit code reported when the run is interrupted with Ctrl-C
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Lines of host stderr kept for startup failure reports
const STDERR_TAIL_LINES: usize = 200;

/// Result of one host run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub events: usize,
    pub interrupted: bool,
}

/// One line of host output, tagged with the pipe it came from
#[derive(Debug, Clone, PartialEq, Eq)]
enum HostLine {
    Stdout(String),
    Stderr(String),
}

/// Runs a host test command
pub struct HostRunner {
    format: HostFormat,
    command: Vec<String>,
}

impl HostRunner {
    pub fn new(format: HostFormat, command: Vec<String>) -> Self {
        Self { format, command }
    }

    /// Full host command line, including the arguments this runner adds
    pub fn host_args(&self, report_log: Option<&Path>) -> Vec<String> {
        let mut args = self.command.clone();

        if self.format == HostFormat::Pytest {
            if !args.iter().skip(1).any(|arg| arg.starts_with("--tb")) {
                args.push("--tb=short".to_string());
            }
            if let Some(path) = report_log {
                args.push(format!("--report-log={}", path.display()));
            }
        }

        args
    }

    /// Run the host to completion, delivering every event to `reporter`.
    /// The caller brackets the run with `on_run_start` / `on_run_end`.
    pub async fn run(&self, reporter: &mut dyn Reporter) -> Result<RunOutcome> {
        let report_log = match self.format {
            HostFormat::Pytest => Some(
                tempfile::Builder::new()
                    .prefix("mdreport-")
                    .suffix(".jsonl")
                    .tempfile()
                    .context("Failed to create report-log file")?,
            ),
            HostFormat::Libtest => None,
        };

        let args = self.host_args(report_log.as_ref().map(|f| f.path()));
        let (program, program_args) = args.split_first().context("Empty host command")?;
        info!("Running host command: {}", args.join(" "));

        let mut child = Command::new(program)
            .args(program_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start host command '{}'", program))?;

        let stdout = child.stdout.take().context("Host stdout not captured")?;
        let stderr = child.stderr.take().context("Host stderr not captured")?;
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_reader(stdout, tx.clone(), HostLine::Stdout);
        spawn_reader(stderr, tx, HostLine::Stderr);

        let mut decoder = self.format.decoder();
        let mut stderr_tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
        let mut events = 0usize;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let interrupted = loop {
            tokio::select! {
                line = rx.recv() => match line {
                    Some(HostLine::Stdout(line)) => {
                        if self.handle_stdout_line(decoder.as_mut(), reporter, &line) {
                            events += 1;
                        }
                    }
                    Some(HostLine::Stderr(line)) => {
                        forward(&mut output::stderr(), &line);
                        if stderr_tail.len() == STDERR_TAIL_LINES {
                            stderr_tail.pop_front();
                        }
                        stderr_tail.push_back(line);
                    }
                    None => break false,
                },
                _ = &mut ctrl_c => {
                    warn!("Interrupted, stopping host command");
                    if let Err(e) = child.start_kill() {
                        debug!("Failed to kill host command: {}", e);
                    }
                    break true;
                }
            }
        };

        let status = child.wait().await.context("Failed to wait for host command")?;
        let exit_code = if interrupted {
            INTERRUPTED_EXIT_CODE
        } else {
            status.code().unwrap_or(1)
        };
        debug!("Host command exited with {}", exit_code);

        if let Some(file) = &report_log {
            events += read_report_log(file.path(), decoder.as_mut(), reporter).await?;
        }

        if events == 0 && exit_code != 0 && !interrupted {
            warn!("Host command failed before reporting any test");
            let stderr_text = Vec::from(stderr_tail).join("\n");
            reporter.on_collection_result(CollectReport {
                node_id: Some(self.command.join(" ")),
                fs_path: None,
                outcome: Outcome::Failed,
                longrepr: Some(stderr_text).filter(|text| !text.trim().is_empty()),
            });
        }

        Ok(RunOutcome {
            exit_code,
            events,
            interrupted,
        })
    }

    /// Returns true when the line carried an event
    fn handle_stdout_line(
        &self,
        decoder: &mut dyn EventDecoder,
        reporter: &mut dyn Reporter,
        line: &str,
    ) -> bool {
        if self.format == HostFormat::Libtest {
            match host::feed_line(decoder, reporter, line) {
                Ok(delivered) => return delivered,
                Err(e) => debug!("Non-event host output: {}", e),
            }
        }

        forward(&mut output::stdout(), line);
        false
    }
}

/// Forward every line of `pipe` to `tx` until EOF.
/// Invalid UTF-8 is replaced, and a read error only ends this pipe.
fn spawn_reader<R>(pipe: R, tx: UnboundedSender<HostLine>, tag: fn(String) -> HostLine)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    if tx.send(tag(line)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!("Stopped reading host output: {}", e);
                    break;
                }
            }
        }
    });
}

/// Host output goes to the process bindings, which are suppressed during a run
fn forward(stream: &mut output::Stream, line: &str) {
    let _ = writeln!(stream, "{}", line);
}

async fn read_report_log(
    path: &Path,
    decoder: &mut dyn EventDecoder,
    reporter: &mut dyn Reporter,
) -> Result<usize> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read report log {}", path.display()))?;

    let mut events = 0;
    for (index, line) in content.lines().enumerate() {
        match host::feed_line(decoder, reporter, line) {
            Ok(true) => events += 1,
            Ok(false) => {}
            Err(e) => warn!("Skipping report-log line {}: {}", index + 1, e),
        }
    }

    Ok(events)
}
