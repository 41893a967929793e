// pytest `--report-log` decoder
//
// Each line is one serialized report object tagged with `$report_type`.
// `longrepr` comes in several shapes: null, a plain string, a
// `[path, lineno, message]` triple for skips, or a serialized exception
// representation object.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::{EventDecoder, HostEvent};
use crate::error::Result;
use crate::state::{CollectReport, Outcome, OutcomeRecord, Phase, XfailMarker};

#[derive(Debug, Deserialize)]
#[serde(tag = "$report_type")]
enum Entry {
    TestReport(TestEntry),
    CollectReport(CollectEntry),
    SessionFinish {
        #[serde(default)]
        exitstatus: Option<i32>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TestEntry {
    nodeid: String,
    when: Phase,
    outcome: Outcome,
    #[serde(default)]
    longrepr: Value,
    #[serde(default)]
    wasxfail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CollectEntry {
    #[serde(default)]
    nodeid: String,
    outcome: Outcome,
    #[serde(default)]
    longrepr: Value,
    #[serde(default)]
    fspath: Option<String>,
}

/// Decoder for pytest report-log lines
#[derive(Debug, Default)]
pub struct ReportLogDecoder {
    exit_status: Option<i32>,
}

impl ReportLogDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventDecoder for ReportLogDecoder {
    fn decode_line(&mut self, line: &str) -> Result<Option<HostEvent>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let event = match serde_json::from_str::<Entry>(line)? {
            Entry::TestReport(entry) => {
                let skip_reason = match entry.outcome {
                    Outcome::Skipped => skip_reason(&entry.longrepr),
                    _ => None,
                };
                Some(HostEvent::Test(OutcomeRecord {
                    test_id: entry.nodeid,
                    phase: entry.when,
                    outcome: entry.outcome,
                    xfail: entry.wasxfail.map(XfailMarker::new),
                    longrepr: longrepr_text(&entry.longrepr),
                    skip_reason,
                }))
            }
            Entry::CollectReport(entry) => Some(HostEvent::Collection(CollectReport {
                node_id: Some(entry.nodeid).filter(|id| !id.is_empty()),
                fs_path: entry.fspath,
                outcome: entry.outcome,
                longrepr: longrepr_text(&entry.longrepr),
            })),
            Entry::SessionFinish { exitstatus } => {
                debug!("Host session finished with status {:?}", exitstatus);
                self.exit_status = exitstatus;
                None
            }
            Entry::Other => None,
        };

        Ok(event)
    }

    fn exit_status(&self) -> Option<i32> {
        self.exit_status
    }
}

/// Skip reason: third element of a `[path, lineno, message]` triple,
/// or the representation itself
pub fn skip_reason(longrepr: &Value) -> Option<String> {
    match longrepr {
        Value::Array(items) if items.len() == 3 => Some(value_text(&items[2])),
        Value::Null | Value::Array(_) => None,
        other => longrepr_text(other),
    }
}

/// Traceback text of a report, `None` when there is nothing to show
pub fn longrepr_text(longrepr: &Value) -> Option<String> {
    let text = match longrepr {
        Value::Null | Value::Array(_) => return None,
        Value::String(text) => text.clone(),
        Value::Object(map) => exception_text(map)?,
        other => other.to_string(),
    };

    Some(text).filter(|t| !t.is_empty())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn exception_text(map: &Map<String, Value>) -> Option<String> {
    let mut lines = Vec::new();

    match map.get("chain").and_then(Value::as_array) {
        Some(chain) if !chain.is_empty() => {
            for link in chain {
                let Some(parts) = link.as_array() else {
                    continue;
                };
                if let Some(traceback) = parts.first() {
                    push_traceback(traceback, &mut lines);
                }
                if let Some(description) = parts.get(2).and_then(Value::as_str) {
                    lines.push(String::new());
                    lines.push(description.to_string());
                    lines.push(String::new());
                }
            }
        }
        _ => {
            if let Some(traceback) = map.get("reprtraceback") {
                push_traceback(traceback, &mut lines);
            }
        }
    }

    if lines.is_empty() {
        return map
            .get("reprcrash")
            .and_then(|crash| crash.get("message"))
            .and_then(Value::as_str)
            .map(String::from);
    }

    Some(lines.join("\n"))
}

fn push_traceback(traceback: &Value, lines: &mut Vec<String>) {
    let Some(entries) = traceback.get("reprentries").and_then(Value::as_array) else {
        return;
    };

    for entry in entries {
        let Some(data) = entry.get("data") else {
            continue;
        };
        let entry_lines = data
            .get("lines")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(value_text).collect::<Vec<_>>())
            .unwrap_or_default();
        let location = data.get("reprfileloc").and_then(file_location);
        let short = data.get("style").and_then(Value::as_str) == Some("short");

        if short {
            lines.extend(location.clone());
            lines.extend(entry_lines);
        } else {
            lines.extend(entry_lines);
            lines.extend(location);
        }
    }
}

fn file_location(loc: &Value) -> Option<String> {
    let path = loc.get("path").and_then(Value::as_str)?;
    let lineno = loc.get("lineno").and_then(Value::as_i64).unwrap_or_default();
    let message = loc.get("message").and_then(Value::as_str).unwrap_or_default();
    Some(format!("{}:{}: {}", path, lineno, message))
}
