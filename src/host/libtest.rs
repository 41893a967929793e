// libtest JSON decoder (`cargo test -- -Z unstable-options --format json`)
//
// * `{ "type": "suite", "event": "started", "test_count": N }`
// * `{ "type": "test", "event": "started", "name": "<name>" }`
// * `{ "type": "test", "event": "ok" | "failed" | "ignored", "name": "<name>", ... }`
//   - `failed` carries captured output in `stdout`, and `message` for
//     `should_panic` mismatches
//   - `ignored` carries the `#[ignore = "..."]` text in `message`
// * `{ "type": "suite", "event": "ok" | "failed", "passed": N, ... }`
//
// libtest prints one suite per test binary.

use serde::Deserialize;

use super::{EventDecoder, HostEvent};
use crate::error::Result;
use crate::state::{Outcome, OutcomeRecord};

/// Exit code libtest uses when any test failed
pub const ERROR_EXIT_CODE: i32 = 101;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Line {
    Suite {
        event: String,
    },
    Test {
        event: String,
        name: String,
        #[serde(default)]
        stdout: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
    #[serde(other)]
    Other,
}

/// Decoder for libtest JSON lines
#[derive(Debug, Default)]
pub struct LibtestDecoder {
    exit_status: Option<i32>,
}

impl LibtestDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_suite(&mut self, event: &str) {
        let status = match event {
            "ok" => 0,
            "failed" => ERROR_EXIT_CODE,
            _ => return,
        };
        self.exit_status = Some(self.exit_status.map_or(status, |s| s.max(status)));
    }
}

impl EventDecoder for LibtestDecoder {
    fn decode_line(&mut self, line: &str) -> Result<Option<HostEvent>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (event, name, stdout, message) = match serde_json::from_str::<Line>(line)? {
            Line::Test {
                event,
                name,
                stdout,
                message,
            } => (event, name, stdout, message),
            Line::Suite { event } => {
                self.record_suite(&event);
                return Ok(None);
            }
            Line::Other => return Ok(None),
        };

        let record = match event.as_str() {
            "ok" => OutcomeRecord::passed(name),
            "failed" => {
                let output: Vec<String> = [stdout, message]
                    .into_iter()
                    .flatten()
                    .filter(|text| !text.trim().is_empty())
                    .collect();
                let mut record = OutcomeRecord::call(name, Outcome::Failed);
                if !output.is_empty() {
                    record.longrepr = Some(output.join("\n"));
                }
                record
            }
            "ignored" => OutcomeRecord::skipped(name, message.filter(|m| !m.is_empty())),
            _ => return Ok(None),
        };

        Ok(Some(HostEvent::Test(record)))
    }

    fn exit_status(&self) -> Option<i32> {
        self.exit_status
    }
}
