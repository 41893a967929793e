// Host adapters - turn a host framework's event stream into outcome records

pub mod libtest;
pub mod reportlog;

pub use libtest::LibtestDecoder;
pub use reportlog::ReportLogDecoder;

use crate::error::{ReportError, Result};
use crate::report::Reporter;
use crate::state::{CollectReport, OutcomeRecord};
use std::fmt;

/// One observation delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Collection(CollectReport),
    Test(OutcomeRecord),
}

/// Decodes one line of a host event stream
pub trait EventDecoder {
    /// `Ok(None)` for well-formed lines that carry no outcome
    fn decode_line(&mut self, line: &str) -> Result<Option<HostEvent>>;

    /// Exit status the host recorded in its stream, if any
    fn exit_status(&self) -> Option<i32>;
}

/// Supported host event formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFormat {
    /// pytest `--report-log` JSON lines
    Pytest,
    /// libtest `--format json` lines
    Libtest,
}

impl HostFormat {
    pub fn decoder(&self) -> Box<dyn EventDecoder> {
        match self {
            HostFormat::Pytest => Box::new(ReportLogDecoder::new()),
            HostFormat::Libtest => Box::new(LibtestDecoder::new()),
        }
    }

    pub fn default_rerun_cmd(&self) -> &'static str {
        match self {
            HostFormat::Pytest => "pytest --lf",
            HostFormat::Libtest => "",
        }
    }

    pub fn default_fence_lang(&self) -> Option<&'static str> {
        match self {
            HostFormat::Pytest => Some("python"),
            HostFormat::Libtest => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HostFormat::Pytest => "pytest",
            HostFormat::Libtest => "libtest",
        }
    }
}

impl std::str::FromStr for HostFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pytest" | "reportlog" => Ok(Self::Pytest),
            "libtest" | "cargo" => Ok(Self::Libtest),
            _ => Err(ReportError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for HostFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route an event to the matching reporter callback
pub fn dispatch(reporter: &mut dyn Reporter, event: HostEvent) {
    match event {
        HostEvent::Collection(report) => reporter.on_collection_result(report),
        HostEvent::Test(record) => reporter.on_test_outcome(record),
    }
}

/// Decode a line and dispatch it. Returns whether an event was delivered.
pub fn feed_line(
    decoder: &mut dyn EventDecoder,
    reporter: &mut dyn Reporter,
    line: &str,
) -> Result<bool> {
    match decoder.decode_line(line)? {
        Some(event) => {
            dispatch(reporter, event);
            Ok(true)
        }
        None => Ok(false),
    }
}
