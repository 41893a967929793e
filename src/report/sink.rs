// Report sink - stdout plus optional file copy

use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::ReportError;

/// Join report lines into the final document.
/// A single trailing blank line is dropped and exactly one newline appended.
pub fn finalize(mut lines: Vec<String>) -> String {
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Writes the finished report
#[derive(Debug, Clone, Default)]
pub struct Sink {
    report_path: Option<PathBuf>,
}

impl Sink {
    pub fn new(report_path: Option<PathBuf>) -> Self {
        Self { report_path }
    }

    /// Write `text` to `out`, then to the report file if one is configured.
    /// A failed file write is logged and returned, never propagated as an error:
    /// the report has already reached `out` by then.
    pub fn emit(&self, text: &str, out: &mut impl Write) -> std::io::Result<Option<ReportError>> {
        out.write_all(text.as_bytes())?;
        out.flush()?;

        let Some(path) = &self.report_path else {
            return Ok(None);
        };

        match std::fs::write(path, text) {
            Ok(()) => {
                debug!("Markdown report saved to {}", path.display());
                Ok(None)
            }
            Err(source) => {
                let error = ReportError::ReportWrite {
                    path: path.clone(),
                    source,
                };
                warn!("{}", error);
                Ok(Some(error))
            }
        }
    }
}
