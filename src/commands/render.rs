// Render command - build a report from a recorded event stream

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use tracing::{debug, warn};

use super::resolve_format;
use crate::cli::args::RenderArgs;
use crate::config::{Config, ReportConfig};
use crate::host::{self, HostFormat};
use crate::report::{MarkdownReporter, Reporter};

/// Returns the exit status recorded in the stream, or 0
pub fn handle_render(args: &RenderArgs, file_config: Option<&Config>) -> Result<i32> {
    let format = resolve_format(args.format.as_deref(), file_config)?;
    let config = ReportConfig::resolve(&args.report, format, file_config);
    let mut reporter = MarkdownReporter::new(config);

    match args.input_path() {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event stream {}", path.display()))?;
            render_stream(BufReader::new(file), format, &mut reporter)
        }
        None => render_stream(io::stdin().lock(), format, &mut reporter),
    }
}

/// Feed every line of `reader` to `reporter` as one complete run
pub fn render_stream(
    reader: impl BufRead,
    format: HostFormat,
    reporter: &mut dyn Reporter,
) -> Result<i32> {
    let mut decoder = format.decoder();
    reporter.on_run_start();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read event stream")?;
        if let Err(e) = host::feed_line(decoder.as_mut(), reporter, &line) {
            match format {
                HostFormat::Pytest => warn!("Skipping line {}: {}", index + 1, e),
                HostFormat::Libtest => debug!("Skipping non-event line {}: {}", index + 1, e),
            }
        }
    }

    reporter.on_run_end()?;
    Ok(decoder.exit_status().unwrap_or(0))
}
