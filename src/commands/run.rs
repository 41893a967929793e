// Run command - execute the host test command under the Markdown reporter

use anyhow::Result;
use tracing::info;

use super::resolve_format;
use crate::cli::args::RunArgs;
use crate::config::{Config, ReportConfig};
use crate::execution::HostRunner;
use crate::report::{MarkdownReporter, Reporter};

/// Returns the host's own exit code
pub async fn handle_run(args: &RunArgs, file_config: Option<&Config>) -> Result<i32> {
    let format = resolve_format(args.format.as_deref(), file_config)?;
    let config = ReportConfig::resolve(&args.report, format, file_config);
    info!("Host format: {}", format);

    let runner = HostRunner::new(format, args.command.clone());
    let mut reporter = MarkdownReporter::new(config);

    reporter.on_run_start();
    let outcome = runner.run(&mut reporter).await?;
    reporter.on_run_end()?;

    if outcome.interrupted {
        info!("Run interrupted after {} event(s)", outcome.events);
    }

    Ok(outcome.exit_code)
}
