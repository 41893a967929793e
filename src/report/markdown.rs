// Markdown reporter - collects outcomes during a run and prints the report

use anyhow::{Context, Result};
use tracing::debug;

use super::{Reporter, Sink, render, sink};
use crate::config::ReportConfig;
use crate::output::{self, OutputSuppressor};
use crate::state::{
    Classified, CollectReport, CollectionErrorRecord, Outcome, OutcomeRecord, Phase,
};

/// Collects one run's outcomes and renders them as Markdown at the end.
///
/// Host output is suppressed from `on_run_start` until `on_run_end`; dropping
/// the reporter also restores the output bindings.
pub struct MarkdownReporter {
    config: ReportConfig,
    reports: Vec<OutcomeRecord>,
    collection_errors: Vec<CollectionErrorRecord>,
    suppressor: OutputSuppressor,
}

impl MarkdownReporter {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            reports: Vec::new(),
            collection_errors: Vec::new(),
            suppressor: OutputSuppressor::new(),
        }
    }

    /// Restore output, classify and render. Consumes the collected records.
    pub fn finish(&mut self) -> String {
        self.suppressor.end();

        let reports = std::mem::take(&mut self.reports);
        let errors = std::mem::take(&mut self.collection_errors);
        let classified = Classified::classify(reports, errors);

        debug!(
            "Rendering report: {} passed, {} failed, {} skipped, {} xfail, {} xpass, {} collection errors",
            classified.passed.len(),
            classified.failed.len(),
            classified.skipped.len(),
            classified.xfailed.len(),
            classified.xpassed.len(),
            classified.collection_errors.len()
        );

        sink::finalize(render(&classified, &self.config))
    }
}

/// Only the call phase counts, plus setup when the test was skipped there
fn is_terminal(record: &OutcomeRecord) -> bool {
    match record.phase {
        Phase::Call => true,
        Phase::Setup => record.outcome == Outcome::Skipped,
        Phase::Teardown => false,
    }
}

impl Reporter for MarkdownReporter {
    fn on_run_start(&mut self) {
        self.suppressor.begin();
    }

    fn on_collection_result(&mut self, report: CollectReport) {
        if report.outcome == Outcome::Failed {
            debug!(
                "Collection error in {}",
                report.node_id.as_deref().unwrap_or("<unknown>")
            );
            self.collection_errors.push(report.into());
        }
    }

    fn on_test_outcome(&mut self, record: OutcomeRecord) {
        if is_terminal(&record) {
            self.reports.push(record);
        }
    }

    fn on_run_end(&mut self) -> Result<()> {
        let text = self.finish();
        Sink::new(self.config.report_path.clone())
            .emit(&text, &mut output::stdout())
            .context("Failed to write report to stdout")?;
        Ok(())
    }
}
