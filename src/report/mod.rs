// Report module - outcome collection and Markdown output

pub mod escape;
pub mod markdown;
pub mod render;
pub mod sink;

use crate::state::{CollectReport, OutcomeRecord};
use anyhow::Result;
pub use escape::escape_markdown;
pub use markdown::MarkdownReporter;
pub use render::{render, summary_line};
pub use sink::Sink;

/// Observer of a single test run
pub trait Reporter {
    /// Called once before the host produces any output
    fn on_run_start(&mut self) {}

    /// Called for every collect-phase report
    fn on_collection_result(&mut self, report: CollectReport);

    /// Called for every test phase report
    fn on_test_outcome(&mut self, record: OutcomeRecord);

    /// Called when the entire run finishes
    fn on_run_end(&mut self) -> Result<()>;
}
