pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod execution;
pub mod host;
pub mod logging;
pub mod output;
pub mod report;
pub mod state;

pub use error::{ReportError, Result};
pub use report::{MarkdownReporter, Reporter};
