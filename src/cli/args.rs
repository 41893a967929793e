// CLI argument definitions using Clap

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Token-efficient Markdown test reports for LLM agents
#[derive(Parser, Debug)]
#[command(name = "mdreport")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Run a test suite and print a compact Markdown report instead of its native output",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging for mdreport itself
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Print shell completion script (bash, zsh, fish, elvish, powershell)
    #[arg(long, value_name = "SHELL_TYPE", value_parser = ["bash", "zsh", "fish", "elvish", "powershell"])]
    pub completion: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a host test command and report its results
    Run(RunArgs),

    /// Render a report from a recorded event stream
    Render(RenderArgs),
}

/// Options shared by every command that produces a report
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Also save the Markdown report to this file
    #[arg(long, value_name = "PATH")]
    pub markdown_report: Option<PathBuf>,

    /// Command to suggest for rerunning failed tests (empty to disable)
    #[arg(long, value_name = "CMD")]
    pub markdown_rerun_cmd: Option<String>,

    /// Increase verbosity (list passing tests)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Decrease verbosity (summary line only)
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Language label for fenced tracebacks (empty for none)
    #[arg(long, value_name = "LANG")]
    pub fence_lang: Option<String>,

    /// Render unexpected passes in the failures section
    #[arg(long, default_value_t = false)]
    pub show_xpass: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Host event format (pytest, libtest)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Host test command, e.g. `-- pytest tests/`
    #[arg(required = true, last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Host event format (pytest, libtest)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Recorded event stream (stdin when omitted or `-`)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,
}

impl RenderArgs {
    /// Input file, `None` meaning stdin
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}
