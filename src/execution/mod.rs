// Execution module

pub mod runner;

pub use runner::{HostRunner, INTERRUPTED_EXIT_CODE, RunOutcome};
