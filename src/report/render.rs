// Markdown rendering of classified results
//
// Every function here is pure: classified results and a `ReportConfig` in,
// report lines out. Blank lines are explicit empty strings.

use super::escape::escape_markdown;
use crate::config::ReportConfig;
use crate::state::{Classified, CollectionErrorRecord, Counts, OutcomeRecord};

/// Build the report lines, picking one of the report shapes
pub fn render(results: &Classified, config: &ReportConfig) -> Vec<String> {
    if !results.collection_errors.is_empty() {
        return collection_errors(&results.collection_errors, config);
    }

    if config.quiet {
        return quiet(results.counts(), config);
    }

    let mut lines = vec![
        "# Test Report".to_string(),
        String::new(),
        summary_line(results.counts()),
        String::new(),
    ];

    if results.has_failures() {
        lines.extend(failures(results, config));
    }

    if config.verbosity > 0 {
        lines.extend(passes(&results.passed));
    }

    lines
}

/// `**Summary:** P/T passed[, F failed][, S skipped][, X xfail]`
pub fn summary_line(counts: Counts) -> String {
    let mut parts = vec![format!("{}/{} passed", counts.passed, counts.total())];
    if counts.failed > 0 {
        parts.push(format!("{} failed", counts.failed));
    }
    if counts.skipped > 0 {
        parts.push(format!("{} skipped", counts.skipped));
    }
    if counts.xfailed > 0 {
        parts.push(format!("{} xfail", counts.xfailed));
    }

    format!("**Summary:** {}", parts.join(", "))
}

fn collection_errors(errors: &[CollectionErrorRecord], config: &ReportConfig) -> Vec<String> {
    let count = errors.len();
    let noun = if count == 1 { "error" } else { "errors" };

    let mut lines = vec![
        "# Collection Errors".to_string(),
        String::new(),
        format!("**{} collection {}**", count, noun),
        String::new(),
    ];

    for error in errors {
        lines.push(format!("### {}", error.label()));
        lines.push(String::new());
        push_code_block(&mut lines, error.longrepr.as_deref(), config);
    }

    lines
}

fn quiet(counts: Counts, config: &ReportConfig) -> Vec<String> {
    let mut lines = vec![summary_line(counts)];

    if !config.rerun_cmd.is_empty() && counts.failed > 0 {
        lines.push(String::new());
        lines.push(format!("Re-run failed: `{}`", config.rerun_cmd));
    }

    lines
}

fn failures(results: &Classified, config: &ReportConfig) -> Vec<String> {
    let mut lines = vec!["## Failures".to_string(), String::new()];

    for record in &results.failed {
        lines.extend(failed(record, config));
    }

    if config.show_xpass {
        for record in &results.xpassed {
            lines.extend(xpassed(record));
        }
    }

    for record in &results.skipped {
        lines.extend(skipped(record));
    }

    for record in &results.xfailed {
        lines.extend(xfailed(record, config));
    }

    lines
}

fn failed(record: &OutcomeRecord, config: &ReportConfig) -> Vec<String> {
    let mut lines = vec![format!("### {} FAILED", record.test_id), String::new()];
    push_code_block(&mut lines, record.longrepr.as_deref(), config);
    lines
}

fn xpassed(record: &OutcomeRecord) -> Vec<String> {
    vec![
        format!("### {} XPASS", record.test_id),
        String::new(),
        "**Unexpected pass** (expected to fail)".to_string(),
        String::new(),
    ]
}

fn skipped(record: &OutcomeRecord) -> Vec<String> {
    let mut lines = vec![format!("### {} SKIPPED", record.test_id), String::new()];

    if let Some(reason) = &record.skip_reason {
        let reason = reason.strip_prefix("Skipped: ").unwrap_or(reason);
        lines.push(format!("**Reason:** {}", escape_markdown(reason)));
        lines.push(String::new());
    }

    lines
}

fn xfailed(record: &OutcomeRecord, config: &ReportConfig) -> Vec<String> {
    let mut lines = vec![format!("### {} XFAIL", record.test_id), String::new()];

    if let Some(marker) = record.xfail.as_ref().filter(|m| !m.reason.is_empty()) {
        lines.push(format!("**Reason:** {}", escape_markdown(&marker.reason)));
        lines.push(String::new());
    }

    push_code_block(&mut lines, record.longrepr.as_deref(), config);
    lines
}

fn passes(passed: &[OutcomeRecord]) -> Vec<String> {
    if passed.is_empty() {
        return Vec::new();
    }

    let mut lines = vec!["## Passes".to_string(), String::new()];
    lines.extend(passed.iter().map(|record| format!("- {}", record.test_id)));
    lines.push(String::new());
    lines
}

/// Fenced block with the trimmed text, followed by a blank line.
/// Missing or empty text renders nothing.
fn push_code_block(lines: &mut Vec<String>, text: Option<&str>, config: &ReportConfig) {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return;
    };

    lines.push(format!("```{}", config.fence_lang.as_deref().unwrap_or("")));
    lines.push(text.trim().to_string());
    lines.push("```".to_string());
    lines.push(String::new());
}
