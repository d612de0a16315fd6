//! Indentation Report
//!
//! Report types handed to the host lint-runner, and the engine entry points
//! that produce them. The host filters items through `retain` (suppression
//! directives live outside this crate) and applies fixes with `apply_edits`.

use log::{debug, warn};
use serde::Serialize;

use crate::config::{ConfigError, IndentConfig, IndentOptions, IndentUnit};
use crate::engine::fixes::{edit_for, mismatch_for, Mismatch, TextEdit};
use crate::engine::resolver::Resolver;
use crate::engine::visitors::build_graph;
use crate::error::EngineError;
use crate::syntax::{Document, TokenStream};

/// What a report item describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// A line whose indentation differs from the expected one
    Mismatch,
    /// A document-scope configuration problem; the pass produced no line items
    Config,
}

/// One reportable finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportItem {
    pub kind: ReportKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// Present for mismatches, absent for configuration problems
    pub fix: Option<TextEdit>,
}

/// All findings of one analysis pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndentReport {
    pub items: Vec<ReportItem>,
}

impl IndentReport {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Keep only the items the predicate accepts. This is the suppression
    /// boundary: a host drops items whose location a directive covers.
    pub fn retain<F>(&mut self, predicate: F)
    where
        F: FnMut(&ReportItem) -> bool,
    {
        self.items.retain(predicate);
    }

    /// The edits of all remaining fixable items.
    pub fn fixes(&self) -> Vec<TextEdit> {
        self.items
            .iter()
            .filter_map(|item| item.fix.clone())
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.items.is_empty()
    }
}

/// Check a parsed document against validated options.
pub fn check_document(
    doc: &Document,
    stream: &TokenStream<'_>,
    options: &IndentOptions,
) -> Result<IndentReport, EngineError> {
    let graph = build_graph(doc, stream, options);
    let mut report = IndentReport::new();

    for item in Resolver::new(stream, &graph, options) {
        match item {
            Ok(record) => {
                if let Some(mismatch) = mismatch_for(&record, stream, options) {
                    report.items.push(mismatch_item(&mismatch, options));
                }
            }
            Err(err @ EngineError::ForeignBase { .. }) => {
                // Bad rule input, not a bad document: one document-scope item.
                warn!("indentation pass abandoned: {err}");
                return Ok(config_report(err.to_string()));
            }
            Err(err) => return Err(err),
        }
    }

    debug!(
        "indentation check: {} item(s) over {} line(s)",
        report.items.len(),
        stream.line_count()
    );
    Ok(report)
}

/// Check a parsed document against raw configuration, surfacing configuration
/// problems as a document-scope report instead of an error.
pub fn lint_document(
    doc: &Document,
    stream: &TokenStream<'_>,
    config: &IndentConfig,
) -> Result<IndentReport, EngineError> {
    match IndentOptions::try_from(config) {
        Ok(options) => check_document(doc, stream, &options),
        Err(err) => {
            warn!("invalid indentation configuration: {err}");
            Ok(config_report(describe_config_error(&err)))
        }
    }
}

fn mismatch_item(mismatch: &Mismatch, options: &IndentOptions) -> ReportItem {
    let expected = mismatch.expected_text.chars().count();
    let message = format!(
        "Expected indentation of {} but found {}",
        options.unit.describe(expected),
        describe_actual(&mismatch.actual_text, options.unit)
    );
    ReportItem {
        kind: ReportKind::Mismatch,
        message,
        line: mismatch.line,
        column: 0,
        fix: Some(edit_for(mismatch)),
    }
}

fn config_report(message: String) -> IndentReport {
    IndentReport {
        items: vec![ReportItem {
            kind: ReportKind::Config,
            message,
            line: 1,
            column: 0,
            fix: None,
        }],
    }
}

fn describe_config_error(err: &ConfigError) -> String {
    format!("indentation disabled: {err}")
}

/// Describe observed leading whitespace by its own content.
fn describe_actual(text: &str, unit: IndentUnit) -> String {
    if text.is_empty() {
        return unit.describe(0);
    }
    let width = text.chars().count();
    if text.bytes().all(|b| b == b' ') {
        IndentUnit::Spaces(1).describe(width)
    } else if text.bytes().all(|b| b == b'\t') {
        IndentUnit::Tabs.describe(width)
    } else {
        "a mix of spaces and tabs".to_string()
    }
}
