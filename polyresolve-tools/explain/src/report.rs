//! Call Reports
//!
//! Resolves every call of a table and describes what happened.

use polyresolve::DispatchError;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::table::{Call, DispatchTable, Expectation};

/// What resolving a call produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    Resolved { handle: String },
    NotFound,
    Ambiguous { candidates: Vec<String> },
}

impl Outcome {
    /// Returns true if the call was dispatched to a method.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Outcome::Resolved { .. })
    }

    /// Returns true if this outcome is what `expect` describes.
    pub fn satisfies(&self, expect: &Expectation) -> bool {
        match (self, expect) {
            (Outcome::Resolved { handle }, Expectation::Handle(expected)) => handle == expected,
            (Outcome::NotFound, Expectation::NotFound) => true,
            (Outcome::Ambiguous { .. }, Expectation::Ambiguous) => true,
            _ => false,
        }
    }
}

/// The report for one call of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallReport {
    pub function: String,
    pub args: Vec<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Expectation>,
}

impl CallReport {
    /// `None` when the call carries no expectation.
    pub fn meets_expectation(&self) -> Option<bool> {
        self.expected.as_ref().map(|e| self.outcome.satisfies(e))
    }

    /// Render as a single line, e.g. `process(D) -> ambiguous: (B) | (C)`.
    pub fn render_text(&self, config: &Config) -> String {
        let mut line = format!("{}({}) -> ", self.function, self.args.join(", "));
        match &self.outcome {
            Outcome::Resolved { handle } => line.push_str(handle),
            Outcome::NotFound => line.push_str("not found"),
            Outcome::Ambiguous { candidates } => {
                line.push_str("ambiguous");
                if config.show_candidates && !candidates.is_empty() {
                    line.push_str(": ");
                    line.push_str(&candidates.join(" | "));
                }
            }
        }
        if let (Some(false), Some(expected)) = (self.meets_expectation(), &self.expected) {
            line.push_str(&format!("  [expected {expected}]"));
        }
        line
    }
}

/// Resolve one call of `table`.
pub fn explain_call(table: &DispatchTable, call: &Call) -> CallReport {
    let outcome = match table.functions().resolve(&call.function, &call.args) {
        Ok(handle) => Outcome::Resolved {
            handle: handle.clone(),
        },
        Err(DispatchError::NotFound(_)) => Outcome::NotFound,
        Err(DispatchError::Ambiguous(err)) => Outcome::Ambiguous {
            candidates: err.candidates.iter().map(|sig| table.render(sig)).collect(),
        },
    };
    debug!(function = %call.function, ?outcome, "resolved call");

    CallReport {
        function: call.function.clone(),
        args: call.args.iter().map(|id| table.type_name(*id)).collect(),
        outcome,
        expected: call.expect.clone(),
    }
}

/// Resolve every call of `table`, in declaration order.
pub fn explain(table: &DispatchTable) -> Vec<CallReport> {
    let reports: Vec<_> = table
        .calls()
        .iter()
        .map(|call| explain_call(table, call))
        .collect();

    for report in &reports {
        if report.meets_expectation() == Some(false) {
            warn!(
                function = %report.function,
                args = ?report.args,
                "call does not meet its expectation"
            );
        }
    }
    reports
}

/// Summary counts over a set of reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub calls: usize,
    pub unresolved: usize,
    pub mismatched: usize,
}

impl Summary {
    pub fn of(reports: &[CallReport]) -> Self {
        Self {
            calls: reports.len(),
            unresolved: reports.iter().filter(|r| !r.outcome.is_resolved()).count(),
            mismatched: reports
                .iter()
                .filter(|r| r.meets_expectation() == Some(false))
                .count(),
        }
    }
}
