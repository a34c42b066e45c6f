//! Plain-text rendering of bank state and decisions.

use std::fmt::Write;

use crate::core::StepReport;
use crate::domain::{AdjudicationResult, Reason, SafetyResult, SystemSnapshot};

/// How prominently a decision should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn of(reason: Reason) -> Self {
        match reason {
            Reason::Granted => Severity::Success,
            Reason::ExceedsMaximumClaim => Severity::Error,
            Reason::InsufficientAvailable | Reason::WouldDeadlock => Severity::Warning,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Warning => "!",
            Severity::Error => "✗",
        }
    }
}

/// Available resources plus the Maximum / Allocation / Need tables
pub fn state_tables(snapshot: &SystemSnapshot, names: &[String]) -> String {
    let mut out = String::new();

    out.push_str("Available Resources\n");
    let width = column_width(snapshot, names);
    for name in names {
        let _ = write!(out, "  {:>width$}", name, width = width);
    }
    out.push('\n');
    for value in snapshot.available() {
        let _ = write!(out, "  {:>width$}", value, width = width);
    }
    out.push_str("\n\n");

    out.push_str(&matrix_table("Maximum Need", snapshot.maximum(), names, width));
    out.push('\n');
    out.push_str(&matrix_table("Allocation", snapshot.allocation(), names, width));
    out.push('\n');
    out.push_str(&matrix_table("Remaining Need", snapshot.need(), names, width));

    out
}

fn column_width(snapshot: &SystemSnapshot, names: &[String]) -> usize {
    let widest_name = names.iter().map(|n| n.chars().count()).max().unwrap_or(1);
    // every displayed value is bounded by a total or a declared maximum
    let totals = snapshot.totals();
    let widest_value = snapshot
        .maximum()
        .iter()
        .flatten()
        .chain(&totals)
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1);
    widest_name.max(widest_value)
}

fn matrix_table(title: &str, rows: &[Vec<u32>], names: &[String], width: usize) -> String {
    let mut out = format!("{}\n", title);
    let label_width = format!("P{}", rows.len().saturating_sub(1)).len().max("Process".len());

    let _ = write!(out, "  {:<lw$}", "Process", lw = label_width);
    for name in names {
        let _ = write!(out, "  {:>width$}", name, width = width);
    }
    out.push('\n');

    for (process, row) in rows.iter().enumerate() {
        let _ = write!(out, "  {:<lw$}", format!("P{}", process), lw = label_width);
        for value in row {
            let _ = write!(out, "  {:>width$}", value, width = width);
        }
        out.push('\n');
    }

    out
}

/// `P1 → P3 → P4`
pub fn sequence(order: &[usize]) -> String {
    order
        .iter()
        .map(|p| format!("P{}", p))
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Safety verdict with the discovered sequence
pub fn safety(result: &SafetyResult) -> String {
    if result.is_safe {
        format!("✓ State is safe.\nSafe Execution Sequence: {}\n", sequence(&result.order))
    } else if result.order.is_empty() {
        "✗ State is unsafe: no process can finish.\n".to_string()
    } else {
        format!(
            "✗ State is unsafe. Only these can finish: {}\n",
            sequence(&result.order)
        )
    }
}

/// Decision message and, where meaningful, the sequence to display
pub fn decision(process: usize, result: &AdjudicationResult) -> String {
    let severity = Severity::of(result.reason);
    let mut out = format!("{} {}\n", severity.marker(), result.reason.message(process));

    if severity != Severity::Error && !result.order.is_empty() {
        // a denied request reports the current state's order, which may be partial
        if result.order.len() == result.snapshot.process_count() {
            let _ = writeln!(out, "Safe Execution Sequence: {}", sequence(&result.order));
        } else {
            let _ = writeln!(
                out,
                "State is unsafe. Only these can finish: {}",
                sequence(&result.order)
            );
        }
    }

    out
}

/// One line per scenario step
pub fn step(report: &StepReport) -> String {
    match report {
        StepReport::Decision {
            index,
            process,
            request,
            expected,
            result,
        } => {
            let mut line = format!(
                "[{}] P{} requests {:?}: {}",
                index,
                process,
                request,
                decision(*process, result).trim_end()
            );
            if let Some(expected) = expected {
                if *expected != result.reason {
                    let _ = write!(line, "\n    expected {}, got {}", expected, result.reason);
                }
            }
            line.push('\n');
            line
        }
        StepReport::Reset { index, status } => {
            format!("[{}] reset: {}", index, safety(status))
        }
    }
}
