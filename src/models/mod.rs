//! Shared data models for scan output and the finding lifecycle.

pub mod rule;

use crate::error::ScanWarning;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Ordinal importance of a finding, used for overlap tie-breaks and
/// report prioritization.
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Numeric rank for comparisons; higher means more severe.
    pub fn rank(self) -> u8 {
        match self {
            Severity::High => 2,
            Severity::Medium => 1,
            Severity::Low => 0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Checker family a rule or finding belongs to.
pub enum Category {
    Typo,
    Expression,
    Context,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Typo => "typo",
            Category::Expression => "expression",
            Category::Context => "context",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Per-finding state machine. `Pending` is the only non-terminal state.
pub enum FindingState {
    Pending,
    Applied,
    Ignored,
    /// The finding's span was touched by another applied fix, so its
    /// `original` text no longer matches the buffer. Kept rather than
    /// dropped so a client can show why a suggestion disappeared.
    Invalidated,
}

impl fmt::Display for FindingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FindingState::Pending => "pending",
            FindingState::Applied => "applied",
            FindingState::Ignored => "ignored",
            FindingState::Invalidated => "invalidated",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
/// A raw detection emitted by a checker. Offsets are character-based,
/// half-open, into the scanned snapshot. The aggregator turns detections
/// into `Finding`s with stable ids.
pub struct Detection {
    pub category: Category,
    pub severity: Severity,
    pub start: usize,
    pub end: usize,
    pub original: String,
    pub suggestion: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single detected issue with position, severity, and suggested fix.
///
/// `start`/`end` are half-open character offsets into the current text
/// snapshot; `line`/`column` are 1-based display coordinates derived from
/// `start`.
pub struct Finding {
    pub id: u64,
    pub category: Category,
    pub severity: Severity,
    pub start: usize,
    pub end: usize,
    pub original: String,
    pub suggestion: String,
    pub description: String,
    pub state: FindingState,
    pub line: usize,
    pub column: usize,
}

impl Finding {
    pub fn is_pending(&self) -> bool {
        self.state == FindingState::Pending
    }
}

#[derive(Debug, Clone, Serialize)]
/// Aggregated scan summary used by printers.
pub struct Summary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub typos: usize,
    pub expressions: usize,
    pub context: usize,
    pub total: usize,
}

impl Summary {
    /// Tally severities and categories over a finding list.
    pub fn of(findings: &[Finding]) -> Summary {
        let mut s = Summary {
            high: 0,
            medium: 0,
            low: 0,
            typos: 0,
            expressions: 0,
            context: 0,
            total: findings.len(),
        };
        for f in findings {
            match f.severity {
                Severity::High => s.high += 1,
                Severity::Medium => s.medium += 1,
                Severity::Low => s.low += 1,
            }
            match f.category {
                Category::Typo => s.typos += 1,
                Category::Expression => s.expressions += 1,
                Category::Context => s.context += 1,
            }
        }
        s
    }
}

#[derive(Debug, Serialize)]
/// Scan results container: the ordered finding list, its summary, and any
/// non-fatal warnings recorded along the way.
pub struct ScanReport {
    pub findings: Vec<Finding>,
    pub summary: Summary,
    pub warnings: Vec<ScanWarning>,
}
