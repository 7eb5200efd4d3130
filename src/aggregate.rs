//! Finding aggregation.
//!
//! Concatenates the checkers' outputs, orders by position, resolves
//! overlaps with a deterministic tie-break, and assigns stable ids. The
//! result is non-overlapping over unapplied findings and ordered by start,
//! which the fix applicator and left-to-right client navigation rely on.

use crate::models::{Detection, Finding, FindingState};
use crate::text::line_col;

/// Merge checker outputs (given in checker registration order) into the
/// final ordered finding list.
///
/// Overlap tie-break: higher severity wins; at equal severity the
/// earlier-registered checker's finding wins; the loser is dropped, not
/// merged. Ids are assigned monotonically in final order, starting at 1.
pub fn aggregate(text: &str, lists: Vec<Vec<Detection>>) -> Vec<Finding> {
    let mut all: Vec<(usize, Detection)> = Vec::new();
    for (checker, list) in lists.into_iter().enumerate() {
        for det in list {
            all.push((checker, det));
        }
    }
    // Position order with severity-desc tie-break for equal starts; checker
    // registration order keeps the sort fully deterministic.
    all.sort_by(|(ca, a), (cb, b)| {
        a.start
            .cmp(&b.start)
            .then(b.severity.rank().cmp(&a.severity.rank()))
            .then(ca.cmp(cb))
            .then(b.end.cmp(&a.end))
    });

    let mut kept: Vec<(usize, Detection)> = Vec::new();
    for (checker, det) in all {
        if let Some((last_checker, last)) = kept.last() {
            if det.start < last.end {
                let wins = det.severity.rank() > last.severity.rank()
                    || (det.severity.rank() == last.severity.rank() && checker < *last_checker);
                if wins {
                    kept.pop();
                    kept.push((checker, det));
                }
                continue;
            }
        }
        kept.push((checker, det));
    }

    kept.into_iter()
        .enumerate()
        .map(|(i, (_, det))| {
            let (line, column) = line_col(text, det.start);
            Finding {
                id: (i + 1) as u64,
                category: det.category,
                severity: det.severity,
                start: det.start,
                end: det.end,
                original: det.original,
                suggestion: det.suggestion,
                description: det.description,
                state: FindingState::Pending,
                line,
                column,
            }
        })
        .collect()
}
