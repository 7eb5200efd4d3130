//! Scan orchestration: checker fan-out, fan-in, and the time budget.
//!
//! The three checkers are pure functions of the same immutable snapshot and
//! rule store, so they run as independent rayon tasks. Aggregation waits
//! for all of them; there is no partial aggregation. When a wall-clock
//! budget is configured and exceeded, the whole call fails with
//! `ScanError::Timeout` and no findings are returned.

use crate::aggregate::aggregate;
use crate::checkers::context::{self, ContextConfig};
use crate::checkers::expression;
use crate::checkers::typo::{self, TypoConfig};
use crate::error::{ScanError, ScanWarning};
use crate::models::{Detection, ScanReport, Summary};
use crate::rules::RuleStore;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
/// Per-scan options: checker toggles, heuristics, and the optional budget.
pub struct ScanOptions {
    pub no_typos: bool,
    pub no_expressions: bool,
    pub no_context: bool,
    pub timeout: Option<Duration>,
    pub typo: TypoConfig,
    pub context: ContextConfig,
}

/// Run all enabled checkers over `text` and aggregate their findings.
pub fn scan(text: &str, store: &RuleStore, opts: &ScanOptions) -> Result<ScanReport, ScanError> {
    let started = Instant::now();
    type CheckerOut = (Vec<Detection>, Vec<ScanWarning>);
    let ((typo_out, expr_out), ctx_out): ((Option<CheckerOut>, Option<CheckerOut>), Option<CheckerOut>) =
        rayon::join(
            || {
                rayon::join(
                    || (!opts.no_typos).then(|| typo::scan(text, store, &opts.typo)),
                    || (!opts.no_expressions).then(|| expression::scan(text, store)),
                )
            },
            || (!opts.no_context).then(|| context::scan(text, store, &opts.context)),
        );

    if let Some(budget) = opts.timeout {
        if started.elapsed() > budget {
            return Err(ScanError::Timeout {
                budget_ms: budget.as_millis() as u64,
            });
        }
    }

    let mut warnings = Vec::new();
    let mut lists = Vec::new();
    // Registration order matters for the aggregator's tie-break.
    for out in [typo_out, expr_out, ctx_out] {
        let (detections, mut warns) = out.unwrap_or_default();
        warnings.append(&mut warns);
        lists.push(detections);
    }
    let findings = aggregate(text, lists);
    Ok(ScanReport {
        summary: Summary::of(&findings),
        findings,
        warnings,
    })
}
