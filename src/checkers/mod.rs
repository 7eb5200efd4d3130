//! Checkers scanning one immutable text snapshot against the rule store.
//!
//! Each checker is a pure function of `(text, rules, cfg)` with no shared
//! mutable state, so the three checkers are safe to run concurrently. All
//! emitted offsets are character-based.

pub mod context;
pub mod expression;
pub mod typo;

use crate::error::ScanWarning;
use crate::models::Detection;
use crate::rules::Rule;
use crate::text::CharMap;

/// Character spans already claimed by a higher-priority match within one
/// checker pass. A later match whose start falls inside a claimed span is
/// skipped.
pub(crate) struct ClaimSet {
    spans: Vec<(usize, usize)>,
}

impl ClaimSet {
    pub(crate) fn new() -> ClaimSet {
        ClaimSet { spans: Vec::new() }
    }

    pub(crate) fn covers(&self, start: usize) -> bool {
        self.spans.iter().any(|&(s, e)| s <= start && start < e)
    }

    pub(crate) fn claim(&mut self, start: usize, end: usize) {
        self.spans.push((start, end));
    }
}

/// Run one category's rules over `text` in registration order.
///
/// A rule that yields a zero-length match is dropped for the whole pass and
/// recorded once as an `InvalidRule` warning; iterating such a match would
/// never advance. Matches at the exact text boundaries are valid.
pub(crate) fn rule_pass(
    text: &str,
    map: &CharMap,
    rules: &[Rule],
    claims: &mut ClaimSet,
    warnings: &mut Vec<ScanWarning>,
) -> Vec<Detection> {
    let mut out = Vec::new();
    'rules: for rule in rules {
        for m in rule.regex.find_iter(text) {
            if m.start() == m.end() {
                warnings.push(ScanWarning::InvalidRule {
                    rule_id: rule.id.clone(),
                });
                continue 'rules;
            }
            let start = map.to_char(m.start());
            let end = map.to_char(m.end());
            if claims.covers(start) {
                continue;
            }
            let suggestion = rule
                .regex
                .replace(m.as_str(), rule.replacement.as_str())
                .into_owned();
            claims.claim(start, end);
            out.push(Detection {
                category: rule.category,
                severity: rule.severity,
                start,
                end,
                original: m.as_str().to_string(),
                suggestion,
                description: rule.description.clone(),
            });
        }
    }
    out
}
