//! Error and warning taxonomy.
//!
//! Checker-local problems (a bad individual rule, missing sentence
//! boundaries) are recovered locally and surface as `ScanWarning`s next to
//! the results. Session-state errors (unknown finding, already resolved,
//! timeout) propagate to the caller verbatim. Nothing is retried here.

use crate::models::FindingState;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
/// Fatal rule-table problems. No partial rule set is ever used.
pub enum RuleLoadError {
    #[error("failed to read rule table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("rule table {path} is not valid TOML: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("rule '{id}' has an empty pattern")]
    EmptyPattern { id: String },
    #[error("rule '{id}' has an invalid pattern: {source}")]
    BadPattern {
        id: String,
        #[source]
        source: regex::Error,
    },
    #[error("duplicate rule id '{id}'")]
    DuplicateId { id: String },
}

#[derive(Debug, Error)]
/// Scan-level failures. All-or-nothing: no partial findings are returned.
pub enum ScanError {
    #[error("scan exceeded the {budget_ms} ms budget")]
    Timeout { budget_ms: u64 },
}

#[derive(Debug, Error, PartialEq, Eq)]
/// Apply/ignore failures. State is left untouched in every case.
pub enum ApplyError {
    #[error("no finding with id {0}")]
    NotFound(u64),
    #[error("finding {id} is already {state}")]
    AlreadyResolved { id: u64, state: FindingState },
    #[error("no session '{0}'")]
    UnknownSession(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Non-fatal conditions recorded during a scan.
pub enum ScanWarning {
    /// A rule produced a zero-length match; the rule was skipped for this
    /// pass to avoid an infinite scanning loop.
    InvalidRule { rule_id: String },
    /// No sentence boundary was found in the whole text; cross-sentence
    /// checks ran in degraded mode (whole text as one sentence).
    SegmentationDegraded,
}
