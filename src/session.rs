//! Document state and the fix-application protocol.
//!
//! A `Document` owns one text buffer and its finding list. Applying a
//! finding splices the suggestion into the buffer and shifts every
//! later finding by the length delta so all remaining positions stay
//! valid; findings overlapping the edited span are invalidated rather than
//! silently dropped, so a client can show why a suggestion disappeared.
//!
//! `SessionStore` holds one mutex per document so at most one apply/ignore
//! operation is in flight per session at a time; interleaved offset
//! recomputation would corrupt positions.

use crate::error::{ApplyError, ScanError};
use crate::models::{Finding, FindingState, ScanReport};
use crate::rules::RuleStore;
use crate::scan::ScanOptions;
use crate::text::{line_col, CharMap};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One working copy of a text plus its findings.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    findings: Vec<Finding>,
}

impl Document {
    pub fn new(text: String, findings: Vec<Finding>) -> Document {
        Document { text, findings }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    fn position_of(&self, id: u64) -> Result<usize, ApplyError> {
        self.findings
            .iter()
            .position(|f| f.id == id)
            .ok_or(ApplyError::NotFound(id))
    }

    fn ensure_pending(&self, idx: usize) -> Result<(), ApplyError> {
        let f = &self.findings[idx];
        if f.state != FindingState::Pending {
            return Err(ApplyError::AlreadyResolved {
                id: f.id,
                state: f.state,
            });
        }
        Ok(())
    }

    /// Apply one pending finding: splice its suggestion into the buffer at
    /// `[start, end)`, shift every finding positioned at or past the edit
    /// end by the length delta, and invalidate pending findings whose span
    /// overlaps the edit. One logical transaction; on error nothing changes.
    pub fn apply(&mut self, id: u64) -> Result<(), ApplyError> {
        let idx = self.position_of(id)?;
        self.ensure_pending(idx)?;

        let (start, end, suggestion) = {
            let f = &self.findings[idx];
            (f.start, f.end, f.suggestion.clone())
        };
        let map = CharMap::new(&self.text);
        let byte_start = map.to_byte(start);
        let byte_end = map.to_byte(end);
        self.text.replace_range(byte_start..byte_end, &suggestion);

        let new_len = suggestion.chars().count();
        let delta = new_len as isize - (end - start) as isize;
        for (j, f) in self.findings.iter_mut().enumerate() {
            if j == idx {
                continue;
            }
            if f.start >= end {
                f.start = (f.start as isize + delta) as usize;
                f.end = (f.end as isize + delta) as usize;
                let (line, column) = line_col(&self.text, f.start);
                f.line = line;
                f.column = column;
            } else if f.end > start && f.state == FindingState::Pending {
                // The edited span rewrote this finding's original text; it
                // must not be offered again.
                f.state = FindingState::Invalidated;
            }
        }
        let f = &mut self.findings[idx];
        f.state = FindingState::Applied;
        f.end = f.start + new_len;
        Ok(())
    }

    /// Mark one pending finding ignored. Terminal; the text is untouched.
    pub fn ignore(&mut self, id: u64) -> Result<(), ApplyError> {
        let idx = self.position_of(id)?;
        self.ensure_pending(idx)?;
        self.findings[idx].state = FindingState::Ignored;
        Ok(())
    }

    /// Apply every pending finding left-to-right. Findings invalidated along
    /// the way are skipped. Returns how many were applied.
    pub fn apply_all_pending(&mut self) -> usize {
        let mut applied = 0usize;
        loop {
            let next = self
                .findings
                .iter()
                .filter(|f| f.is_pending())
                .min_by_key(|f| f.start)
                .map(|f| f.id);
            match next {
                Some(id) => {
                    if self.apply(id).is_ok() {
                        applied += 1;
                    }
                }
                None => return applied,
            }
        }
    }
}

/// Session-keyed documents behind per-session locks.
///
/// Apply and ignore are serialized per session key. A scan replaces the
/// session's document wholesale; checkers only ever read immutable
/// snapshots, so scanning itself needs no lock.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<Mutex<Document>>>>,
}

impl SessionStore {
    pub fn new() -> SessionStore {
        SessionStore::default()
    }

    /// Insert or replace a session's document.
    pub fn open(&self, session_id: &str, document: Document) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(session_id.to_string(), Arc::new(Mutex::new(document)));
    }

    /// Scan `text` and bind the result to a session, replacing any previous
    /// document under the same key. Returns the report for the client.
    pub fn scan(
        &self,
        session_id: &str,
        text: &str,
        store: &RuleStore,
        opts: &ScanOptions,
    ) -> Result<ScanReport, ScanError> {
        let report = crate::scan::scan(text, store, opts)?;
        self.open(
            session_id,
            Document::new(text.to_string(), report.findings.clone()),
        );
        Ok(report)
    }

    fn handle(&self, session_id: &str) -> Result<Arc<Mutex<Document>>, ApplyError> {
        let sessions = self.sessions.lock().unwrap();
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| ApplyError::UnknownSession(session_id.to_string()))
    }

    /// Apply a finding in one session; returns the updated text and the
    /// full updated finding collection as one atomic result.
    pub fn apply(
        &self,
        session_id: &str,
        finding_id: u64,
    ) -> Result<(String, Vec<Finding>), ApplyError> {
        let handle = self.handle(session_id)?;
        let mut doc = handle.lock().unwrap();
        doc.apply(finding_id)?;
        Ok((doc.text().to_string(), doc.findings().to_vec()))
    }

    /// Ignore a finding in one session; returns the updated findings.
    pub fn ignore(&self, session_id: &str, finding_id: u64) -> Result<Vec<Finding>, ApplyError> {
        let handle = self.handle(session_id)?;
        let mut doc = handle.lock().unwrap();
        doc.ignore(finding_id)?;
        Ok(doc.findings().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Severity};

    fn finding(id: u64, start: usize, end: usize, original: &str, suggestion: &str) -> Finding {
        Finding {
            id,
            category: Category::Typo,
            severity: Severity::High,
            start,
            end,
            original: original.into(),
            suggestion: suggestion.into(),
            description: String::new(),
            state: FindingState::Pending,
            line: 1,
            column: start + 1,
        }
    }

    #[test]
    fn test_apply_same_length_leaves_later_finding_unchanged() {
        let text = "abc DEF ghi".to_string();
        let a = finding(1, 4, 7, "DEF", "xyz");
        let b = finding(2, 8, 11, "ghi", "GHI");
        let mut doc = Document::new(text, vec![a, b]);
        doc.apply(1).unwrap();
        assert_eq!(doc.text(), "abc xyz ghi");
        let b = &doc.findings()[1];
        assert_eq!((b.start, b.end), (8, 11));
        assert!(b.is_pending());
    }

    #[test]
    fn test_apply_shorter_suggestion_shifts_later_finding() {
        let text = "abc DEF ghi".to_string();
        let a = finding(1, 4, 7, "DEF", "xy");
        let b = finding(2, 8, 11, "ghi", "GHI");
        let mut doc = Document::new(text, vec![a, b]);
        doc.apply(1).unwrap();
        assert_eq!(doc.text(), "abc xy ghi");
        let b = &doc.findings()[1];
        assert_eq!((b.start, b.end), (7, 10));
    }

    #[test]
    fn test_overlapping_finding_is_invalidated_not_dropped() {
        let text = "abc DEF ghi".to_string();
        let a = finding(1, 4, 7, "DEF", "xyz");
        let c = finding(2, 5, 9, "EF g", "??");
        let mut doc = Document::new(text, vec![a, c]);
        doc.apply(1).unwrap();
        assert_eq!(doc.findings().len(), 2);
        assert_eq!(doc.findings()[1].state, FindingState::Invalidated);
    }

    #[test]
    fn test_apply_unknown_id_is_not_found() {
        let mut doc = Document::new("abc".into(), vec![]);
        assert_eq!(doc.apply(9), Err(ApplyError::NotFound(9)));
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn test_ignore_twice_is_already_resolved() {
        let text = "abc DEF ghi".to_string();
        let a = finding(1, 4, 7, "DEF", "xyz");
        let mut doc = Document::new(text, vec![a]);
        doc.ignore(1).unwrap();
        let err = doc.ignore(1).unwrap_err();
        assert_eq!(
            err,
            ApplyError::AlreadyResolved {
                id: 1,
                state: FindingState::Ignored
            }
        );
        // Ignoring never alters the text
        assert_eq!(doc.text(), "abc DEF ghi");
    }

    #[test]
    fn test_apply_after_apply_is_already_resolved() {
        let text = "abc DEF ghi".to_string();
        let a = finding(1, 4, 7, "DEF", "xyz");
        let mut doc = Document::new(text, vec![a]);
        doc.apply(1).unwrap();
        let err = doc.apply(1).unwrap_err();
        assert!(matches!(err, ApplyError::AlreadyResolved { .. }));
    }

    #[test]
    fn test_applied_span_covers_suggestion() {
        let text = "こんにちわ、世界".to_string();
        let a = finding(1, 0, 5, "こんにちわ", "こんにちは");
        let mut doc = Document::new(text, vec![a]);
        doc.apply(1).unwrap();
        assert_eq!(doc.text(), "こんにちは、世界");
        assert_eq!((doc.findings()[0].start, doc.findings()[0].end), (0, 5));
        assert_eq!(doc.findings()[0].state, FindingState::Applied);
    }

    #[test]
    fn test_apply_all_pending_left_to_right() {
        let text = "aaa bbb ccc".to_string();
        let f1 = finding(1, 0, 3, "aaa", "A");
        let f2 = finding(2, 4, 7, "bbb", "B");
        let f3 = finding(3, 8, 11, "ccc", "C");
        let mut doc = Document::new(text, vec![f1, f2, f3]);
        assert_eq!(doc.apply_all_pending(), 3);
        assert_eq!(doc.text(), "A B C");
        assert!(doc.findings().iter().all(|f| f.state == FindingState::Applied));
    }

    #[test]
    fn test_store_serializes_and_reports_unknown_session() {
        let store = SessionStore::new();
        let doc = Document::new("abc DEF".into(), vec![finding(1, 4, 7, "DEF", "x")]);
        store.open("s1", doc);
        let (text, findings) = store.apply("s1", 1).unwrap();
        assert_eq!(text, "abc x");
        assert_eq!(findings[0].state, FindingState::Applied);
        assert_eq!(
            store.apply("nope", 1),
            Err(ApplyError::UnknownSession("nope".into()))
        );
    }

    #[test]
    fn test_store_scan_binds_session() {
        let rules = RuleStore::load_defaults().unwrap();
        let store = SessionStore::new();
        let report = store
            .scan("s1", "こんにちわ、世界。", &rules, &ScanOptions::default())
            .unwrap();
        assert!(!report.findings.is_empty());
        let id = report.findings[0].id;
        let (text, _) = store.apply("s1", id).unwrap();
        assert_eq!(text, "こんにちは、世界。");
    }
}
