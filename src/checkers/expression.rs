//! Expression checker: category-"expression" rules plus structural
//! double-honorific detection.
//!
//! Rule precedence is registration order with longest-match-at-same-start,
//! so a substring of an already-flagged longer phrase is never flagged
//! again. Redundancy detection is expressed as low-severity rules mapping
//! verbose phrases to shorter ones.

use super::{rule_pass, ClaimSet};
use crate::error::ScanWarning;
use crate::models::{Category, Detection, Severity};
use crate::rules::RuleStore;
use crate::text::CharMap;
use regex::Regex;
use std::sync::OnceLock;

/// Scan `text` for inappropriate expressions. Pure function of its inputs.
pub fn scan(text: &str, store: &RuleStore) -> (Vec<Detection>, Vec<ScanWarning>) {
    let map = CharMap::new(text);
    let mut claims = ClaimSet::new();
    let mut warnings = Vec::new();
    let mut out = rule_pass(
        text,
        &map,
        store.rules(Category::Expression),
        &mut claims,
        &mut warnings,
    );
    out.extend(double_honorifics(text, &map, &mut claims));
    (out, warnings)
}

struct StackedForm {
    regex: Regex,
    replacement: &'static str,
    description: &'static str,
}

/// Built-in stacked-politeness patterns. Two or more politeness markers on
/// one predicate read as over-polite; the suggestion keeps the first marker.
fn stacked_forms() -> &'static [StackedForm] {
    static FORMS: OnceLock<Vec<StackedForm>> = OnceLock::new();
    FORMS.get_or_init(|| {
        [
            (
                "(致します|いたします|申し上げます|伺います)(でございます|でいらっしゃいます)",
                "$1",
                "丁寧表現の重複（二重敬語）",
            ),
            (
                "お([ぁ-ん一-龯]+?)になられました",
                "お$1になりました",
                "尊敬語の重複（二重敬語）",
            ),
            (
                "お([ぁ-ん一-龯]+?)になられます",
                "お$1になります",
                "尊敬語の重複（二重敬語）",
            ),
            (
                "お([ぁ-ん一-龯]+?)になられる",
                "お$1になる",
                "尊敬語の重複（二重敬語）",
            ),
            ("ご覧になられました", "ご覧になりました", "尊敬語の重複（二重敬語）"),
            ("ご覧になられます", "ご覧になります", "尊敬語の重複（二重敬語）"),
            ("ご覧になられる", "ご覧になる", "尊敬語の重複（二重敬語）"),
            ("おっしゃられました", "おっしゃいました", "尊敬語の重複（二重敬語）"),
            ("おっしゃられます", "おっしゃいます", "尊敬語の重複（二重敬語）"),
            ("おっしゃられる", "おっしゃる", "尊敬語の重複（二重敬語）"),
        ]
        .iter()
        .map(|(p, r, d)| StackedForm {
            regex: Regex::new(p).unwrap(),
            replacement: r,
            description: d,
        })
        .collect()
    })
}

fn double_honorifics(text: &str, map: &CharMap, claims: &mut ClaimSet) -> Vec<Detection> {
    let mut out = Vec::new();
    for form in stacked_forms() {
        for m in form.regex.find_iter(text) {
            let start = map.to_char(m.start());
            let end = map.to_char(m.end());
            if claims.covers(start) {
                continue;
            }
            let suggestion = form
                .regex
                .replace(m.as_str(), form.replacement)
                .into_owned();
            claims.claim(start, end);
            out.push(Detection {
                category: Category::Expression,
                severity: Severity::Medium,
                start,
                end,
                original: m.as_str().to_string(),
                suggestion,
                description: form.description.to_string(),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_store() -> RuleStore {
        RuleStore::load_defaults().unwrap()
    }

    #[test]
    fn test_redundancy_rule_maps_to_shorter_phrase() {
        let store = default_store();
        let text = "まず最初に頭痛が痛い件を説明する。";
        let (dets, _) = scan(text, &store);
        let first = dets.iter().find(|d| d.original == "まず最初に").unwrap();
        assert_eq!(first.suggestion, "最初に");
        assert_eq!(first.severity, Severity::Low);
        let second = dets.iter().find(|d| d.original == "頭痛が痛い").unwrap();
        assert_eq!(second.suggestion, "頭が痛い");
        assert_eq!((second.start, second.end), (5, 10));
    }

    #[test]
    fn test_stacked_copula_detected() {
        let store = default_store();
        let text = "よろしくお願いいたしますでございます。";
        let (dets, _) = scan(text, &store);
        let hit = dets
            .iter()
            .find(|d| d.description.contains("二重敬語"))
            .expect("stacked honorific flagged");
        assert_eq!(hit.original, "いたしますでございます");
        assert_eq!(hit.suggestion, "いたします");
        assert_eq!(hit.severity, Severity::Medium);
        assert_eq!((hit.start, hit.end), (7, 18));
    }

    #[test]
    fn test_o_ni_nareru_stacking() {
        let store = default_store();
        let (dets, _) = scan("お読みになられました。", &store);
        let hit = dets.iter().find(|d| d.original.starts_with("お読み")).unwrap();
        assert_eq!(hit.original, "お読みになられました");
        assert_eq!(hit.suggestion, "お読みになりました");
    }

    #[test]
    fn test_single_politeness_marker_not_flagged() {
        let store = default_store();
        let (dets, _) = scan("よろしくお願いいたします。", &store);
        assert!(dets.iter().all(|d| !d.description.contains("二重敬語")));
    }
}
