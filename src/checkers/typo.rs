//! Typo checker: category-"typo" rules plus two built-in heuristics that
//! are not expressible as static rules.
//!
//! - Duplicate-character runs: any run of three or more identical
//!   non-whitespace characters is flagged; the suggestion collapses the run
//!   to a per-class conventional maximum (kana/latin 1, others 2 by
//!   default).
//! - Adjacent-key substitutions: an ASCII token not found in the auxiliary
//!   dictionary is flagged when replacing exactly one character with a
//!   QWERTY neighbor produces a known-good form. No dictionary hit, no
//!   flag: that keeps false positives down.

use super::{rule_pass, ClaimSet};
use crate::error::ScanWarning;
use crate::models::{Category, Detection, Severity};
use crate::rules::RuleStore;
use crate::text::{char_kind, CharKind, CharMap};

#[derive(Debug, Clone)]
/// Tunable knobs for the built-in heuristics.
pub struct TypoConfig {
    /// Collapse target for kana runs.
    pub max_run_kana: usize,
    /// Collapse target for latin-letter runs.
    pub max_run_latin: usize,
    /// Collapse target for every other character class.
    pub max_run_other: usize,
}

impl Default for TypoConfig {
    fn default() -> TypoConfig {
        TypoConfig {
            max_run_kana: 1,
            max_run_latin: 1,
            max_run_other: 2,
        }
    }
}

/// Scan `text` for typos. Pure function of its inputs.
pub fn scan(
    text: &str,
    store: &RuleStore,
    cfg: &TypoConfig,
) -> (Vec<Detection>, Vec<ScanWarning>) {
    let map = CharMap::new(text);
    let mut claims = ClaimSet::new();
    let mut warnings = Vec::new();
    let mut out = rule_pass(
        text,
        &map,
        store.rules(Category::Typo),
        &mut claims,
        &mut warnings,
    );
    out.extend(duplicate_runs(text, cfg, &mut claims));
    out.extend(adjacent_key(text, store, &mut claims));
    (out, warnings)
}

fn run_limit(cfg: &TypoConfig, kind: CharKind) -> usize {
    match kind {
        CharKind::Kana => cfg.max_run_kana,
        CharKind::Latin => cfg.max_run_latin,
        CharKind::Other => cfg.max_run_other,
    }
}

/// Flag runs of >= 3 identical non-whitespace characters.
fn duplicate_runs(text: &str, cfg: &TypoConfig, claims: &mut ClaimSet) -> Vec<Detection> {
    let mut out = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        let mut j = i + 1;
        while j < chars.len() && chars[j] == c {
            j += 1;
        }
        let len = j - i;
        if len >= 3 && !c.is_whitespace() && !claims.covers(i) {
            let keep = run_limit(cfg, char_kind(c)).max(1);
            if len > keep {
                claims.claim(i, j);
                out.push(Detection {
                    category: Category::Typo,
                    severity: Severity::Medium,
                    start: i,
                    end: j,
                    original: chars[i..j].iter().collect(),
                    suggestion: std::iter::repeat(c).take(keep).collect(),
                    description: format!("同一文字「{}」の連続", c),
                });
            }
        }
        i = j;
    }
    out
}

/// QWERTY neighborhood for the adjacent-key heuristic.
fn neighbors(c: char) -> &'static str {
    match c {
        'q' => "wa",
        'w' => "qesa",
        'e' => "wrds",
        'r' => "etfd",
        't' => "rygf",
        'y' => "tuhg",
        'u' => "yijh",
        'i' => "uokj",
        'o' => "iplk",
        'p' => "ol",
        'a' => "qwsz",
        's' => "awedxz",
        'd' => "serfcx",
        'f' => "drtgvc",
        'g' => "ftyhbv",
        'h' => "gyujnb",
        'j' => "huikmn",
        'k' => "jiolm",
        'l' => "kop",
        'z' => "asx",
        'x' => "zsdc",
        'c' => "xdfv",
        'v' => "cfgb",
        'b' => "vghn",
        'n' => "bhjm",
        'm' => "njk",
        _ => "",
    }
}

/// Flag ASCII tokens that become dictionary words after one adjacent-key
/// substitution.
fn adjacent_key(text: &str, store: &RuleStore, claims: &mut ClaimSet) -> Vec<Detection> {
    let dict = store.dictionary();
    let mut out = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        if !chars[i].is_ascii_alphabetic() {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < chars.len() && chars[j].is_ascii_alphabetic() {
            j += 1;
        }
        let token: String = chars[i..j].iter().collect();
        if token.chars().count() >= 3
            && !dict.contains(&token.to_ascii_lowercase())
            && !claims.covers(i)
        {
            if let Some(corrected) = correct_token(&token, dict) {
                claims.claim(i, j);
                out.push(Detection {
                    category: Category::Typo,
                    severity: Severity::Medium,
                    start: i,
                    end: j,
                    original: token,
                    suggestion: corrected,
                    description: "隣接キーの打ち間違いの可能性".to_string(),
                });
            }
        }
        i = j;
    }
    out
}

fn correct_token(token: &str, dict: &std::collections::HashSet<String>) -> Option<String> {
    let chars: Vec<char> = token.chars().collect();
    for (pos, &c) in chars.iter().enumerate() {
        for n in neighbors(c.to_ascii_lowercase()).chars() {
            let replacement = if c.is_ascii_uppercase() {
                n.to_ascii_uppercase()
            } else {
                n
            };
            let candidate: String = chars
                .iter()
                .enumerate()
                .map(|(k, &ch)| if k == pos { replacement } else { ch })
                .collect();
            if dict.contains(&candidate.to_ascii_lowercase()) {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_store() -> RuleStore {
        RuleStore::load_defaults().unwrap()
    }

    #[test]
    fn test_original_matches_snapshot_slice() {
        let store = default_store();
        let text = "こんにちわ、世界。";
        let (dets, _) = scan(text, &store, &TypoConfig::default());
        let chars: Vec<char> = text.chars().collect();
        for d in &dets {
            let slice: String = chars[d.start..d.end].iter().collect();
            assert_eq!(d.original, slice);
        }
        assert!(dets.iter().any(|d| d.original == "こんにちわ"));
    }

    #[test]
    fn test_duplicate_kana_run_collapses_to_one() {
        let store = default_store();
        let text = "すごいいいい。";
        let (dets, _) = scan(text, &store, &TypoConfig::default());
        let run = dets
            .iter()
            .find(|d| d.description.contains("連続"))
            .expect("run flagged");
        assert_eq!((run.start, run.end), (2, 6));
        assert_eq!(run.original, "いいいい");
        assert_eq!(run.suggestion, "い");
        assert_eq!(run.severity, Severity::Medium);
    }

    #[test]
    fn test_duplicate_other_run_collapses_to_two() {
        let store = default_store();
        let text = "了解！！！！";
        let (dets, _) = scan(text, &store, &TypoConfig::default());
        let run = dets
            .iter()
            .find(|d| d.description.contains("連続"))
            .expect("run flagged");
        assert_eq!(run.original, "！！！！");
        assert_eq!(run.suggestion, "！！");
    }

    #[test]
    fn test_two_char_run_not_flagged() {
        let store = default_store();
        let (dets, _) = scan("ここです。", &store, &TypoConfig::default());
        assert!(dets.iter().all(|d| !d.description.contains("連続")));
    }

    #[test]
    fn test_adjacent_key_with_dictionary_hit() {
        let store = default_store();
        // 'y' neighbors 't'; "tesy" -> "test" is in the bundled dictionary
        let text = "結果は tesy に書く。";
        let (dets, _) = scan(text, &store, &TypoConfig::default());
        let hit = dets
            .iter()
            .find(|d| d.original == "tesy")
            .expect("adjacent-key flagged");
        assert_eq!(hit.suggestion, "test");
        assert_eq!((hit.start, hit.end), (4, 8));
    }

    #[test]
    fn test_adjacent_key_suppressed_without_dictionary_hit() {
        let store = default_store();
        let (dets, _) = scan("変数 qwref を使う。", &store, &TypoConfig::default());
        assert!(dets.iter().all(|d| d.original != "qwref"));
    }

    #[test]
    fn test_dictionary_words_not_flagged() {
        let store = default_store();
        let (dets, _) = scan("test data を確認。", &store, &TypoConfig::default());
        assert!(dets
            .iter()
            .all(|d| d.original != "test" && d.original != "data"));
    }
}
