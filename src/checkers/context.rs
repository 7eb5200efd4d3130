//! Context checker: cross-sentence consistency checks on top of a plain
//! category-"context" rule pass.
//!
//! The text is segmented on 。！？ terminators, then three heuristic checks
//! run over the sentence sequence: pronoun-reference ambiguity within a
//! sliding window, tense mixing between successive sentences about the same
//! topic, and formal/plain style discontinuities (flagged once per switch,
//! not once per sentence). These are deliberately heuristic; thresholds are
//! configuration, not hidden constants.
//!
//! When no sentence boundary exists at all, the checker degrades to treating
//! the whole text as one sentence: cross-sentence checks are skipped and a
//! `SegmentationDegraded` warning is recorded. No error is raised.

use super::{rule_pass, ClaimSet};
use crate::error::ScanWarning;
use crate::models::{Category, Detection, Severity};
use crate::rules::RuleStore;
use crate::text::{is_sentence_terminator, split_sentences, CharMap, Sentence};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
/// Tunable knobs for the cross-sentence heuristics.
pub struct ContextConfig {
    /// How many preceding sentences form the antecedent window.
    pub window_sentences: usize,
    /// Minimum number of distinct noun candidates in the window for a
    /// pronoun to count as ambiguous.
    pub min_antecedents: usize,
}

impl Default for ContextConfig {
    fn default() -> ContextConfig {
        ContextConfig {
            window_sentences: 2,
            min_antecedents: 2,
        }
    }
}

/// Scan `text` for contextual inconsistencies. Pure function of its inputs.
pub fn scan(
    text: &str,
    store: &RuleStore,
    cfg: &ContextConfig,
) -> (Vec<Detection>, Vec<ScanWarning>) {
    let map = CharMap::new(text);
    let mut claims = ClaimSet::new();
    let mut warnings = Vec::new();
    let mut out = rule_pass(
        text,
        &map,
        store.rules(Category::Context),
        &mut claims,
        &mut warnings,
    );

    let sentences = split_sentences(text);
    let degraded = !sentences.is_empty() && !text.chars().any(is_sentence_terminator);
    if degraded {
        warnings.push(ScanWarning::SegmentationDegraded);
        return (out, warnings);
    }

    out.extend(pronoun_ambiguity(text, &map, &sentences, cfg, &mut claims));
    out.extend(tense_mixing(text, &map, &sentences, &mut claims));
    out.extend(style_mixing(text, &map, &sentences, &mut claims));
    (out, warnings)
}

fn pronoun_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            "彼女ら|彼女|彼ら|これら|それら|あれら|これ|それ|あれ|ここ|そこ|あそこ|この|その|あの|彼",
        )
        .unwrap()
    })
}

fn noun_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("[一-龯]{2,}").unwrap())
}

fn sentence_slice<'a>(text: &'a str, map: &CharMap, s: &Sentence) -> &'a str {
    &text[map.to_byte(s.start)..map.to_byte(s.end)]
}

/// Noun candidates of one sentence: distinct runs of two or more kanji.
/// This is the same coarse antecedent heuristic the rule tables assume;
/// no part-of-speech analysis is attempted.
fn noun_candidates(slice: &str) -> HashSet<&str> {
    noun_re().find_iter(slice).map(|m| m.as_str()).collect()
}

/// A pronoun is ambiguous when its preceding window holds more than one
/// plausible antecedent of the same coarse class.
fn pronoun_ambiguity(
    text: &str,
    map: &CharMap,
    sentences: &[Sentence],
    cfg: &ContextConfig,
    claims: &mut ClaimSet,
) -> Vec<Detection> {
    let mut out = Vec::new();
    for i in 1..sentences.len() {
        let from = i.saturating_sub(cfg.window_sentences);
        let mut candidates: HashSet<&str> = HashSet::new();
        for s in &sentences[from..i] {
            candidates.extend(noun_candidates(sentence_slice(text, map, s)));
        }
        if candidates.len() < cfg.min_antecedents {
            continue;
        }
        let sent = &sentences[i];
        let slice = sentence_slice(text, map, sent);
        for m in pronoun_re().find_iter(slice) {
            let start = sent.start + slice[..m.start()].chars().count();
            let end = start + m.as_str().chars().count();
            if claims.covers(start) {
                continue;
            }
            claims.claim(start, end);
            out.push(Detection {
                category: Category::Context,
                severity: Severity::Medium,
                start,
                end,
                original: m.as_str().to_string(),
                // No mechanical rewrite exists; the suggestion keeps the
                // text unchanged and the description carries the advice.
                suggestion: m.as_str().to_string(),
                description: format!(
                    "指示語「{}」の指示対象が曖昧です（候補 {} 件）",
                    m.as_str(),
                    candidates.len()
                ),
            });
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tense {
    Past,
    NonPast,
}

/// Tense of the sentence-final predicate plus the marker's span relative to
/// the sentence start, in characters.
fn sentence_tense(slice: &str) -> Option<(Tense, usize, usize)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new("(ました|でした|だった|ます|です|である|だ|た|る)[。！？]?$").unwrap()
    });
    let caps = re.captures(slice)?;
    let m = caps.get(1)?;
    let tense = match m.as_str() {
        "ました" | "でした" | "だった" | "た" => Tense::Past,
        _ => Tense::NonPast,
    };
    let start = slice[..m.start()].chars().count();
    let end = start + m.as_str().chars().count();
    Some((tense, start, end))
}

/// Successive sentences about the same topic (sharing at least one noun
/// candidate) but with different tense markers are flagged on the second
/// sentence's marker.
fn tense_mixing(
    text: &str,
    map: &CharMap,
    sentences: &[Sentence],
    claims: &mut ClaimSet,
) -> Vec<Detection> {
    let mut out = Vec::new();
    for pair in sentences.windows(2) {
        let prev_slice = sentence_slice(text, map, &pair[0]);
        let cur_slice = sentence_slice(text, map, &pair[1]);
        let (Some((prev_tense, _, _)), Some((cur_tense, rel_start, rel_end))) =
            (sentence_tense(prev_slice), sentence_tense(cur_slice))
        else {
            continue;
        };
        if prev_tense == cur_tense {
            continue;
        }
        let shared = noun_candidates(prev_slice)
            .intersection(&noun_candidates(cur_slice))
            .next()
            .is_some();
        if !shared {
            continue;
        }
        let start = pair[1].start + rel_start;
        let end = pair[1].start + rel_end;
        if claims.covers(start) {
            continue;
        }
        claims.claim(start, end);
        let original: String = cur_slice
            .chars()
            .skip(rel_start)
            .take(rel_end - rel_start)
            .collect();
        out.push(Detection {
            category: Category::Context,
            severity: Severity::Low,
            start,
            end,
            suggestion: original.clone(),
            original,
            description: "前の文と同じ話題なのに時制が混在しています".to_string(),
        });
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Formal,
    Plain,
}

/// Formal/plain classification of the sentence-final form, with the form's
/// span relative to the sentence start.
fn sentence_style(slice: &str) -> Option<(Style, usize, usize)> {
    static FORMAL: OnceLock<Regex> = OnceLock::new();
    static PLAIN: OnceLock<Regex> = OnceLock::new();
    let formal = FORMAL.get_or_init(|| {
        Regex::new("(ませんでした|ましょう|ません|ました|でした|ございます|ます|です)[。！？]?$")
            .unwrap()
    });
    let plain =
        PLAIN.get_or_init(|| Regex::new("(だった|である|ない|だ|た|る)[。！？]?$").unwrap());
    let (style, m) = if let Some(caps) = formal.captures(slice) {
        (Style::Formal, caps.get(1)?)
    } else if let Some(caps) = plain.captures(slice) {
        (Style::Plain, caps.get(1)?)
    } else {
        return None;
    };
    let start = slice[..m.start()].chars().count();
    let end = start + m.as_str().chars().count();
    Some((style, start, end))
}

/// Mixing of formal and plain sentence-final forms, flagged once per
/// discontinuity.
fn style_mixing(
    text: &str,
    map: &CharMap,
    sentences: &[Sentence],
    claims: &mut ClaimSet,
) -> Vec<Detection> {
    let mut out = Vec::new();
    let mut last: Option<Style> = None;
    for sent in sentences {
        let slice = sentence_slice(text, map, sent);
        let Some((style, rel_start, rel_end)) = sentence_style(slice) else {
            continue;
        };
        if let Some(prev) = last {
            if prev != style {
                let start = sent.start + rel_start;
                let end = sent.start + rel_end;
                if !claims.covers(start) {
                    claims.claim(start, end);
                    let original: String = slice
                        .chars()
                        .skip(rel_start)
                        .take(rel_end - rel_start)
                        .collect();
                    out.push(Detection {
                        category: Category::Context,
                        severity: Severity::Low,
                        start,
                        end,
                        suggestion: original.clone(),
                        original,
                        description: "文体（敬体と常体）が混在しています".to_string(),
                    });
                }
            }
        }
        last = Some(style);
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
    fn test_pronoun_ambiguous_with_two_antecedents() {
        let store = default_store();
        let text = "田中さんと佐藤さんが来た。それは良かった。";
        let (dets, warnings) = scan(text, &store, &ContextConfig::default());
        assert!(warnings.is_empty());
        let hit = dets
            .iter()
            .find(|d| d.original == "それ")
            .expect("pronoun flagged");
        assert_eq!((hit.start, hit.end), (13, 15));
        assert_eq!(hit.severity, Severity::Medium);
    }

    #[test]
    fn test_pronoun_clear_with_single_antecedent() {
        let store = default_store();
        let text = "田中さんが来た。それは良かった。";
        let (dets, _) = scan(text, &store, &ContextConfig::default());
        assert!(dets.iter().all(|d| d.original != "それ"));
    }

    #[test]
    fn test_antecedent_threshold_is_configurable() {
        let store = default_store();
        let cfg = ContextConfig {
            window_sentences: 2,
            min_antecedents: 3,
        };
        let text = "田中さんと佐藤さんが来た。それは良かった。";
        let (dets, _) = scan(text, &store, &cfg);
        assert!(dets.iter().all(|d| d.original != "それ"));
    }

    #[test]
    fn test_tense_mixing_on_shared_topic() {
        let store = default_store();
        let text = "昨日は会議を開いた。会議を開きます。";
        let (dets, _) = scan(text, &store, &ContextConfig::default());
        let hit = dets
            .iter()
            .find(|d| d.description.contains("時制"))
            .expect("tense mix flagged");
        assert_eq!(hit.original, "ます");
        assert_eq!((hit.start, hit.end), (15, 17));
    }

    #[test]
    fn test_tense_mixing_needs_shared_topic() {
        let store = default_store();
        let text = "昨日は会議を開いた。資料を作ります。";
        let (dets, _) = scan(text, &store, &ContextConfig::default());
        assert!(dets.iter().all(|d| !d.description.contains("時制")));
    }

    #[test]
    fn test_style_discontinuity_flagged_once() {
        let store = default_store();
        let text = "これはペンです。それはペンだ。あれもペンだ。";
        let (dets, _) = scan(text, &store, &ContextConfig::default());
        let hits: Vec<_> = dets
            .iter()
            .filter(|d| d.description.contains("文体"))
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].original, "だ");
        assert_eq!(hits[0].severity, Severity::Low);
    }

    #[test]
    fn test_degraded_without_sentence_boundary() {
        let store = default_store();
        let text = "区切りのないテキスト";
        let (dets, warnings) = scan(text, &store, &ContextConfig::default());
        assert_eq!(warnings, vec![ScanWarning::SegmentationDegraded]);
        assert!(dets.iter().all(|d| !d.description.contains("指示語")));
    }

    #[test]
    fn test_context_rule_pass_runs() {
        let store = default_store();
        let text = "りんごなど等を買う。";
        let (dets, _) = scan(text, &store, &ContextConfig::default());
        let hit = dets.iter().find(|d| d.original == "など等").unwrap();
        assert_eq!(hit.suggestion, "など");
    }
}
