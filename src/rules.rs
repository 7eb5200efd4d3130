//! Immutable rule store.
//!
//! Rules are loaded once from TOML tables (plus an auxiliary known-good word
//! list for the adjacent-key heuristic), validated strictly, grouped by
//! category, and shared read-only across concurrent scans. Malformed entries
//! abort loading with `RuleLoadError`; no partial rule set is used.

use crate::error::RuleLoadError;
use crate::models::rule::RuleFile;
use crate::models::{Category, Severity};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Bundled default tables so the binary works with no setup.
const DEFAULT_TYPO: &str = include_str!("../rules/typo.toml");
const DEFAULT_EXPRESSION: &str = include_str!("../rules/expression.toml");
const DEFAULT_CONTEXT: &str = include_str!("../rules/context.toml");
const DEFAULT_WORDS: &str = include_str!("../rules/words.txt");

#[derive(Debug)]
/// A validated, compiled rule.
pub struct Rule {
    pub id: String,
    pub regex: Regex,
    pub replacement: String,
    pub category: Category,
    pub severity: Severity,
    pub description: String,
}

/// Loaded and indexed rule tables. No mutation after construction.
#[derive(Debug)]
pub struct RuleStore {
    typo: Vec<Rule>,
    expression: Vec<Rule>,
    context: Vec<Rule>,
    dictionary: HashSet<String>,
}

impl RuleStore {
    /// Build the store from the bundled default tables.
    pub fn load_defaults() -> Result<RuleStore, RuleLoadError> {
        Self::from_sources(
            &[
                ("<builtin>/typo.toml", DEFAULT_TYPO),
                ("<builtin>/expression.toml", DEFAULT_EXPRESSION),
                ("<builtin>/context.toml", DEFAULT_CONTEXT),
            ],
            DEFAULT_WORDS,
        )
    }

    /// Load rule tables from a directory. Expects `typo.toml`,
    /// `expression.toml`, and `context.toml`; a missing table is treated as
    /// empty. An optional `words.txt` replaces the bundled dictionary.
    pub fn load_dir(dir: &Path) -> Result<RuleStore, RuleLoadError> {
        let mut sources: Vec<(String, String)> = Vec::new();
        for name in ["typo.toml", "expression.toml", "context.toml"] {
            let path = dir.join(name);
            if !path.exists() {
                continue;
            }
            let data = fs::read_to_string(&path).map_err(|e| RuleLoadError::Io {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            sources.push((path.to_string_lossy().to_string(), data));
        }
        let words_path = dir.join("words.txt");
        let words = if words_path.exists() {
            fs::read_to_string(&words_path).map_err(|e| RuleLoadError::Io {
                path: words_path.to_string_lossy().to_string(),
                source: e,
            })?
        } else {
            DEFAULT_WORDS.to_string()
        };
        let named: Vec<(&str, &str)> = sources
            .iter()
            .map(|(p, d)| (p.as_str(), d.as_str()))
            .collect();
        Self::from_sources(&named, &words)
    }

    fn from_sources(tables: &[(&str, &str)], words: &str) -> Result<RuleStore, RuleLoadError> {
        let mut typo = Vec::new();
        let mut expression = Vec::new();
        let mut context = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for (path, data) in tables {
            let file: RuleFile = toml::from_str(data).map_err(|e| RuleLoadError::Parse {
                path: (*path).to_string(),
                source: e,
            })?;
            for entry in file.rules {
                if entry.pattern.is_empty() {
                    return Err(RuleLoadError::EmptyPattern { id: entry.id });
                }
                if !seen.insert(entry.id.clone()) {
                    return Err(RuleLoadError::DuplicateId { id: entry.id });
                }
                let regex = Regex::new(&entry.pattern).map_err(|e| RuleLoadError::BadPattern {
                    id: entry.id.clone(),
                    source: e,
                })?;
                let rule = Rule {
                    id: entry.id,
                    regex,
                    replacement: entry.replacement,
                    category: entry.category,
                    severity: entry.severity,
                    description: entry.description,
                };
                match rule.category {
                    Category::Typo => typo.push(rule),
                    Category::Expression => expression.push(rule),
                    Category::Context => context.push(rule),
                }
            }
        }
        let dictionary = words
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| l.to_ascii_lowercase())
            .collect();
        Ok(RuleStore {
            typo,
            expression,
            context,
            dictionary,
        })
    }

    /// Rules for one category, in registration order.
    pub fn rules(&self, category: Category) -> &[Rule] {
        match category {
            Category::Typo => &self.typo,
            Category::Expression => &self.expression,
            Category::Context => &self.context,
        }
    }

    /// Known-good word forms for the adjacent-key heuristic (lowercased).
    pub fn dictionary(&self) -> &HashSet<String> {
        &self.dictionary
    }

    pub fn len(&self) -> usize {
        self.typo.len() + self.expression.len() + self.context.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
impl RuleStore {
    /// Build a store from one inline table, with the bundled dictionary.
    pub(crate) fn from_table_for_tests(table: &str) -> RuleStore {
        Self::from_sources(&[("test.toml", table)], DEFAULT_WORDS).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_defaults() {
        let store = RuleStore::load_defaults().unwrap();
        assert!(!store.rules(Category::Typo).is_empty());
        assert!(!store.rules(Category::Expression).is_empty());
        assert!(store.dictionary().contains("test"));
    }

    #[test]
    fn test_load_dir_and_missing_tables_are_empty() {
        let dir = tempdir().unwrap();
        let mut f = fs::File::create(dir.path().join("typo.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
[[rule]]
id = "w-kana"
pattern = "こんにちわ"
replacement = "こんにちは"
category = "typo"
severity = "high"
description = "仮名遣いの誤り"
"#
        )
        .unwrap();
        let store = RuleStore::load_dir(dir.path()).unwrap();
        assert_eq!(store.rules(Category::Typo).len(), 1);
        assert!(store.rules(Category::Expression).is_empty());
        // Bundled dictionary is used when words.txt is absent
        assert!(store.dictionary().contains("test"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let table = r#"
[[rule]]
id = "dup"
pattern = "a"
replacement = "b"
category = "typo"
severity = "low"

[[rule]]
id = "dup"
pattern = "c"
replacement = "d"
category = "expression"
severity = "low"
"#;
        let err = RuleStore::from_sources(&[("t.toml", table)], "").unwrap_err();
        assert!(matches!(err, RuleLoadError::DuplicateId { id } if id == "dup"));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let table = r#"
[[rule]]
id = "empty"
pattern = ""
replacement = "x"
category = "typo"
severity = "low"
"#;
        let err = RuleStore::from_sources(&[("t.toml", table)], "").unwrap_err();
        assert!(matches!(err, RuleLoadError::EmptyPattern { .. }));
    }

    #[test]
    fn test_bad_regex_rejected() {
        let table = r#"
[[rule]]
id = "bad"
pattern = "["
replacement = "x"
category = "typo"
severity = "low"
"#;
        let err = RuleStore::from_sources(&[("t.toml", table)], "").unwrap_err();
        assert!(matches!(err, RuleLoadError::BadPattern { .. }));
    }

    #[test]
    fn test_invalid_severity_fails_parse() {
        let table = r#"
[[rule]]
id = "sev"
pattern = "a"
replacement = "b"
category = "typo"
severity = "critical"
"#;
        let err = RuleStore::from_sources(&[("t.toml", table)], "").unwrap_err();
        assert!(matches!(err, RuleLoadError::Parse { .. }));
    }
}
