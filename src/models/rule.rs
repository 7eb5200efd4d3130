//! Rule table schema loaded from TOML files.
//!
//! A table is a list of `[[rule]]` entries. Category and severity are strict
//! enums so loosely-shaped entries fail at load time instead of at match
//! time. Entries keep file order; within a category, evaluation order is
//! significant (first match wins at a given start offset).

use super::{Category, Severity};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
/// Top-level rule table file.
pub struct RuleFile {
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Clone, Deserialize)]
/// One declarative pattern -> replacement entry.
pub struct RuleEntry {
    pub id: String,
    /// Regex applied left-to-right over the text. Capture groups may be
    /// referenced from `replacement` as `$1`, `$2`, ...
    pub pattern: String,
    pub replacement: String,
    pub category: Category,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
}
