//! Configuration discovery and effective settings resolution.
//!
//! Kousei reads `kousei.toml|yaml|yml` from the working directory (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `rules`: bundled tables
//! - `output`: `human`
//! - `scan.typos|expressions|context`: true
//! - `scan.timeout_ms`: none
//! - `typo.max_run_{kana,latin,other}`: 1, 1, 2
//! - `context.window_sentences`: 2, `context.min_antecedents`: 2
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::checkers::context::ContextConfig;
use crate::checkers::typo::TypoConfig;
use crate::scan::ScanOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Default, Deserialize, Clone)]
/// Scan-related configuration section under `[scan]`.
pub struct ScanCfg {
    pub typos: Option<bool>,
    pub expressions: Option<bool>,
    pub context: Option<bool>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Duplicate-run knobs under `[typo]`.
pub struct TypoCfg {
    pub max_run_kana: Option<usize>,
    pub max_run_latin: Option<usize>,
    pub max_run_other: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Cross-sentence heuristic knobs under `[context]`.
pub struct ContextCfg {
    pub window_sentences: Option<usize>,
    pub min_antecedents: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `kousei.toml|yaml`.
pub struct KouseiConfig {
    /// Directory holding rule tables; bundled defaults when absent.
    pub rules: Option<String>,
    pub output: Option<String>,
    pub scan: Option<ScanCfg>,
    pub typo: Option<TypoCfg>,
    pub context: Option<ContextCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub rules_dir: Option<PathBuf>,
    pub output: String,
    pub scan: ScanOptions,
}

/// Walk upward from `start` to find the configuration root.
///
/// Stops when a `kousei.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("kousei.toml").exists()
            || cur.join("kousei.yaml").exists()
            || cur.join("kousei.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `KouseiConfig` from `kousei.toml` or `kousei.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<KouseiConfig> {
    let toml_path = root.join("kousei.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: KouseiConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["kousei.yaml", "kousei.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: KouseiConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and
/// defaults.
pub fn resolve_effective(
    cli_root: Option<&str>,
    cli_rules: Option<&str>,
    cli_output: Option<&str>,
    cli_no_typos: bool,
    cli_no_expressions: bool,
    cli_no_context: bool,
    cli_timeout_ms: Option<u64>,
) -> Effective {
    let start = PathBuf::from(cli_root.unwrap_or("."));
    let root = detect_root(&start);
    let cfg = load_config(&root).unwrap_or_default();

    let rules_dir = cli_rules
        .map(|s| s.to_string())
        .or(cfg.rules)
        .map(|s| {
            let p = PathBuf::from(&s);
            if p.is_absolute() {
                p
            } else {
                root.join(p)
            }
        });

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let scan_cfg = cfg.scan.unwrap_or_default();
    let typos = if cli_no_typos {
        false
    } else {
        scan_cfg.typos.unwrap_or(true)
    };
    let expressions = if cli_no_expressions {
        false
    } else {
        scan_cfg.expressions.unwrap_or(true)
    };
    let context = if cli_no_context {
        false
    } else {
        scan_cfg.context.unwrap_or(true)
    };
    let timeout = cli_timeout_ms
        .or(scan_cfg.timeout_ms)
        .map(Duration::from_millis);

    let typo_cfg = cfg.typo.unwrap_or_default();
    let typo_defaults = TypoConfig::default();
    let typo = TypoConfig {
        max_run_kana: typo_cfg.max_run_kana.unwrap_or(typo_defaults.max_run_kana),
        max_run_latin: typo_cfg
            .max_run_latin
            .unwrap_or(typo_defaults.max_run_latin),
        max_run_other: typo_cfg
            .max_run_other
            .unwrap_or(typo_defaults.max_run_other),
    };

    let context_cfg = cfg.context.unwrap_or_default();
    let context_defaults = ContextConfig::default();
    let context_opts = ContextConfig {
        window_sentences: context_cfg
            .window_sentences
            .unwrap_or(context_defaults.window_sentences),
        min_antecedents: context_cfg
            .min_antecedents
            .unwrap_or(context_defaults.min_antecedents),
    };

    Effective {
        root,
        rules_dir,
        output,
        scan: ScanOptions {
            no_typos: !typos,
            no_expressions: !expressions,
            no_context: !context,
            timeout,
            typo,
            context: context_opts,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("kousei.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
rules = "mytables"
output = "json"
[scan]
context = false
timeout_ms = 5000
"#
        )
        .unwrap();

        // Resolve using explicit root to avoid global CWD races
        let eff = resolve_effective(root.to_str(), None, None, false, false, false, None);
        assert_eq!(eff.rules_dir, Some(root.join("mytables")));
        assert_eq!(eff.output, "json");
        assert!(eff.scan.no_context);
        assert!(!eff.scan.no_typos);
        assert_eq!(eff.scan.timeout, Some(Duration::from_millis(5000)));
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("kousei.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output: human
typo:
  max_run_other: 3
"#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, false, false, false, None);
        assert_eq!(eff.output, "human");
        assert_eq!(eff.rules_dir, None);
        assert_eq!(eff.scan.typo.max_run_other, 3);
        // Unspecified knobs keep their defaults
        assert_eq!(eff.scan.typo.max_run_kana, 1);
        assert_eq!(eff.scan.context.window_sentences, 2);
    }

    #[test]
    fn test_cli_precedence_over_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("kousei.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "human"
[scan]
typos = true
"#
        )
        .unwrap();

        let eff = resolve_effective(
            root.to_str(),
            Some("cli-rules"),
            Some("json"),
            true,
            false,
            false,
            Some(100),
        );
        assert_eq!(eff.output, "json");
        assert!(eff.scan.no_typos);
        assert_eq!(eff.rules_dir, Some(root.join("cli-rules")));
        assert_eq!(eff.scan.timeout, Some(Duration::from_millis(100)));
    }
}
