//! Output rendering for scan and apply commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-finding fields with character offsets, a top-level summary, and any
//! scan warnings.

use crate::error::ScanWarning;
use crate::models::{Finding, ScanReport, Severity};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn severity_tag(severity: Severity, color: bool) -> String {
    match severity {
        Severity::High => {
            if color {
                "⟦high⟧".red().bold().to_string()
            } else {
                "⟦high⟧".to_string()
            }
        }
        Severity::Medium => {
            if color {
                "⟦medium⟧".yellow().bold().to_string()
            } else {
                "⟦medium⟧".to_string()
            }
        }
        Severity::Low => {
            if color {
                "⟦low⟧".blue().bold().to_string()
            } else {
                "⟦low⟧".to_string()
            }
        }
    }
}

fn severity_icon(severity: Severity, color: bool) -> String {
    let icon = match severity {
        Severity::High => "✖",
        Severity::Medium => "▲",
        Severity::Low => "◆",
    };
    if !color {
        return icon.to_string();
    }
    match severity {
        Severity::High => icon.red().to_string(),
        Severity::Medium => icon.yellow().to_string(),
        Severity::Low => icon.blue().to_string(),
    }
}

/// Print one finding line in the human format.
fn print_finding(f: &Finding, color: bool) {
    let loc = format!("{}:{}", f.line, f.column);
    let loc = if color {
        loc.bold().to_string()
    } else {
        loc
    };
    println!(
        "{} {} {} ❲{}❳ \"{}\" → \"{}\" — {}",
        severity_icon(f.severity, color),
        severity_tag(f.severity, color),
        loc,
        f.category,
        f.original,
        f.suggestion,
        f.description
    );
}

/// Print scan results in the requested format.
pub fn print_scan(report: &ScanReport, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_scan_json(report)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            for f in &report.findings {
                print_finding(f, color);
            }
            for w in &report.warnings {
                match w {
                    ScanWarning::InvalidRule { rule_id } => eprintln!(
                        "{} {}",
                        crate::utils::warn_prefix(),
                        format!("rule '{}' produced an empty match and was skipped", rule_id)
                    ),
                    ScanWarning::SegmentationDegraded => eprintln!(
                        "{} {}",
                        crate::utils::warn_prefix(),
                        "no sentence boundary found; cross-sentence checks skipped"
                    ),
                }
            }
            let s = &report.summary;
            let summary = format!(
                "— Summary — high={} medium={} low={} (typo={} expression={} context={})",
                s.high, s.medium, s.low, s.typos, s.expressions, s.context
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print apply results: which findings were applied and the corrected text
/// (previewed unless it was written back).
pub fn print_apply(
    findings: &[Finding],
    applied: usize,
    new_text: &str,
    wrote: bool,
    output: &str,
) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_apply_json(findings, applied, new_text, wrote))
                .unwrap()
        ),
        _ => {
            let color = use_colors(output);
            if wrote {
                let line = format!("✏️  applied {} fix(es), file updated", applied);
                if color {
                    println!("{}", line.green().bold());
                } else {
                    println!("{}", line);
                }
            } else {
                println!("applied {} fix(es); preview:", applied);
                println!("{}", new_text);
            }
        }
    }
}

/// Compose scan JSON object (pure) for testing/snapshot purposes.
pub fn compose_scan_json(report: &ScanReport) -> JsonVal {
    // Directly serialize ScanReport as JSON, keeping a stable shape
    serde_json::to_value(report).unwrap()
}

/// Compose apply JSON object (pure) for testing/snapshot purposes.
pub fn compose_apply_json(
    findings: &[Finding],
    applied: usize,
    new_text: &str,
    wrote: bool,
) -> JsonVal {
    json!({
        "applied": applied,
        "wrote": wrote,
        "text": new_text,
        "findings": serde_json::to_value(findings).unwrap(),
    })
}
