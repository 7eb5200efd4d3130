//! Kousei CLI binary entry point.
//! Delegates to modules for scan/apply and prints results.

mod aggregate;
mod checkers;
mod cli;
mod config;
mod error;
mod models;
mod output;
mod rules;
mod scan;
mod session;
mod text;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};
use rules::RuleStore;
use session::Document;
use std::fs;

fn load_store(rules_dir: Option<&std::path::Path>) -> RuleStore {
    let loaded = match rules_dir {
        Some(dir) => RuleStore::load_dir(dir),
        None => RuleStore::load_defaults(),
    };
    match loaded {
        Ok(store) => store,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            std::process::exit(2);
        }
    }
}

fn read_input(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{} {}",
                utils::error_prefix(),
                format!("cannot read '{}': {}", path, e)
            );
            std::process::exit(2);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Scan {
            file,
            root,
            rules,
            output,
            no_typos,
            no_expressions,
            no_context,
            timeout_ms,
        } => {
            let eff = config::resolve_effective(
                root.as_deref(),
                rules.as_deref(),
                output.as_deref(),
                no_typos,
                no_expressions,
                no_context,
                timeout_ms,
            );
            if config::load_config(&eff.root).is_none() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No kousei.toml found; using defaults."
                );
            }
            let store = load_store(eff.rules_dir.as_deref());
            let text = read_input(&file);
            let report = match scan::scan(&text, &store, &eff.scan) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            };
            output::print_scan(&report, &eff.output);
            if report.summary.high > 0 {
                std::process::exit(1);
            }
        }
        Commands::Apply {
            file,
            id,
            all,
            write,
            root,
            rules,
            output,
        } => {
            if id.is_none() && !all {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    "pass --id <N> or --all to select what to apply"
                );
                std::process::exit(2);
            }
            let eff = config::resolve_effective(
                root.as_deref(),
                rules.as_deref(),
                output.as_deref(),
                false,
                false,
                false,
                None,
            );
            if config::load_config(&eff.root).is_none() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No kousei.toml found; using defaults."
                );
            }
            let store = load_store(eff.rules_dir.as_deref());
            let text = read_input(&file);
            let report = match scan::scan(&text, &store, &eff.scan) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            };
            let mut doc = Document::new(text, report.findings);
            let applied = if all {
                doc.apply_all_pending()
            } else {
                // Ids are stable for one snapshot: a rescan of the same
                // text reproduces the ids a previous scan printed.
                match doc.apply(id.unwrap()) {
                    Ok(()) => 1,
                    Err(e) => {
                        eprintln!("{} {}", utils::error_prefix(), e);
                        std::process::exit(2);
                    }
                }
            };
            if write {
                if let Err(e) = fs::write(&file, doc.text()) {
                    eprintln!(
                        "{} {}",
                        utils::error_prefix(),
                        format!("cannot write '{}': {}", file, e)
                    );
                    std::process::exit(2);
                }
            }
            output::print_apply(doc.findings(), applied, doc.text(), write, &eff.output);
        }
    }
}
