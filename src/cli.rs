//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kousei",
    version,
    about = "Kousei — rule-based Japanese proofreading",
    long_about = "Kousei — a fast CLI that scans Japanese text for typos, inappropriate expressions, and contextual inconsistencies, and applies suggested fixes.\n\nConfiguration precedence: CLI > kousei.toml > defaults.",
    after_help = "Examples:\n  kousei scan draft.txt\n  kousei scan draft.txt --output json --no-context\n  kousei apply draft.txt --id 3\n  kousei apply draft.txt --all --write",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for scanning and fixing documents.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current kousei version.")]
    Version,
    /// Scan a text file and report findings
    #[command(
        about = "Run proofreading checks",
        long_about = "Scan a UTF-8 text file with the typo, expression, and context checkers. Exit code 1 when any high-severity finding exists.",
        after_help = "Examples:\n  kousei scan draft.txt\n  kousei scan draft.txt --rules tables/ --output json"
    )]
    Scan {
        #[arg(help = "Text file to proofread")]
        file: String,
        #[arg(long, help = "Working root (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Directory with rule tables (default: bundled)")]
        rules: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Disable the typo checker")]
        no_typos: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Disable the expression checker")]
        no_expressions: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Disable the context checker")]
        no_context: bool,
        #[arg(long, help = "Wall-clock scan budget in milliseconds")]
        timeout_ms: Option<u64>,
    },
    /// Apply suggested fixes to a text file
    #[command(
        about = "Apply suggested fixes",
        long_about = "Rescan the file, apply one finding by id (or every pending finding left-to-right with --all), and print the corrected text. Without --write the file is left untouched.",
        after_help = "Examples:\n  kousei apply draft.txt --id 3\n  kousei apply draft.txt --all --write"
    )]
    Apply {
        #[arg(help = "Text file to fix")]
        file: String,
        #[arg(long, help = "Finding id to apply (from a previous scan)")]
        id: Option<u64>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Apply every pending finding")]
        all: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Write changes back to the file")]
        write: bool,
        #[arg(long, help = "Working root (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Directory with rule tables (default: bundled)")]
        rules: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
