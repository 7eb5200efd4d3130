//! Kousei core library.
//!
//! This crate exposes programmatic APIs for rule-based Japanese text
//! proofreading: scanning text for typos, inappropriate expressions, and
//! contextual inconsistencies, and applying suggested fixes to a document
//! while keeping the remaining findings' positions valid.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `rules`: Immutable rule store loaded from TOML rule tables.
//! - `checkers`: Typo, expression, and context checkers.
//! - `aggregate`: Merging checker outputs into one ordered finding list.
//! - `scan`: Parallel checker orchestration with an optional time budget.
//! - `session`: Document state, fix application, and per-session locking.
//! - `models`: Data models for rules, findings, and scan output structs.
//! - `output`: Human/JSON printers for scan/apply.
//! - `error`: Error and warning taxonomy.
//! - `text`: Character-offset bookkeeping and sentence segmentation.
//!
//! Note: All documentation comments are written in English by convention.
pub mod aggregate;
pub mod checkers;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod rules;
pub mod scan;
pub mod session;
pub mod text;
pub mod utils;
