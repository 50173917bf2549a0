//! Core library for lecat: lexicon-based content analysis.
//!
//! Given a lexicon of search terms grouped by type and category, and a
//! corpus of documents, lecat counts every term in every document and rolls
//! the counts up into per-term diagnostics.
//!
//! # Modules
//!
//! - [`lexicon`] - Wide and long lexicon tables, [`normalize`]
//! - [`matcher`] - Pattern templates and per-document match counts
//! - [`corpus`] - The corpus table
//! - [`scanner`] - The document × query [`CountMatrix`]
//! - [`diagnostics`] - Per-query `unique` / `total` rollup
//! - [`pipeline`] - All of the above in one call
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use lecat_core::{Corpus, ScanOptions, WideLexicon, run_analysis};
//!
//! let mut lexicon = WideLexicon::new(vec!["Query1".into(), "Query2".into()]);
//! lexicon.push_row("emotion", "joy", vec![Some("happy".into()), Some("glad".into())]);
//!
//! let corpus = Corpus::new(vec!["a".into(), "b".into()])
//!     .with_column("text", vec![Some("I am happy".into()), Some("so glad".into())]);
//!
//! let report = run_analysis(&lexicon, &corpus, &ScanOptions::new("text")).unwrap();
//! assert_eq!(report.diagnostics.get("happy").unwrap().total, 1);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod corpus;
pub mod diagnostics;
pub mod error;
pub mod lexicon;
pub mod matcher;
pub mod pipeline;
pub mod scanner;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use corpus::Corpus;
pub use diagnostics::{DiagnosticsTable, QueryDiagnostics, aggregate};
pub use error::{AnalysisError, AnalysisResult, ConfigError, ConfigResult};
pub use lexicon::{LexiconEntry, LongLexicon, WideLexicon, normalize};
pub use matcher::{EscapeMode, PatternTemplate, count_matches};
pub use pipeline::{LecatReport, ScanOptions, run_analysis, run_analysis_with_progress};
pub use scanner::{CountMatrix, scan, scan_parallel, scan_with_progress};

/// Default maximum size of a lexicon or corpus file (50 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;
