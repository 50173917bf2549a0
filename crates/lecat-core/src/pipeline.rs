//! End-to-end analysis: normalize, scan, aggregate.
//!
//! [`run_analysis`] chains the four stages and returns every intermediate
//! table in a [`LecatReport`], which is what the CLI serializes.

use schemars::JsonSchema;
use serde::Serialize;

use crate::corpus::Corpus;
use crate::diagnostics::{DiagnosticsTable, aggregate};
use crate::error::AnalysisResult;
use crate::lexicon::{LexiconEntry, LongLexicon, WideLexicon, normalize};
use crate::matcher::PatternTemplate;
use crate::scanner::{CountMatrix, scan_with_progress};

/// Settings for one analysis run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Search pattern template.
    pub template: PatternTemplate,
    /// Corpus column holding the text to search.
    pub text_column: String,
    /// Evaluate queries on the rayon pool.
    pub parallel: bool,
}

impl ScanOptions {
    /// Options with the default template, sequential scanning.
    pub fn new(text_column: impl Into<String>) -> Self {
        Self {
            template: PatternTemplate::default(),
            text_column: text_column.into(),
            parallel: false,
        }
    }
}

/// All tables produced by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct LecatReport {
    /// Pattern template the queries were substituted into.
    pub template: String,
    /// Escape mode used for substitution.
    pub escape: crate::matcher::EscapeMode,
    /// Long-form lexicon.
    pub lexicon: LongLexicon,
    /// Query strings listed under more than one type/category.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duplicate_queries: Vec<String>,
    /// Document × query match counts.
    pub counts: CountMatrix,
    /// Per-query totals.
    pub diagnostics: DiagnosticsTable,
}

/// Run the full pipeline.
///
/// # Errors
///
/// Propagates [`crate::AnalysisError`] from scanning and aggregation.
pub fn run_analysis(
    wide: &WideLexicon,
    corpus: &Corpus,
    options: &ScanOptions,
) -> AnalysisResult<LecatReport> {
    run_analysis_with_progress(wide, corpus, options, &|_| {})
}

/// Run the full pipeline, reporting each finished lexicon entry.
///
/// # Errors
///
/// See [`run_analysis`].
#[tracing::instrument(
    skip_all,
    fields(text_column = %options.text_column, parallel = options.parallel)
)]
pub fn run_analysis_with_progress(
    wide: &WideLexicon,
    corpus: &Corpus,
    options: &ScanOptions,
    on_entry: &(dyn Fn(&LexiconEntry) + Sync),
) -> AnalysisResult<LecatReport> {
    let lexicon = normalize(wide);
    let duplicate_queries: Vec<String> = lexicon
        .duplicate_queries()
        .into_iter()
        .map(str::to_string)
        .collect();
    for query in &duplicate_queries {
        tracing::warn!(
            query = %query,
            "query listed under several type/category pairs; diagnostics report the first"
        );
    }

    let counts = scan_with_progress(
        &lexicon,
        corpus,
        &options.template,
        &options.text_column,
        options.parallel,
        on_entry,
    )?;
    let diagnostics = aggregate(&lexicon, &counts)?;

    Ok(LecatReport {
        template: options.template.as_str().to_string(),
        escape: options.template.escape(),
        lexicon,
        duplicate_queries,
        counts,
        diagnostics,
    })
}
