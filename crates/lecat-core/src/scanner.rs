//! Corpus scanning: the document × query count matrix.
//!
//! [`scan`] runs the query matcher once per long-lexicon entry and writes the
//! counts into the column named by the entry's query. A query listed under
//! several groups shares one column; the last write wins, which is
//! indistinguishable from the first because matching is pure.
//!
//! [`scan_parallel`] evaluates entries on the rayon pool. Each worker
//! produces whole columns and the merge happens afterwards in lexicon order.

use std::collections::HashMap;

use rayon::prelude::*;
use schemars::JsonSchema;
use serde::Serialize;

use crate::corpus::Corpus;
use crate::error::AnalysisResult;
use crate::lexicon::{LexiconEntry, LongLexicon};
use crate::matcher::{PatternTemplate, count_matches};

/// Match counts indexed by document identifier and query.
///
/// Stored column-major: one `Vec<usize>` per query, aligned with
/// [`CountMatrix::documents`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CountMatrix {
    documents: Vec<String>,
    queries: Vec<String>,
    columns: Vec<Vec<usize>>,
    #[serde(skip)]
    #[schemars(skip)]
    index: HashMap<String, usize>,
}

impl CountMatrix {
    /// Preallocate a zero matrix.
    ///
    /// Repeated query names collapse onto their first position.
    pub fn new<S: AsRef<str>>(documents: Vec<String>, queries: &[S]) -> Self {
        let mut matrix = Self {
            columns: Vec::with_capacity(queries.len()),
            documents,
            ..Self::default()
        };
        for q in queries {
            matrix.ensure_column(q.as_ref());
        }
        matrix
    }

    fn ensure_column(&mut self, query: &str) -> usize {
        if let Some(&i) = self.index.get(query) {
            return i;
        }
        let i = self.queries.len();
        self.queries.push(query.to_string());
        self.columns.push(vec![0; self.documents.len()]);
        self.index.insert(query.to_string(), i);
        i
    }

    /// Overwrite the column for `query`, appending it if new.
    ///
    /// `counts` is padded with zeros (or truncated) to the number of
    /// documents.
    pub fn set_column(&mut self, query: &str, mut counts: Vec<usize>) {
        counts.resize(self.documents.len(), 0);
        let i = self.ensure_column(query);
        self.columns[i] = counts;
    }

    /// Document identifiers (row labels).
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Query strings (column labels), in column order.
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// Counts for one query.
    pub fn column(&self, query: &str) -> Option<&[usize]> {
        self.index.get(query).map(|&i| self.columns[i].as_slice())
    }

    /// Iterate over `(query, counts)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.queries
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Iterate over `(document, counts)` rows, counts in column order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, Vec<usize>)> {
        self.documents
            .iter()
            .enumerate()
            .map(|(r, doc)| (doc.as_str(), self.columns.iter().map(|c| c[r]).collect()))
    }

    /// Count for a single cell.
    pub fn get(&self, document: usize, query: &str) -> Option<usize> {
        self.column(query).and_then(|c| c.get(document).copied())
    }

    /// Number of rows.
    pub fn n_documents(&self) -> usize {
        self.documents.len()
    }

    /// Number of columns.
    pub fn n_queries(&self) -> usize {
        self.queries.len()
    }
}

/// Scan the corpus for every lexicon entry.
///
/// # Errors
///
/// Returns [`crate::AnalysisError::MissingColumn`] before any matching if
/// `text_column` is not in the corpus, and
/// [`crate::AnalysisError::InvalidPattern`] if a query's pattern does not
/// compile.
pub fn scan(
    lexicon: &LongLexicon,
    corpus: &Corpus,
    template: &PatternTemplate,
    text_column: &str,
) -> AnalysisResult<CountMatrix> {
    scan_with_progress(lexicon, corpus, template, text_column, false, &|_| {})
}

/// Same as [`scan`], evaluating queries in parallel.
///
/// # Errors
///
/// See [`scan`]. When several patterns are invalid, which one is reported is
/// unspecified.
pub fn scan_parallel(
    lexicon: &LongLexicon,
    corpus: &Corpus,
    template: &PatternTemplate,
    text_column: &str,
) -> AnalysisResult<CountMatrix> {
    scan_with_progress(lexicon, corpus, template, text_column, true, &|_| {})
}

/// Scan with a callback invoked once per finished lexicon entry.
///
/// With `parallel` set, the callback runs on worker threads in completion
/// order.
///
/// # Errors
///
/// See [`scan`].
#[tracing::instrument(
    skip_all,
    fields(
        entries = lexicon.len(),
        documents = corpus.len(),
        text_column = %text_column,
        parallel = parallel
    )
)]
pub fn scan_with_progress(
    lexicon: &LongLexicon,
    corpus: &Corpus,
    template: &PatternTemplate,
    text_column: &str,
    parallel: bool,
    on_entry: &(dyn Fn(&LexiconEntry) + Sync),
) -> AnalysisResult<CountMatrix> {
    let texts = corpus.text_column(text_column)?;
    let mut matrix = CountMatrix::new(corpus.ids().to_vec(), &lexicon.distinct_queries());

    let run = |entry: &LexiconEntry| -> AnalysisResult<Vec<usize>> {
        let counts = count_matches(texts, &entry.query, template)?;
        on_entry(entry);
        Ok(counts)
    };

    if parallel {
        let columns = lexicon
            .entries()
            .par_iter()
            .map(run)
            .collect::<AnalysisResult<Vec<_>>>()?;
        for (entry, counts) in lexicon.iter().zip(columns) {
            matrix.set_column(&entry.query, counts);
        }
    } else {
        for entry in lexicon {
            matrix.set_column(&entry.query, run(entry)?);
        }
    }

    tracing::info!(
        documents = matrix.n_documents(),
        queries = matrix.n_queries(),
        "scan complete"
    );
    Ok(matrix)
}
