//! Per-query diagnostics: total occurrences and document coverage.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::lexicon::{LexiconEntry, LongLexicon};
use crate::scanner::CountMatrix;

/// Summary of one count-matrix column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QueryDiagnostics {
    /// The query string.
    #[serde(rename = "Query")]
    pub query: String,
    /// Type of the first lexicon entry listing this query.
    #[serde(rename = "Type")]
    pub kind: String,
    /// Category of the first lexicon entry listing this query.
    #[serde(rename = "Category")]
    pub category: String,
    /// Number of documents with at least one match.
    pub unique: usize,
    /// Sum of matches over all documents.
    pub total: usize,
}

/// One row per count-matrix column, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DiagnosticsTable {
    rows: Vec<QueryDiagnostics>,
}

impl DiagnosticsTable {
    /// The rows.
    pub fn rows(&self) -> &[QueryDiagnostics] {
        &self.rows
    }

    /// Row for `query`, if present.
    pub fn get(&self, query: &str) -> Option<&QueryDiagnostics> {
        self.rows.iter().find(|r| r.query == query)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, QueryDiagnostics> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticsTable {
    type Item = &'a QueryDiagnostics;
    type IntoIter = std::slice::Iter<'a, QueryDiagnostics>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Roll the count matrix up into one diagnostics row per query.
///
/// Type and category come from the first lexicon entry whose query equals
/// the column name.
///
/// # Errors
///
/// Returns [`AnalysisError::Lookup`] if a column has no lexicon entry.
#[tracing::instrument(skip_all, fields(queries = matrix.n_queries()))]
pub fn aggregate(
    lexicon: &LongLexicon,
    matrix: &CountMatrix,
) -> AnalysisResult<DiagnosticsTable> {
    let mut first: HashMap<&str, &LexiconEntry> = HashMap::new();
    for entry in lexicon {
        first.entry(entry.query.as_str()).or_insert(entry);
    }

    let rows = matrix
        .columns()
        .map(|(query, counts)| {
            let entry = first.get(query).ok_or_else(|| AnalysisError::Lookup {
                query: query.to_string(),
            })?;
            Ok(QueryDiagnostics {
                query: query.to_string(),
                kind: entry.kind.clone(),
                category: entry.category.clone(),
                unique: counts.iter().filter(|&&c| c > 0).count(),
                total: counts.iter().sum(),
            })
        })
        .collect::<AnalysisResult<Vec<_>>>()?;
    Ok(DiagnosticsTable { rows })
}
