//! Lexicon tables and the wide-to-long normalizer.
//!
//! A lexicon arrives in *wide* form: one row per (type, category) group with
//! any number of `Query*` columns. [`normalize`] flattens it into a
//! [`LongLexicon`] holding one [`LexiconEntry`] per non-missing query cell.

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Header of the type column.
pub const TYPE_COLUMN: &str = "Type";

/// Header of the category column.
pub const CATEGORY_COLUMN: &str = "Category";

/// Prefix shared by every query column (`Query`, `Query1`, `Queryx`, ...).
///
/// Matching is case-sensitive.
pub const QUERY_PREFIX: &str = "Query";

/// Turn a raw table cell into an optional value.
///
/// Empty and whitespace-only cells are missing.
pub fn cell(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// One (type, category) group of a wide lexicon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WideRow {
    /// Value of the `Type` column.
    pub kind: String,
    /// Value of the `Category` column.
    pub category: String,
    /// Query cells, aligned with [`WideLexicon::query_columns`].
    pub queries: Vec<Option<String>>,
}

/// A lexicon in wide form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WideLexicon {
    query_columns: Vec<String>,
    rows: Vec<WideRow>,
}

impl WideLexicon {
    /// Create an empty lexicon with the given query column names.
    pub const fn new(query_columns: Vec<String>) -> Self {
        Self {
            query_columns,
            rows: Vec::new(),
        }
    }

    /// Append a row.
    ///
    /// `queries` is padded with missing cells (or truncated) to the number of
    /// query columns. Empty and whitespace-only queries become missing.
    pub fn push_row(
        &mut self,
        kind: impl Into<String>,
        category: impl Into<String>,
        queries: Vec<Option<String>>,
    ) {
        let mut queries: Vec<Option<String>> = queries
            .into_iter()
            .map(|q| q.filter(|s| !s.trim().is_empty()))
            .collect();
        queries.resize(self.query_columns.len(), None);
        self.rows.push(WideRow {
            kind: kind.into(),
            category: category.into(),
            queries,
        });
    }

    /// Build a wide lexicon from a header row and string records.
    ///
    /// Every header starting with [`QUERY_PREFIX`] is a query column, in
    /// header order. Short records are treated as having missing trailing
    /// cells.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingColumn`] if the header lacks
    /// [`TYPE_COLUMN`] or [`CATEGORY_COLUMN`].
    pub fn from_records<H, R, S>(headers: &[H], records: R) -> AnalysisResult<Self>
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Vec<S>>,
        S: AsRef<str>,
    {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.as_ref() == name)
                .ok_or_else(|| AnalysisError::missing_column(name, headers))
        };
        let type_idx = position(TYPE_COLUMN)?;
        let category_idx = position(CATEGORY_COLUMN)?;

        let query_idx: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.as_ref().starts_with(QUERY_PREFIX))
            .map(|(i, _)| i)
            .collect();
        let query_columns = query_idx
            .iter()
            .map(|&i| headers[i].as_ref().to_string())
            .collect();

        let mut lexicon = Self::new(query_columns);
        for record in records {
            let get = |i: usize| record.get(i).and_then(|v| cell(v.as_ref()));
            let queries = query_idx.iter().map(|&i| get(i)).collect();
            lexicon.push_row(
                get(type_idx).unwrap_or_default(),
                get(category_idx).unwrap_or_default(),
                queries,
            );
        }

        tracing::debug!(
            rows = lexicon.rows.len(),
            query_columns = lexicon.query_columns.len(),
            "wide lexicon loaded"
        );
        Ok(lexicon)
    }

    /// Names of the query columns, in column order.
    pub fn query_columns(&self) -> &[String] {
        &self.query_columns
    }

    /// The lexicon rows.
    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the lexicon has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One (type, category, query) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct LexiconEntry {
    /// Lexicon type.
    #[serde(rename = "Type")]
    pub kind: String,
    /// Lexicon category.
    #[serde(rename = "Category")]
    pub category: String,
    /// Search term.
    #[serde(rename = "Query")]
    pub query: String,
}

impl LexiconEntry {
    /// Create an entry.
    pub fn new(
        kind: impl Into<String>,
        category: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            category: category.into(),
            query: query.into(),
        }
    }
}

/// A lexicon in long form: one entry per query.
///
/// Query strings are not required to be unique. When the same term is listed
/// under several groups, the count matrix holds a single column for it and
/// [`LongLexicon::lookup`] resolves to the first entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct LongLexicon {
    entries: Vec<LexiconEntry>,
}

impl LongLexicon {
    /// Wrap an ordered list of entries.
    pub const fn from_entries(entries: Vec<LexiconEntry>) -> Self {
        Self { entries }
    }

    /// The entries, in lexicon order.
    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, LexiconEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose query equals `query`.
    pub fn lookup(&self, query: &str) -> Option<&LexiconEntry> {
        self.entries.iter().find(|e| e.query == query)
    }

    /// Distinct query strings, in first-occurrence order.
    pub fn distinct_queries(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|e| seen.insert(e.query.as_str()))
            .map(|e| e.query.as_str())
            .collect()
    }

    /// Query strings listed more than once, in first-occurrence order.
    pub fn duplicate_queries(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for e in &self.entries {
            *counts.entry(e.query.as_str()).or_default() += 1;
        }
        self.distinct_queries()
            .into_iter()
            .filter(|q| counts.get(q).copied().unwrap_or(0) > 1)
            .collect()
    }
}

impl FromIterator<LexiconEntry> for LongLexicon {
    fn from_iter<I: IntoIterator<Item = LexiconEntry>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LongLexicon {
    type Item = &'a LexiconEntry;
    type IntoIter = std::slice::Iter<'a, LexiconEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Reshape a wide lexicon into long form.
///
/// Rows are visited in order and, within a row, query columns in column
/// order. Missing cells are skipped; a row without queries contributes
/// nothing.
#[tracing::instrument(skip_all, fields(rows = wide.len()))]
pub fn normalize(wide: &WideLexicon) -> LongLexicon {
    let long: LongLexicon = wide
        .rows()
        .iter()
        .flat_map(|row| {
            row.queries
                .iter()
                .flatten()
                .filter(|q| !q.trim().is_empty())
                .map(|q| LexiconEntry::new(&row.kind, &row.category, q))
        })
        .collect();
    tracing::debug!(entries = long.len(), "lexicon normalized");
    long
}
