//! Corpus table: documents keyed by identifier with named text columns.

use crate::error::{AnalysisError, AnalysisResult};
use crate::lexicon::cell;

/// Default name of the document identifier column.
pub const DEFAULT_ID_COLUMN: &str = "description";

/// A corpus of documents.
///
/// Identifiers label the rows of the count matrix. They are expected to be
/// unique but this is not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    ids: Vec<String>,
    headers: Vec<String>,
    columns: Vec<Vec<Option<String>>>,
}

impl Corpus {
    /// Create a corpus with the given document identifiers and no columns.
    pub const fn new(ids: Vec<String>) -> Self {
        Self {
            ids,
            headers: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Add (or replace) a named column.
    ///
    /// `values` is padded with missing cells (or truncated) to the number of
    /// documents.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, mut values: Vec<Option<String>>) -> Self {
        let name = name.into();
        values.resize(self.ids.len(), None);
        match self.headers.iter().position(|h| *h == name) {
            Some(i) => self.columns[i] = values,
            None => {
                self.headers.push(name);
                self.columns.push(values);
            }
        }
        self
    }

    /// Build a corpus from a header row and string records.
    ///
    /// All columns are kept; `id_column` supplies the identifiers. Empty
    /// cells are missing.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingColumn`] if `id_column` is not in the
    /// header.
    pub fn from_records<H, R, S>(headers: &[H], records: R, id_column: &str) -> AnalysisResult<Self>
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Vec<S>>,
        S: AsRef<str>,
    {
        let id_idx = headers
            .iter()
            .position(|h| h.as_ref() == id_column)
            .ok_or_else(|| AnalysisError::missing_column(id_column, headers))?;

        let mut ids = Vec::new();
        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for record in records {
            for (i, column) in columns.iter_mut().enumerate() {
                column.push(record.get(i).and_then(|v| cell(v.as_ref())));
            }
            ids.push(columns[id_idx].last().cloned().flatten().unwrap_or_default());
        }

        tracing::debug!(documents = ids.len(), columns = headers.len(), "corpus loaded");
        Ok(Self {
            ids,
            headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            columns,
        })
    }

    /// Document identifiers, in corpus order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Column names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the corpus has no documents.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Cells of the named column, if present.
    pub fn column(&self, name: &str) -> Option<&[Option<String>]> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Cells of the text column to search.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingColumn`] if the column is absent.
    pub fn text_column(&self, name: &str) -> AnalysisResult<&[Option<String>]> {
        self.column(name)
            .ok_or_else(|| AnalysisError::missing_column(name, &self.headers))
    }
}
