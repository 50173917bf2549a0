//! Error types for lecat-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while normalizing, scanning or aggregating.
///
/// Every variant aborts the enclosing operation. Missing cells are not
/// errors; they are skipped or counted as zero.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A query substituted into the template did not compile.
    #[error("invalid search pattern `{pattern}` for query `{query}`: {source}")]
    InvalidPattern {
        /// The lexicon term being compiled.
        query: String,
        /// The pattern after substitution.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A required column is absent from the input table.
    #[error("missing column `{column}` (available: {available})")]
    MissingColumn {
        /// The column that was requested.
        column: String,
        /// Comma-separated list of the columns that do exist.
        available: String,
    },

    /// A count-matrix column has no corresponding lexicon entry.
    #[error("query `{query}` has no lexicon entry")]
    Lookup {
        /// The orphaned query string.
        query: String,
    },

    /// The pattern template does not contain the `query` placeholder.
    #[error("pattern template `{template}` does not contain the `query` placeholder")]
    InvalidTemplate {
        /// The rejected template.
        template: String,
    },
}

impl AnalysisError {
    /// Build a [`AnalysisError::MissingColumn`] from the requested name and
    /// the header row that lacked it.
    pub fn missing_column<S: AsRef<str>>(column: &str, headers: &[S]) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            available: headers
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;
