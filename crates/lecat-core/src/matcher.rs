//! Query matching: pattern templates and per-document match counts.
//!
//! A [`PatternTemplate`] is regex text containing the placeholder
//! [`PLACEHOLDER`]. Rendering a template for a query substitutes the query
//! (escaped or raw, per [`EscapeMode`]) for every placeholder occurrence.
//! [`count_matches`] then counts non-overlapping, case-sensitive matches of
//! the compiled pattern in each document.

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Placeholder token replaced by the query term.
pub const PLACEHOLDER: &str = "query";

/// Whole-word template: the query bounded by word boundaries.
pub const DEFAULT_TEMPLATE: &str = r"\bquery\b";

/// How a query term is spliced into the template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum EscapeMode {
    /// Escape regex metacharacters so the term matches literally.
    #[default]
    Literal,
    /// Insert the term verbatim; lexicon terms may use regex syntax.
    Raw,
}

impl EscapeMode {
    /// Returns the mode as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Raw => "raw",
        }
    }
}

impl std::fmt::Display for EscapeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search pattern template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTemplate {
    template: String,
    escape: EscapeMode,
}

impl Default for PatternTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            escape: EscapeMode::default(),
        }
    }
}

impl PatternTemplate {
    /// Create a template using [`EscapeMode::Literal`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidTemplate`] if `template` does not
    /// contain [`PLACEHOLDER`].
    pub fn new(template: impl Into<String>) -> AnalysisResult<Self> {
        let template = template.into();
        if !template.contains(PLACEHOLDER) {
            return Err(AnalysisError::InvalidTemplate { template });
        }
        Ok(Self {
            template,
            escape: EscapeMode::default(),
        })
    }

    /// Set the escape mode.
    #[must_use]
    pub const fn with_escape(mut self, escape: EscapeMode) -> Self {
        self.escape = escape;
        self
    }

    /// The template text.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// The escape mode.
    pub const fn escape(&self) -> EscapeMode {
        self.escape
    }

    /// Substitute `term` for every placeholder, producing pattern text.
    pub fn render(&self, term: &str) -> String {
        match self.escape {
            EscapeMode::Literal => self.template.replace(PLACEHOLDER, &regex::escape(term)),
            EscapeMode::Raw => self.template.replace(PLACEHOLDER, term),
        }
    }

    /// Render and compile the pattern for `term`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidPattern`] if the rendered pattern is
    /// not a valid regex.
    pub fn compile(&self, term: &str) -> AnalysisResult<Regex> {
        let pattern = self.render(term);
        Regex::new(&pattern).map_err(|source| AnalysisError::InvalidPattern {
            query: term.to_string(),
            pattern,
            source,
        })
    }
}

impl std::fmt::Display for PatternTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.template)
    }
}

/// Count non-overlapping matches of `pattern` in `text`.
pub fn count_in(pattern: &Regex, text: &str) -> usize {
    pattern.find_iter(text).count()
}

/// Count matches of `term` in each document.
///
/// The result is aligned with `texts`. Missing or empty documents count as
/// zero.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidPattern`] if the rendered pattern does not
/// compile.
#[tracing::instrument(skip(texts, template), fields(docs = texts.len(), template = %template))]
pub fn count_matches<T: AsRef<str>>(
    texts: &[Option<T>],
    term: &str,
    template: &PatternTemplate,
) -> AnalysisResult<Vec<usize>> {
    let pattern = template.compile(term)?;
    Ok(texts
        .iter()
        .map(|text| match text {
            Some(t) if !t.as_ref().is_empty() => count_in(&pattern, t.as_ref()),
            _ => 0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(template: &str) -> PatternTemplate {
        PatternTemplate::new(template)
            .unwrap()
            .with_escape(EscapeMode::Raw)
    }

    #[test]
    fn whole_word_counts() {
        let docs = [Some("cat sat"), Some("dog ran"), Some("the cat")];
        let counts = count_matches(&docs, "cat", &PatternTemplate::default()).unwrap();
        assert_eq!(counts, vec![1, 0, 1]);
    }

    #[test]
    fn substring_template_counts_every_occurrence() {
        let docs = [Some("aaa")];
        let bare = PatternTemplate::new("query").unwrap();
        assert_eq!(count_matches(&docs, "a", &bare).unwrap(), vec![3]);
        assert_eq!(
            count_matches(&docs, "a", &PatternTemplate::default()).unwrap(),
            vec![0]
        );
    }

    #[test]
    fn matches_are_non_overlapping() {
        let docs = [Some("aaaa")];
        let bare = PatternTemplate::new("query").unwrap();
        assert_eq!(count_matches(&docs, "aa", &bare).unwrap(), vec![2]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let docs = [Some("Cat cat CAT")];
        let counts = count_matches(&docs, "cat", &PatternTemplate::default()).unwrap();
        assert_eq!(counts, vec![1]);
    }

    #[test]
    fn missing_and_empty_documents_count_zero() {
        let docs: [Option<&str>; 3] = [None, Some(""), Some("cat")];
        let counts = count_matches(&docs, "cat", &PatternTemplate::default()).unwrap();
        assert_eq!(counts, vec![0, 0, 1]);
    }

    #[test]
    fn literal_mode_escapes_metacharacters() {
        let template = PatternTemplate::new("query").unwrap();
        let docs = [Some("a.b axb (c) x|y")];
        assert_eq!(count_matches(&docs, "a.b", &template).unwrap(), vec![1]);
        assert_eq!(count_matches(&docs, "(c)", &template).unwrap(), vec![1]);
        assert_eq!(count_matches(&docs, "x|y", &template).unwrap(), vec![1]);
    }

    #[test]
    fn literal_mode_compiles_unbalanced_terms() {
        let template = PatternTemplate::new("query").unwrap();
        let docs = [Some("f(x")];
        assert_eq!(count_matches(&docs, "f(", &template).unwrap(), vec![1]);
        assert_eq!(count_matches(&docs, "[", &template).unwrap(), vec![0]);
    }

    #[test]
    fn raw_mode_passes_regex_syntax_through() {
        let docs = [Some("happy happiness")];
        assert_eq!(
            count_matches(&docs, r"happ\w+", &raw("query")).unwrap(),
            vec![2]
        );
        assert_eq!(count_matches(&docs, "ha.py", &raw("query")).unwrap(), vec![1]);
        let literal = PatternTemplate::new("query").unwrap();
        assert_eq!(count_matches(&docs, "ha.py", &literal).unwrap(), vec![0]);
    }

    #[test]
    fn raw_mode_reports_invalid_pattern() {
        let err = count_matches(&[Some("x")], "f(", &raw(r"\bquery\b")).unwrap_err();
        match err {
            AnalysisError::InvalidPattern { query, pattern, .. } => {
                assert_eq!(query, "f(");
                assert_eq!(pattern, r"\bf(\b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn every_placeholder_is_substituted() {
        let template = PatternTemplate::new("query|query").unwrap();
        assert_eq!(template.render("cat"), "cat|cat");
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        assert!(matches!(
            PatternTemplate::new(r"\bword\b"),
            Err(AnalysisError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn broken_template_surfaces_as_invalid_pattern() {
        let template = PatternTemplate::new("(query").unwrap();
        assert!(matches!(
            template.compile("cat"),
            Err(AnalysisError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn escape_mode_deserializes_lowercase() {
        let mode: EscapeMode = serde_json::from_str("\"raw\"").unwrap();
        assert_eq!(mode, EscapeMode::Raw);
        assert_eq!(EscapeMode::default().as_str(), "literal");
    }
}
