//! CSV table I/O.
//!
//! Lexicon and corpus files are plain CSV with a header row. Ragged rows are
//! accepted; missing trailing cells are treated as empty. Result tables are
//! written with the headers the analysis tools downstream expect:
//! `Type,Category,Query` for the long lexicon, the identifier column followed
//! by one column per query for the counts, and
//! `Query,Type,Category,unique,total` for the diagnostics.

use std::io::Write;

use anyhow::Context;
use camino::Utf8Path;
use tracing::debug;

use lecat_core::{Corpus, CountMatrix, DiagnosticsTable, LongLexicon, WideLexicon};

use crate::commands::read_input_file;

/// A parsed CSV file: header row plus string records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names.
    pub headers: Vec<String>,
    /// Data rows.
    pub records: Vec<Vec<String>>,
}

/// Parse CSV text.
pub fn parse_csv(content: &str) -> anyhow::Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader
        .headers()
        .context("failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();
    let records = reader
        .records()
        .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()
        .context("failed to read CSV record")?;
    Ok(Table { headers, records })
}

/// Read and parse a CSV file, enforcing the input size limit.
pub fn read_table(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<Table> {
    let content = read_input_file(path, max_bytes)?;
    let table = parse_csv(&content).with_context(|| format!("failed to parse {path}"))?;
    debug!(%path, columns = table.headers.len(), rows = table.records.len(), "table read");
    Ok(table)
}

/// Load a wide lexicon (`Type`, `Category`, `Query*` columns).
pub fn load_lexicon(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<WideLexicon> {
    let table = read_table(path, max_bytes)?;
    WideLexicon::from_records(&table.headers, table.records)
        .with_context(|| format!("invalid lexicon {path}"))
}

/// Load a corpus keyed by `id_column`.
pub fn load_corpus(
    path: &Utf8Path,
    max_bytes: Option<usize>,
    id_column: &str,
) -> anyhow::Result<Corpus> {
    let table = read_table(path, max_bytes)?;
    Corpus::from_records(&table.headers, table.records, id_column)
        .with_context(|| format!("invalid corpus {path}"))
}

/// Write the long lexicon as `Type,Category,Query`.
pub fn write_lexicon<W: Write>(writer: W, lexicon: &LongLexicon) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if lexicon.is_empty() {
        csv.write_record(["Type", "Category", "Query"])?;
    }
    for entry in lexicon {
        csv.serialize(entry)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the count matrix, one row per document.
pub fn write_counts<W: Write>(
    writer: W,
    matrix: &CountMatrix,
    id_header: &str,
) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let header = std::iter::once(id_header).chain(matrix.queries().iter().map(String::as_str));
    csv.write_record(header)?;
    for (document, counts) in matrix.rows() {
        csv.write_record(
            std::iter::once(document.to_string()).chain(counts.iter().map(usize::to_string)),
        )?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the diagnostics as `Query,Type,Category,unique,total`.
pub fn write_diagnostics<W: Write>(writer: W, table: &DiagnosticsTable) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if table.is_empty() {
        csv.write_record(["Query", "Type", "Category", "unique", "total"])?;
    }
    for row in table {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}
