//! Run command: normalize the lexicon, scan the corpus, write the tables.

use std::fs::File;
use std::io::{BufWriter, IsTerminal};

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{debug, info, instrument};

use lecat_core::config::Config;
use lecat_core::{EscapeMode, LecatReport, ScanOptions, run_analysis_with_progress};

use crate::tables;

/// File name of the long lexicon table.
pub const LEXICON_FILE: &str = "lexicon_long.csv";
/// File name of the count matrix table.
pub const COUNTS_FILE: &str = "counts.csv";
/// File name of the diagnostics table.
pub const DIAGNOSTICS_FILE: &str = "diagnostics.csv";

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Wide lexicon CSV (`Type`, `Category`, `Query*` columns).
    pub lexicon: Utf8PathBuf,

    /// Corpus CSV.
    pub corpus: Utf8PathBuf,

    /// Corpus column holding the text to search.
    #[arg(long, value_name = "NAME")]
    pub column: Option<String>,

    /// Corpus column holding document identifiers [default: description].
    #[arg(long, value_name = "NAME")]
    pub id_column: Option<String>,

    /// Search pattern template; `query` is replaced by each term [default: \bquery\b].
    #[arg(long)]
    pub template: Option<String>,

    /// How terms are substituted into the template.
    #[arg(long, value_enum)]
    pub escape: Option<EscapeMode>,

    /// Scan queries in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Directory for the result tables [default: current directory].
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<Utf8PathBuf>,
}

impl RunArgs {
    /// The loaded config with this command's flags laid over it.
    pub fn settings(&self, config: &Config) -> Config {
        Config {
            template: self.template.clone().or_else(|| config.template.clone()),
            escape: self.escape.unwrap_or(config.escape),
            id_column: self.id_column.clone().or_else(|| config.id_column.clone()),
            text_column: self.column.clone().or_else(|| config.text_column.clone()),
            parallel: self.parallel || config.parallel,
            output_dir: self.output_dir.clone().or_else(|| config.output_dir.clone()),
            ..config.clone()
        }
    }
}

/// Run the full analysis and write `lexicon_long.csv`, `counts.csv` and
/// `diagnostics.csv`.
#[instrument(
    name = "cmd_run",
    skip_all,
    fields(lexicon = %args.lexicon, corpus = %args.corpus)
)]
pub fn cmd_run(args: RunArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let settings = args.settings(config);
    let Some(text_column) = settings.text_column.clone() else {
        bail!("no text column given: pass --column or set `text_column` in the config file");
    };
    let id_column = settings.id_column();
    let max_input = settings.input_limit();

    debug!(
        %text_column,
        template = settings.template(),
        escape = %settings.escape,
        id_column,
        "executing run command"
    );

    let options = ScanOptions {
        template: settings.pattern_template()?,
        text_column,
        parallel: settings.parallel,
    };

    let wide = tables::load_lexicon(&args.lexicon, max_input)?;
    let corpus = tables::load_corpus(&args.corpus, max_input, id_column)?;

    let entries = wide
        .rows()
        .iter()
        .map(|row| row.queries.iter().flatten().count())
        .sum::<usize>();
    let bar = progress_bar(entries as u64, global_json);
    let report = run_analysis_with_progress(&wide, &corpus, &options, &|_| bar.inc(1))
        .with_context(|| format!("failed to scan {}", args.corpus))?;
    bar.finish_and_clear();

    let output_dir = settings
        .output_dir
        .clone()
        .unwrap_or_else(|| Utf8PathBuf::from("."));
    write_tables(&output_dir, &report, id_column)?;
    info!(%output_dir, "tables written");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, &output_dir);
    }
    Ok(())
}

fn progress_bar(len: u64, global_json: bool) -> ProgressBar {
    if global_json || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    let template = "{spinner} scanning {pos}/{len} queries {wide_bar}";
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style);
    }
    bar
}

/// Write the three result tables into `dir`, creating it if needed.
pub fn write_tables(dir: &Utf8Path, report: &LecatReport, id_column: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {dir}"))?;

    let create = |name: &str| -> anyhow::Result<BufWriter<File>> {
        let path = dir.join(name);
        let file = File::create(&path).with_context(|| format!("failed to create {path}"))?;
        Ok(BufWriter::new(file))
    };

    tables::write_lexicon(create(LEXICON_FILE)?, &report.lexicon)?;
    tables::write_counts(create(COUNTS_FILE)?, &report.counts, id_column)?;
    tables::write_diagnostics(create(DIAGNOSTICS_FILE)?, &report.diagnostics)?;
    Ok(())
}

fn print_summary(report: &LecatReport, output_dir: &Utf8Path) {
    println!(
        "{} {} documents, {} queries ({} lexicon entries)",
        "Scanned".green().bold(),
        report.counts.n_documents(),
        report.counts.n_queries(),
        report.lexicon.len(),
    );
    if !report.duplicate_queries.is_empty() {
        println!(
            "{}: {}",
            "Duplicate queries".yellow(),
            report.duplicate_queries.join(", ")
        );
    }
    let matched = report.diagnostics.iter().filter(|d| d.total > 0).count();
    println!(
        "{}: {matched}/{}",
        "Queries matched".dimmed(),
        report.diagnostics.len()
    );
    println!("{}: {}", "Output".dimmed(), output_dir.cyan());
}
