//! Lexicon command: reshape a wide lexicon into long form.

use std::io::BufWriter;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument, warn};

use lecat_core::normalize;

use crate::tables;

/// Arguments for the `lexicon` subcommand.
#[derive(Args, Debug)]
pub struct LexiconArgs {
    /// Wide lexicon CSV (`Type`, `Category`, `Query*` columns).
    pub lexicon: Utf8PathBuf,

    /// Write the long table to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,
}

/// Normalize a lexicon and print or write the long table.
#[instrument(name = "cmd_lexicon", skip_all, fields(lexicon = %args.lexicon))]
pub fn cmd_lexicon(
    args: LexiconArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let wide = tables::load_lexicon(&args.lexicon, max_input_bytes)?;
    let long = normalize(&wide);
    debug!(rows = wide.len(), entries = long.len(), "lexicon normalized");

    for query in long.duplicate_queries() {
        warn!(query, "query listed under several type/category pairs");
    }

    if let Some(ref path) = args.output {
        let file =
            std::fs::File::create(path).with_context(|| format!("failed to create {path}"))?;
        tables::write_lexicon(BufWriter::new(file), &long)?;
        if !global_json {
            println!(
                "{} {} entries to {}",
                "Wrote".green().bold(),
                long.len(),
                path.cyan()
            );
        }
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&long)?);
    } else if args.output.is_none() {
        tables::write_lexicon(std::io::stdout().lock(), &long)?;
    }
    Ok(())
}
