//! Schema command: print the JSON Schema of the `run --json` report.

use clap::Args;
use tracing::instrument;

use lecat_core::LecatReport;

/// Arguments for the `schema` subcommand.
#[derive(Args, Debug, Default)]
pub struct SchemaArgs {}

/// Print the report schema as pretty JSON.
#[instrument(name = "cmd_schema", skip_all)]
pub fn cmd_schema(_args: SchemaArgs) -> anyhow::Result<()> {
    let schema = schemars::schema_for!(LecatReport);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_report_tables() {
        let schema = serde_json::to_value(schemars::schema_for!(LecatReport)).unwrap();
        let properties = &schema["properties"];
        for key in ["template", "escape", "lexicon", "counts", "diagnostics"] {
            assert!(properties.get(key).is_some(), "missing {key}");
        }
    }
}
