//! `docs-builder build` command implementation.

use std::path::PathBuf;

use clap::Args;
use docs_config::{CliSettings, Config};
use docs_site::{BuildReport, MissingReference, OutputMode, SiteBuilder};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Markdown source directory (overrides config).
    source_dir: Option<PathBuf>,

    /// Output directory (default: `<SOURCE_DIR>/html`).
    output_dir: Option<PathBuf>,

    /// Build only this subtree into a single HTML file for PDF conversion.
    #[arg(long, value_name = "PATH")]
    parse_sub_path: Option<String>,

    /// Parse every file instead of reusing cached metadata.
    #[arg(long)]
    disable_cache: bool,

    /// Path to configuration file (default: auto-discover docs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            sub_path: self.parse_sub_path,
            cache_enabled: self.disable_cache.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let context = config.build_context();

        output.info(&format!("Source: {}", context.source_dir().display()));
        output.info(&format!("Output: {}", context.output_dir().display()));

        let report = SiteBuilder::new(context).build()?;

        output.success("HTML rendering complete!");
        print_report(output, &report);
        output.success(&completion_message(&report));
        Ok(())
    }
}

fn print_report(output: &Output, report: &BuildReport) {
    if !report.references.missing.is_empty() {
        output.warning(&format!(
            "Found {} missing reference(s):",
            report.references.missing.len()
        ));
        for missing in &report.references.missing {
            output.warning(&format!("  {}", missing_reference_line(missing)));
        }
    }
    if !report.references.orphans.is_empty() {
        output.warning("Documents not included in any table of contents:");
        for orphan in &report.references.orphans {
            output.detail(&format!("  {orphan}"));
        }
    }

    match &report.dispatch.mode {
        OutputMode::Json => output.info(&format!(
            "Exported {} JSON file(s)",
            report.dispatch.files.len()
        )),
        OutputMode::Pdf { .. } => {
            for file in &report.dispatch.files {
                output.info(&format!("Combined document: {}", file.display()));
            }
        }
    }
}

fn missing_reference_line(missing: &MissingReference) -> String {
    format!(
        "{} (line {}): document `{}` not found",
        missing.source, missing.line, missing.target
    )
}

fn completion_message(report: &BuildReport) -> String {
    if report.cache_enabled {
        format!(
            "Parse process complete ({} files were loaded from cache)",
            report.from_cache
        )
    } else {
        "Parse process complete".to_owned()
    }
}
