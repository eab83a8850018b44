//! Process command - map a single extraction response.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use nfe_core::models::config::NfeConfig;
use nfe_core::{
    InvoiceExtractor, InvoiceMapper, JsonToNfeMapper, Nfe, NfeValidator, ResponseFileExtractor,
};

use crate::output::{format_nfe, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Saved extraction response (JSON, optionally wrapped in code fences)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Validate the mapped record
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let format = resolve_format(args.format, &config);

    info!("Processing file: {}", args.input.display());

    let nfe = map_file(&args.input, &config)?;

    if args.validate {
        let issues = NfeValidator::from_config(&config.validation).validate(&nfe);
        if issues.is_empty() {
            eprintln!("{} No validation issues", style("✓").green());
        } else {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                warn!("{}", issue);
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_nfe(&nfe, format, config.output.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read one extraction response and map it.
pub fn map_file(path: &Path, config: &NfeConfig) -> anyhow::Result<Nfe> {
    let extractor = ResponseFileExtractor::new()
        .with_code_fence_stripping(config.extraction.strip_code_fences);
    let extracted = extractor.extract(path)?;

    let nfe = JsonToNfeMapper::new().map(&extracted)?;
    debug!(
        "Mapped {} with {} line items",
        nfe.inf_nfe.id,
        nfe.inf_nfe.det.len()
    );

    Ok(nfe)
}

pub fn resolve_format(requested: Option<OutputFormat>, config: &NfeConfig) -> OutputFormat {
    requested.unwrap_or_else(|| {
        OutputFormat::from_config(&config.output.format).unwrap_or_else(|| {
            warn!(
                "Unknown output format '{}' in config, using json",
                config.output.format
            );
            OutputFormat::Json
        })
    })
}
