use anyhow::Context;
use citedby::run::{DEFAULT_OUTPUT_FILE, DEFAULT_TEMPLATE_FILE};
use citedby::{EutilsClient, FailurePolicy, RunConfig, TemplateParser, fetch::EUTILS_BASE_URL};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Find the PubMed articles citing each PMID of a citation template export.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Template file to read PMIDs from
    #[arg(short, long, default_value = DEFAULT_TEMPLATE_FILE)]
    template: PathBuf,

    /// XML report to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Report failed lookups as uncited instead of aborting the run
    #[arg(long)]
    skip_failures: bool,

    /// Skip templates without a PMID instead of rejecting the file
    #[arg(long)]
    lenient: bool,

    /// E-utilities base URL
    #[arg(long, default_value = EUTILS_BASE_URL)]
    base_url: String,

    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let client = EutilsClient::with_base_url(cli.base_url)?;
    let config = RunConfig::new()
        .with_template_path(cli.template)
        .with_output_path(cli.output)
        .with_failure_policy(if cli.skip_failures {
            FailurePolicy::Skip
        } else {
            FailurePolicy::Abort
        })
        .with_parser(if cli.lenient {
            TemplateParser::lenient()
        } else {
            TemplateParser::new()
        });

    citedby::run(&config, &client, &mut std::io::stdout().lock()).with_context(|| {
        format!(
            "citation run for {} failed",
            config.template_path().display()
        )
    })?;
    Ok(())
}
