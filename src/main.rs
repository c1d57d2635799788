use anyhow::{Context, Result};
use clap::Parser;
use stepstat::cli::{Cli, OutputFormat};
use stepstat::csv_output::CsvOutput;
use stepstat::dataset;
use stepstat::json_output::JsonOutput;
use stepstat::markdown_output::MarkdownOutput;
use stepstat::report::{build_report, StepReport};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Render the report in the requested format
fn render(report: &StepReport, format: OutputFormat) -> Result<String> {
    let output = match format {
        OutputFormat::Text => report.to_report_string(),
        OutputFormat::Json => JsonOutput::from_report(report)
            .to_json()
            .context("Failed to serialize report as JSON")?,
        OutputFormat::Csv => CsvOutput::new(report).to_csv(),
        OutputFormat::Markdown => MarkdownOutput::new(report).to_markdown(),
    };
    Ok(output)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = args.resolve_config()?;
    tracing::debug!(?config, "resolved configuration");

    let primary = dataset::load_csv(&args.input, &config)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let comparison = match &args.compare {
        Some(path) => Some(
            dataset::load_csv(path, &config)
                .with_context(|| format!("Failed to load {}", path.display()))?,
        ),
        None => None,
    };

    let report = build_report(&primary, comparison.as_ref(), &config)
        .context("Failed to compute statistics")?;
    let output = render(&report, args.format)?;

    match &args.output {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", output),
    }

    Ok(())
}
