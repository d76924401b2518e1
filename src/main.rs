use anyhow::{Context, Result};
use clap::Parser;
use tickscope::cli::{Cli, OutputFormat};
use tickscope::config::TraceConfig;
use tickscope::csv_output::CsvOutput;
use tickscope::json_output::JsonOutput;
use tickscope::report::{analyze_file, Analysis};
use tickscope::text_output::render_summary;
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

/// Merge the optional config file with command-line overrides
fn load_config(args: &Cli) -> Result<TraceConfig> {
    let mut config = match &args.config {
        Some(path) => TraceConfig::from_file(path)?,
        None => TraceConfig::default(),
    };

    if args.xmin.is_some() {
        config.bounds.xmin = args.xmin;
    }
    if args.xmax.is_some() {
        config.bounds.xmax = args.xmax;
    }
    config.exclude.all.extend(args.exclude.iter().cloned());

    Ok(config)
}

/// Normalized event table in file order
fn events_csv(analysis: &Analysis, raw_line: bool) -> String {
    let mut output = CsvOutput::new(raw_line);
    for event in analysis.stream.in_file_order() {
        output.add_event(event);
    }
    output.to_csv()
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;
    let analysis = analyze_file(&args.trace, &config)?;

    if let Some(path) = &args.events_out {
        std::fs::write(path, events_csv(&analysis, args.raw_line))
            .with_context(|| format!("Failed to write events to {}", path.display()))?;
        eprintln!(
            "[tickscope: Wrote {} events to {}]",
            analysis.stream.len(),
            path.display()
        );
    }

    match args.format {
        OutputFormat::Text => print!("{}", render_summary(&analysis.report)),
        OutputFormat::Json => {
            let trace = args.trace.display().to_string();
            let json = JsonOutput::new(&trace, &analysis.report)
                .to_json()
                .context("Failed to serialize JSON")?;
            println!("{}", json);
        }
        OutputFormat::Csv => print!("{}", events_csv(&analysis, args.raw_line)),
    }

    Ok(())
}
