use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;
use solverforge_report::{
    BenchmarkResults, HexStyle, ReportConfig, ReportError, ReportSummary, ReportWriter,
};
use tracing::debug;

/// Generate a benchmark report from SolverForge results
#[derive(Parser, Debug)]
#[command(name = "solverforge-report", author, version, about)]
struct Args {
    /// JSON file with an array of benchmark results
    results: PathBuf,

    /// Report configuration (TOML, or YAML by .yaml/.yml extension)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory, overriding the configuration
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Always render colors with six hex digits
    #[arg(long)]
    padded_hex: bool,

    /// Print nothing but errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Loads the configuration file, then applies command-line overrides.
    fn report_config(&self) -> Result<ReportConfig, ReportError> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_file(path)?,
            None => ReportConfig::default(),
        };
        if let Some(output) = &self.output {
            config = config.with_output_directory(output);
        }
        if self.padded_hex {
            config = config.with_hex_style(HexStyle::Padded);
        }
        Ok(config)
    }
}

fn run(args: &Args) -> Result<ReportSummary, ReportError> {
    let config = args.report_config()?;
    debug!(event = "config_loaded", directory = %config.output_directory.display());
    let results = BenchmarkResults::from_json_file(&args.results)?;
    ReportWriter::new(config).write(&results)
}

fn main() -> ExitCode {
    let args = Args::parse();

    if !args.quiet {
        solverforge_report_console::init();
    }

    match run(&args) {
        Ok(summary) => {
            if !args.quiet {
                println!();
                solverforge_report_console::print_legend(&summary.colors);
                println!(
                    "\n{} {}",
                    "Report written to".bright_green().bold(),
                    summary.output_directory.display()
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {}", "error:".bright_red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
