//! Benchmark reports for SolverForge.
//!
//! This crate turns benchmark results into a report directory: a Markdown
//! summary, a CSV of every run, chart data as JSON and the color assigned to
//! every series.
//!
//! # Overview
//!
//! - [`ColorSequence`] hands out a stable, distinct color per series key.
//!   The first ten colors are the Tango light and dark palettes; after that,
//!   colors are blended between the two at ever finer fractions.
//! - [`chart`] builds line charts with aligned datasets, downsampling and
//!   axis scaling.
//! - [`ReportWriter`] writes everything to disk.
//!
//! # Example
//!
//! ```
//! use solverforge_report::ColorSequence;
//!
//! let mut colors: ColorSequence = ColorSequence::new();
//! assert_eq!(colors.color_for("Hill Climbing"), "#8ae234");
//! assert_eq!(colors.color_for("Tabu Search"), "#fce94f");
//! assert_eq!(colors.color_for("Hill Climbing"), "#8ae234");
//! ```
//!
//! Writing a full report:
//!
//! ```text
//! let results = BenchmarkResults::from_json_file("results.json")?;
//! let config = ReportConfig::load("report.toml")?;
//! let summary = ReportWriter::new(config).write(&results)?;
//! println!("{} files written", summary.files.len());
//! ```

pub mod chart;
pub mod color;
mod config;
mod error;
mod report;
mod result;
pub mod time;

pub use color::{BlendFraction, ColorSequence, HexStyle, RgbColor, SharedColorSequence};
pub use config::{ConfigError, PaletteConfig, ReportConfig};
pub use error::ReportError;
pub use report::{ChartReport, CsvExporter, MarkdownReport, ReportSummary, ReportWriter};
pub use result::{compare_levels, BenchmarkResult, BenchmarkResults, BenchmarkRun, ScoreSample};
