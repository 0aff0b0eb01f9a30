//! Colorful console output for report generation.
//!
//! Provides a custom `tracing` layer that formats report events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (report start/end, each file written)
//! - **DEBUG**: One line per chart built
//! - **TRACE**: Every color handed out by the color sequence

use indexmap::IndexMap;
use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use solverforge_report::time::format_duration_ms;
use solverforge_report::RgbColor;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static REPORT_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "solverforge_report=info";

/// Initializes the report console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the SolverForge banner and sets up tracing.
pub fn init() {
    init_with_banner(true);
}

/// Same as [`init`], optionally without the banner.
pub fn init_with_banner(banner: bool) {
    INIT.get_or_init(|| {
        if banner {
            print_banner();
        }

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(ReportConsoleLayer)
            .try_init();
    });
}

// Marks the start of report generation for elapsed time tracking.
fn mark_report_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    REPORT_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since report start.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = REPORT_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ____        _                 _____
/ ___|  ___ | |_   _____ _ __ |  ___|__  _ __ __ _  ___
\___ \ / _ \| \ \ / / _ \ '__|| |_ / _ \| '__/ _` |/ _ \
 ___) | (_) | |\ V /  __/ |   |  _| (_) | | | (_| |  __/
|____/ \___/|_| \_/ \___|_|   |_|  \___/|_|  \__, |\___|
                                             |___/
"#;

    let version_line = format!("                   v{} - Benchmark Report\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats report events with colors.
pub struct ReportConsoleLayer;

impl<S: Subscriber> Layer<S> for ReportConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        if !metadata.target().starts_with("solverforge_report") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    directory: Option<String>,
    file: Option<String>,
    chart: Option<String>,
    color: Option<String>,
    results: Option<u64>,
    bytes: Option<u64>,
    files: Option<u64>,
    charts: Option<u64>,
    series: Option<u64>,
    datasets: Option<u64>,
    points: Option<u64>,
    index: Option<u64>,
    duration_ms: Option<u64>,
}

impl EventVisitor {
    fn set_str(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "directory" => self.directory = Some(value),
            "file" => self.file = Some(value),
            "chart" => self.chart = Some(value),
            "color" => self.color = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_str(field.name(), s.trim_matches('"').to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "results" => self.results = Some(value),
            "bytes" => self.bytes = Some(value),
            "files" => self.files = Some(value),
            "charts" => self.charts = Some(value),
            "series" => self.series = Some(value),
            "datasets" => self.datasets = Some(value),
            "points" => self.points = Some(value),
            "index" => self.index = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_str(field.name(), value.to_string());
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "report_start" => format_report_start(v),
        "report_end" => format_report_end(v),
        "report_file_written" => format_file_written(v),
        "chart_built" => format_chart_built(v),
        "color_assigned" => format_color_assigned(v, level),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_report_start(v: &EventVisitor) -> String {
    mark_report_start();
    let results = v.results.unwrap_or(0);
    let directory = v.directory.as_deref().unwrap_or(".");

    format!(
        "{} {} Reporting │ {} results │ {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        results.to_formatted_string(&Locale::en).bright_yellow(),
        directory.white().bold()
    )
}

fn format_report_end(v: &EventVisitor) -> String {
    let files = v.files.unwrap_or(0);
    let charts = v.charts.unwrap_or(0);
    let series = v.series.unwrap_or(0);
    let duration = v.duration_ms.unwrap_or(0);

    format!(
        "{} {} Report complete │ {} │ {} files │ {} charts │ {} series",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_duration_ms(duration).yellow(),
        files.to_formatted_string(&Locale::en).white(),
        charts.to_formatted_string(&Locale::en).white(),
        series
            .to_formatted_string(&Locale::en)
            .bright_magenta()
            .bold(),
    )
}

fn format_file_written(v: &EventVisitor) -> String {
    let file = v.file.as_deref().unwrap_or("?");
    let bytes = v.bytes.unwrap_or(0);

    format!(
        "{} {} {} │ {} bytes",
        format_elapsed(),
        "✓".bright_green(),
        file.white(),
        bytes.to_formatted_string(&Locale::en).bright_black()
    )
}

fn format_chart_built(v: &EventVisitor) -> String {
    let chart = v.chart.as_deref().unwrap_or("?");
    let datasets = v.datasets.unwrap_or(0);
    let points = v.points.unwrap_or(0);

    format!(
        "{} {} Chart {} │ {} datasets │ {} points",
        format_elapsed(),
        "◆".bright_blue(),
        chart.white().bold(),
        datasets.to_formatted_string(&Locale::en).white(),
        points.to_formatted_string(&Locale::en).white()
    )
}

fn format_color_assigned(v: &EventVisitor, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }

    let index = v.index.unwrap_or(0);
    let color = v.color.as_deref().unwrap_or("?");

    format!(
        "{} {} Color {:>6} │ {}",
        format_elapsed(),
        swatch(color),
        index.to_formatted_string(&Locale::en).bright_black(),
        color.bright_black()
    )
}

/// Renders a block in `hex`, or a placeholder when it does not parse.
fn swatch(hex: &str) -> String {
    match RgbColor::parse_hex(hex) {
        Some(rgb) => "██".truecolor(rgb.red(), rgb.green(), rgb.blue()).to_string(),
        None => "??".bright_black().to_string(),
    }
}

/// Formats the series legend of a finished report, one colored line per key.
///
/// # Example
///
/// ```
/// use indexmap::IndexMap;
/// use solverforge_report_console::format_legend;
///
/// let mut colors = IndexMap::new();
/// colors.insert("Hill Climbing".to_string(), "#8ae234".to_string());
///
/// let legend = format_legend(&colors);
/// assert!(legend.contains("Hill Climbing"));
/// assert!(legend.contains("#8ae234"));
/// ```
pub fn format_legend(colors: &IndexMap<String, String>) -> String {
    let width = colors.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    colors
        .iter()
        .map(|(key, hex)| format!("  {} {:<width$}  {}", swatch(hex), key, hex.bright_black()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints the series legend to stdout.
pub fn print_legend(colors: &IndexMap<String, String>) {
    if colors.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", "Series colors".white().bold());
    let _ = writeln!(stdout, "{}", format_legend(colors));
    let _ = stdout.flush();
}
