//! Report generation for benchmark results.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::info;

use crate::chart::{ChartIdRegistry, LineChart, LineChartBuilder};
use crate::color::ColorSequence;
use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::result::{compare_levels, BenchmarkResult, BenchmarkResults};
use crate::time::format_duration_ms;

const CSV_HEADER: &str =
    "run_index,solve_time_ms,final_score,moves_evaluated,moves_accepted,moves_per_second,acceptance_rate";

/// CSV exporter for benchmark results.
///
/// Exports one row per run with solve time, final score, move counts,
/// moves per second and acceptance rate.
///
/// # Example
///
/// ```
/// use solverforge_report::{BenchmarkResult, BenchmarkRun, CsvExporter};
///
/// let mut result = BenchmarkResult::new("Test", "HC", "Problem");
/// result.add_run(BenchmarkRun::new(0, 100, "0hard/-3soft", vec![0.0, -3.0]));
///
/// let csv = CsvExporter::to_string(&result);
/// assert!(csv.starts_with("run_index,solve_time_ms"));
/// assert!(csv.contains("0,100,0hard/-3soft,"));
/// ```
pub struct CsvExporter;

impl CsvExporter {
    /// Exports benchmark result to CSV string.
    pub fn to_string(result: &BenchmarkResult) -> String {
        let mut output = String::new();
        writeln!(output, "{}", CSV_HEADER).unwrap();
        Self::write_rows(&mut output, None, result);
        output
    }

    /// Exports several results into one CSV with solver and problem columns.
    pub fn to_string_all(results: &BenchmarkResults) -> String {
        let mut output = String::new();
        writeln!(output, "solver,problem,{}", CSV_HEADER).unwrap();
        for result in results.iter() {
            let prefix = format!(
                "{},{},",
                csv_field(&result.solver_name),
                csv_field(&result.problem_name)
            );
            Self::write_rows(&mut output, Some(&prefix), result);
        }
        output
    }

    fn write_rows(output: &mut String, prefix: Option<&str>, result: &BenchmarkResult) {
        for run in &result.runs {
            writeln!(
                output,
                "{}{},{},{},{},{},{:.2},{:.4}",
                prefix.unwrap_or(""),
                run.run_index,
                run.solve_time_ms,
                csv_field(&run.final_score),
                run.moves_evaluated,
                run.moves_accepted,
                run.moves_per_second(),
                run.acceptance_rate(),
            )
            .unwrap();
        }
    }

    /// Exports benchmark result to a CSV file.
    pub fn to_file(result: &BenchmarkResult, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, Self::to_string(result))
    }

    /// Writes benchmark result as CSV to a writer.
    pub fn write<W: Write>(result: &BenchmarkResult, mut writer: W) -> io::Result<()> {
        writer.write_all(Self::to_string(result).as_bytes())
    }
}

/// Quotes a field containing separators or quotes.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Markdown report generator.
///
/// # Example
///
/// ```
/// use solverforge_report::{BenchmarkResult, MarkdownReport};
///
/// let result = BenchmarkResult::new("Test", "HC", "Problem");
/// let md = MarkdownReport::to_string(&result);
/// assert!(md.contains("# Benchmark: Test"));
/// assert!(md.contains("*No runs completed.*"));
/// ```
pub struct MarkdownReport;

impl MarkdownReport {
    /// Generates a Markdown report string for one result.
    pub fn to_string(result: &BenchmarkResult) -> String {
        let mut output = String::new();

        writeln!(output, "# Benchmark: {}", result.name).unwrap();
        writeln!(output).unwrap();

        writeln!(output, "- **Solver**: {}", result.solver_name).unwrap();
        writeln!(output, "- **Problem**: {}", result.problem_name).unwrap();
        writeln!(output, "- **Runs**: {}", result.run_count()).unwrap();
        writeln!(output).unwrap();

        writeln!(output, "## Summary").unwrap();
        writeln!(output).unwrap();

        if let Some(best) = result.best_run() {
            writeln!(output, "| Metric | Value |").unwrap();
            writeln!(output, "|--------|-------|").unwrap();
            writeln!(output, "| Best Score | {} |", best.final_score).unwrap();
            if let Some(worst) = result.worst_run() {
                writeln!(output, "| Worst Score | {} |", worst.final_score).unwrap();
            }
            writeln!(
                output,
                "| Avg Time | {} |",
                format_duration_ms(result.avg_solve_time().as_millis() as u64)
            )
            .unwrap();
            writeln!(
                output,
                "| Min Time | {} |",
                format_duration_ms(result.min_solve_time().as_millis() as u64)
            )
            .unwrap();
            writeln!(
                output,
                "| Max Time | {} |",
                format_duration_ms(result.max_solve_time().as_millis() as u64)
            )
            .unwrap();
            writeln!(
                output,
                "| Avg Moves/sec | {:.0} |",
                result.avg_moves_per_second()
            )
            .unwrap();
            writeln!(
                output,
                "| Avg Acceptance | {:.2}% |",
                result.avg_acceptance_rate() * 100.0
            )
            .unwrap();
        } else {
            writeln!(output, "*No runs completed.*").unwrap();
        }
        writeln!(output).unwrap();

        if !result.runs.is_empty() {
            writeln!(output, "## Run Details").unwrap();
            writeln!(output).unwrap();
            writeln!(
                output,
                "| Run | Time (ms) | Score | Steps | Moves/sec | Calcs/sec | Accept % |"
            )
            .unwrap();
            writeln!(
                output,
                "|-----|-----------|-------|-------|-----------|-----------|----------|"
            )
            .unwrap();

            for run in &result.runs {
                let steps = run
                    .step_count()
                    .map_or_else(|| "-".to_string(), |steps| steps.to_string());
                writeln!(
                    output,
                    "| {} | {} | {} | {} | {:.0} | {:.0} | {:.2}% |",
                    run.run_index,
                    run.solve_time_ms,
                    run.final_score,
                    steps,
                    run.moves_per_second(),
                    run.score_calculation_speed(),
                    run.acceptance_rate() * 100.0,
                )
                .unwrap();
            }
        }

        output
    }

    /// Generates a comparison table for multiple results.
    ///
    /// When `colors` is given, each row shows the solver's series color.
    ///
    /// # Example
    ///
    /// ```
    /// use solverforge_report::{BenchmarkResult, MarkdownReport};
    ///
    /// let result1 = BenchmarkResult::new("Test", "HC", "Problem");
    /// let result2 = BenchmarkResult::new("Test", "Tabu", "Problem");
    ///
    /// let comparison = MarkdownReport::comparison(&[&result1, &result2], None);
    /// assert!(comparison.contains("## Comparison"));
    /// assert!(comparison.contains("| Tabu | Problem | N/A |"));
    /// ```
    pub fn comparison(results: &[&BenchmarkResult], colors: Option<&ColorSequence>) -> String {
        let mut output = String::new();

        writeln!(output, "## Comparison").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "| Solver | Problem | Best Score | Avg Time (ms) | Moves/sec | Color |"
        )
        .unwrap();
        writeln!(
            output,
            "|--------|---------|------------|---------------|-----------|-------|"
        )
        .unwrap();

        for result in results {
            let best = result
                .best_run()
                .map(|r| r.final_score.clone())
                .unwrap_or_else(|| "N/A".to_string());
            let color = colors
                .and_then(|c| {
                    c.get(result.solver_name.as_str())
                        .map(|rgb| format!("`{}`", rgb.to_hex(c.hex_style())))
                })
                .unwrap_or_default();

            writeln!(
                output,
                "| {} | {} | {} | {:.2} | {:.0} | {} |",
                result.solver_name,
                result.problem_name,
                best,
                result.avg_solve_time().as_secs_f64() * 1000.0,
                result.avg_moves_per_second(),
                color,
            )
            .unwrap();
        }

        output
    }

    /// Generates the full report document: header, comparison, then one
    /// section per result.
    pub fn document(
        results: &BenchmarkResults,
        colors: Option<&ColorSequence>,
        generated_at: DateTime<Utc>,
    ) -> String {
        let mut output = String::new();
        writeln!(output, "# Benchmark Report").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Generated {} for {} results.",
            generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            results.len()
        )
        .unwrap();
        writeln!(output).unwrap();

        let refs: Vec<&BenchmarkResult> = results.iter().collect();
        output.push_str(&Self::comparison(&refs, colors));

        for result in results.iter() {
            writeln!(output).unwrap();
            // Demote every heading one level below the document title.
            for line in Self::to_string(result).lines() {
                if line.starts_with('#') {
                    writeln!(output, "#{}", line).unwrap();
                } else {
                    writeln!(output, "{}", line).unwrap();
                }
            }
        }
        output
    }

    /// Writes Markdown report to a file.
    pub fn to_file(result: &BenchmarkResult, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, Self::to_string(result))
    }

    /// Writes Markdown report to a writer.
    pub fn write<W: Write>(result: &BenchmarkResult, mut writer: W) -> io::Result<()> {
        writer.write_all(Self::to_string(result).as_bytes())
    }
}

/// Builds the summary charts of a report.
///
/// Series are keyed by solver name, so a solver keeps its color in every chart
/// as long as the same [`ColorSequence`] is passed.
pub struct ChartReport<'a> {
    config: &'a ReportConfig,
}

impl<'a> ChartReport<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    fn builder(&self, id: String, title: String) -> LineChartBuilder {
        LineChartBuilder::new(id, title)
            .with_max_chart_width(self.config.max_chart_width)
            .with_log_scale_min_datasets(self.config.log_scale_min_datasets)
    }

    fn charted_levels(&self, results: &BenchmarkResults) -> usize {
        results
            .score_level_count()
            .min(self.config.charted_score_level_size)
    }

    /// Builds every summary chart.
    pub fn build(
        &self,
        results: &BenchmarkResults,
        ids: &mut ChartIdRegistry,
        colors: &mut ColorSequence,
    ) -> Vec<LineChart> {
        let mut charts = self.best_score_over_time(results, ids, colors);
        charts.extend(self.best_score_summary(results, ids, colors));
        charts.extend(self.winning_score_difference_summary(results, ids, colors));
        charts.push(self.score_calculation_speed_summary(results, ids, colors));
        charts.push(self.time_spent_summary(results, ids, colors));
        charts
    }

    /// One stepped chart per problem and score level, plotting the best run's
    /// score progression for every solver.
    pub fn best_score_over_time(
        &self,
        results: &BenchmarkResults,
        ids: &mut ChartIdRegistry,
        colors: &mut ColorSequence,
    ) -> Vec<LineChart> {
        let mut charts = Vec::new();
        for (problem_index, problem) in results.problem_names().into_iter().enumerate() {
            let problem_results: Vec<&BenchmarkResult> = results
                .iter()
                .filter(|r| r.problem_name == problem)
                .collect();
            let favorite = problem_results
                .iter()
                .filter_map(|r| r.best_run().map(|run| (r, run)))
                .max_by(|(_, a), (_, b)| compare_levels(&a.score_levels, &b.score_levels))
                .map(|(r, _)| r.solver_name.clone());

            for level in 0..self.charted_levels(results) {
                let mut builder = self
                    .builder(
                        format!("bestScoreOverTime_{}_level{}", problem_index, level),
                        format!("{} best score level {}", problem, level),
                    )
                    .with_x_label("Time spent")
                    .with_y_label(format!("Best score level {}", level))
                    .stepped()
                    .time_on_x();
                for result in &problem_results {
                    let Some(run) = result.best_run() else {
                        continue;
                    };
                    for sample in &run.score_history {
                        if let Some(&value) = sample.levels.get(level) {
                            builder.add(&result.solver_name, sample.time_ms, value);
                        }
                    }
                }
                if let Some(favorite) = &favorite {
                    builder.mark_favorite(favorite);
                }
                charts.push(builder.build(ids, colors));
            }
        }
        charts
    }

    /// One chart per score level with the best score per problem for every solver.
    pub fn best_score_summary(
        &self,
        results: &BenchmarkResults,
        ids: &mut ChartIdRegistry,
        colors: &mut ColorSequence,
    ) -> Vec<LineChart> {
        let problems = results.problem_names();
        (0..self.charted_levels(results))
            .map(|level| {
                let mut builder = self
                    .builder(
                        format!("bestScoreSummary_level{}", level),
                        format!("Best score summary level {}", level),
                    )
                    .with_x_label("Problem")
                    .with_y_label(format!("Best score level {}", level));
                for result in results.iter() {
                    let x = problem_position(&problems, &result.problem_name);
                    let value = result
                        .best_run()
                        .and_then(|run| run.score_levels.get(level).copied());
                    if let Some(value) = value {
                        builder.add(&result.solver_name, x, value);
                    }
                }
                builder.build(ids, colors)
            })
            .collect()
    }

    /// One chart per score level with how far each solver's best score trails
    /// the winning score on each problem.
    ///
    /// The winner of a problem is the best run across all its solvers, compared
    /// hardest level first. The winner itself plots as zero.
    pub fn winning_score_difference_summary(
        &self,
        results: &BenchmarkResults,
        ids: &mut ChartIdRegistry,
        colors: &mut ColorSequence,
    ) -> Vec<LineChart> {
        let problems = results.problem_names();
        let winners: Vec<Option<&[f64]>> = problems
            .iter()
            .map(|problem| {
                results
                    .iter()
                    .filter(|r| r.problem_name == *problem)
                    .filter_map(|r| r.best_run())
                    .max_by(|a, b| compare_levels(&a.score_levels, &b.score_levels))
                    .map(|run| run.score_levels.as_slice())
            })
            .collect();

        (0..self.charted_levels(results))
            .map(|level| {
                let mut builder = self
                    .builder(
                        format!("winningScoreDifferenceSummary_level{}", level),
                        format!("Winning score difference summary level {}", level),
                    )
                    .with_x_label("Problem")
                    .with_y_label(format!("Winning score difference level {}", level));
                for result in results.iter() {
                    let x = problem_position(&problems, &result.problem_name);
                    let winner = winners
                        .get(x as usize)
                        .copied()
                        .flatten()
                        .and_then(|levels| levels.get(level));
                    let own = result
                        .best_run()
                        .and_then(|run| run.score_levels.get(level));
                    if let (Some(own), Some(winner)) = (own, winner) {
                        builder.add(&result.solver_name, x, own - winner);
                    }
                }
                builder.build(ids, colors)
            })
            .collect()
    }

    /// Average score calculations per second on each problem for every solver.
    pub fn score_calculation_speed_summary(
        &self,
        results: &BenchmarkResults,
        ids: &mut ChartIdRegistry,
        colors: &mut ColorSequence,
    ) -> LineChart {
        let problems = results.problem_names();
        let mut builder = self
            .builder(
                "scoreCalculationSpeedSummary".to_string(),
                "Score calculation speed summary".to_string(),
            )
            .with_x_label("Problem")
            .with_y_label("Score calculation speed per second")
            .linear_y();
        for result in results.iter().filter(|r| !r.runs.is_empty()) {
            let x = problem_position(&problems, &result.problem_name);
            builder.add(&result.solver_name, x, result.avg_score_calculation_speed());
        }
        builder.build(ids, colors)
    }

    /// Average solve time per problem for every solver.
    pub fn time_spent_summary(
        &self,
        results: &BenchmarkResults,
        ids: &mut ChartIdRegistry,
        colors: &mut ColorSequence,
    ) -> LineChart {
        let problems = results.problem_names();
        let mut builder = self
            .builder("timeSpentSummary".to_string(), "Time spent summary".to_string())
            .with_x_label("Problem")
            .with_y_label("Time spent")
            .time_on_y();
        for result in results.iter().filter(|r| !r.runs.is_empty()) {
            let x = problem_position(&problems, &result.problem_name);
            builder.add(
                &result.solver_name,
                x,
                result.avg_solve_time().as_millis() as f64,
            );
        }
        builder.build(ids, colors)
    }
}

fn problem_position(problems: &[&str], problem: &str) -> u64 {
    problems.iter().position(|p| *p == problem).unwrap_or(0) as u64
}

/// What [`ReportWriter::write`] produced.
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub output_directory: PathBuf,
    pub files: Vec<PathBuf>,
    pub chart_count: usize,
    /// Series colors in first-seen order.
    pub colors: IndexMap<String, String>,
}

/// Writes a complete report directory.
///
/// # Example
///
/// ```
/// use solverforge_report::{BenchmarkResult, BenchmarkResults, BenchmarkRun, ReportConfig, ReportWriter};
///
/// let mut result = BenchmarkResult::new("NQueens", "Hill Climbing", "8 queens");
/// result.add_run(BenchmarkRun::new(0, 120, "0", vec![0.0]));
/// let results = BenchmarkResults::new(vec![result]);
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = ReportConfig::default().with_output_directory(dir.path());
/// let summary = ReportWriter::new(config).write(&results).unwrap();
///
/// assert_eq!(summary.colors["Hill Climbing"], "#8ae234");
/// assert!(dir.path().join("report.md").exists());
/// ```
#[derive(Debug, Clone)]
pub struct ReportWriter {
    config: ReportConfig,
}

impl ReportWriter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Writes the report files into the configured output directory.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::EmptyResults`] when there is nothing to report,
    /// and propagates configuration, serialization and IO failures.
    pub fn write(&self, results: &BenchmarkResults) -> Result<ReportSummary, ReportError> {
        if results.is_empty() {
            return Err(ReportError::EmptyResults);
        }
        self.config.validate()?;
        let started = Instant::now();
        let dir = self.config.output_directory.as_path();

        info!(
            event = "report_start",
            results = results.len() as u64,
            directory = %dir.display(),
        );

        fs::create_dir_all(dir)?;
        let mut colors = self.config.color_sequence()?;
        // Solvers claim colors in result order before any chart sees them.
        for result in results.iter() {
            colors.color_for(result.solver_name.as_str());
        }

        let mut files = Vec::new();
        let mut chart_count = 0;

        if self.config.charts {
            let mut ids = ChartIdRegistry::new();
            let charts = ChartReport::new(&self.config).build(results, &mut ids, &mut colors);
            chart_count = charts.len();
            for chart in &charts {
                let path = chart.write_to_dir(dir)?;
                log_written(&path);
                files.push(path);
            }
        }

        if self.config.csv {
            let path = dir.join("results.csv");
            fs::write(&path, CsvExporter::to_string_all(results))?;
            log_written(&path);
            files.push(path);
        }

        if self.config.markdown {
            let path = dir.join("report.md");
            fs::write(
                &path,
                MarkdownReport::document(results, Some(&colors), Utc::now()),
            )?;
            log_written(&path);
            files.push(path);
        }

        let color_map: IndexMap<String, String> = colors
            .hex_assignments()
            .map(|(k, hex)| (k.clone(), hex))
            .collect();
        let path = dir.join("colors.json");
        fs::write(&path, serde_json::to_string_pretty(&color_map)?)?;
        log_written(&path);
        files.push(path);

        info!(
            event = "report_end",
            files = files.len() as u64,
            charts = chart_count as u64,
            series = color_map.len() as u64,
            duration_ms = started.elapsed().as_millis() as u64,
        );

        Ok(ReportSummary {
            output_directory: dir.to_path_buf(),
            files,
            chart_count,
            colors: color_map,
        })
    }
}

fn log_written(path: &Path) {
    let bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    info!(
        event = "report_file_written",
        file = %path.display(),
        bytes = bytes,
    );
}
