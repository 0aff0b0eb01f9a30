//! Benchmark result types.
//!
//! Results arrive as JSON produced by a benchmark run. Scores are carried both
//! as their display string (`"0hard/-12soft"`) and as numeric levels, hardest
//! first, which is what charts and ranking use.

use std::cmp::Ordering;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// A score observed at some point of a run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoreSample {
    /// Time since solving started.
    pub time_ms: u64,
    /// Step number when the score was reached.
    #[serde(default)]
    pub step_count: u64,
    /// Score levels, hardest first.
    pub levels: Vec<f64>,
}

/// Result of a single benchmark run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BenchmarkRun {
    /// Run index (0-based).
    pub run_index: usize,
    /// Total solve time in milliseconds.
    pub solve_time_ms: u64,
    /// Final score as displayed by the solver.
    pub final_score: String,
    /// Final score levels, hardest first.
    #[serde(default)]
    pub score_levels: Vec<f64>,
    /// Best-score progression over time.
    #[serde(default)]
    pub score_history: Vec<ScoreSample>,
    #[serde(default)]
    pub moves_evaluated: u64,
    #[serde(default)]
    pub moves_accepted: u64,
    #[serde(default)]
    pub score_calculations: u64,
}

impl BenchmarkRun {
    /// Creates a run with no move statistics.
    pub fn new(
        run_index: usize,
        solve_time_ms: u64,
        final_score: impl Into<String>,
        score_levels: Vec<f64>,
    ) -> Self {
        Self {
            run_index,
            solve_time_ms,
            final_score: final_score.into(),
            score_levels,
            score_history: Vec::new(),
            moves_evaluated: 0,
            moves_accepted: 0,
            score_calculations: 0,
        }
    }

    pub fn solve_time(&self) -> Duration {
        Duration::from_millis(self.solve_time_ms)
    }

    /// Returns moves per second.
    ///
    /// # Example
    ///
    /// ```
    /// use solverforge_report::BenchmarkRun;
    ///
    /// let mut run = BenchmarkRun::new(0, 2_000, "0", vec![0.0]);
    /// run.moves_evaluated = 1000;
    ///
    /// assert!((run.moves_per_second() - 500.0).abs() < 0.001);
    /// ```
    pub fn moves_per_second(&self) -> f64 {
        if self.solve_time_ms == 0 {
            0.0
        } else {
            self.moves_evaluated as f64 / self.solve_time().as_secs_f64()
        }
    }

    /// Returns score calculations per second.
    pub fn score_calculation_speed(&self) -> f64 {
        if self.solve_time_ms == 0 {
            0.0
        } else {
            self.score_calculations as f64 / self.solve_time().as_secs_f64()
        }
    }

    /// Step count at the last recorded score, if the run has a history.
    pub fn step_count(&self) -> Option<u64> {
        self.score_history.last().map(|sample| sample.step_count)
    }

    /// Returns acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }
}

/// Compares score levels hardest first; a missing level ranks below any value.
pub fn compare_levels(a: &[f64], b: &[f64]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.total_cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Aggregated results from multiple runs of one solver on one problem.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BenchmarkResult {
    /// Benchmark name.
    pub name: String,
    /// Solver configuration name.
    pub solver_name: String,
    /// Problem instance name.
    pub problem_name: String,
    /// Individual runs.
    #[serde(default)]
    pub runs: Vec<BenchmarkRun>,
}

impl BenchmarkResult {
    /// Creates a new benchmark result.
    pub fn new(
        name: impl Into<String>,
        solver_name: impl Into<String>,
        problem_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            solver_name: solver_name.into(),
            problem_name: problem_name.into(),
            runs: Vec::new(),
        }
    }

    /// Adds a run to the results.
    pub fn add_run(&mut self, run: BenchmarkRun) {
        self.runs.push(run);
    }

    /// Returns the number of runs.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Returns the run with the best score.
    ///
    /// # Example
    ///
    /// ```
    /// use solverforge_report::{BenchmarkResult, BenchmarkRun};
    ///
    /// let mut result = BenchmarkResult::new("Test", "HC", "Problem1");
    /// result.add_run(BenchmarkRun::new(0, 100, "0hard/-5soft", vec![0.0, -5.0]));
    /// result.add_run(BenchmarkRun::new(1, 100, "-1hard/0soft", vec![-1.0, 0.0]));
    ///
    /// assert_eq!(result.best_run().unwrap().run_index, 0);
    /// assert_eq!(result.worst_run().unwrap().run_index, 1);
    /// ```
    pub fn best_run(&self) -> Option<&BenchmarkRun> {
        self.runs
            .iter()
            .max_by(|a, b| compare_levels(&a.score_levels, &b.score_levels))
    }

    /// Returns the run with the worst score.
    pub fn worst_run(&self) -> Option<&BenchmarkRun> {
        self.runs
            .iter()
            .min_by(|a, b| compare_levels(&a.score_levels, &b.score_levels))
    }

    /// Number of score levels, taken from the widest run.
    pub fn score_level_count(&self) -> usize {
        self.runs
            .iter()
            .map(|r| r.score_levels.len())
            .max()
            .unwrap_or(0)
    }

    /// Returns the average solve time.
    ///
    /// # Example
    ///
    /// ```
    /// use solverforge_report::{BenchmarkResult, BenchmarkRun};
    /// use std::time::Duration;
    ///
    /// let mut result = BenchmarkResult::new("Test", "HC", "Problem1");
    /// result.add_run(BenchmarkRun::new(0, 100, "0", vec![0.0]));
    /// result.add_run(BenchmarkRun::new(1, 200, "0", vec![0.0]));
    ///
    /// assert_eq!(result.avg_solve_time(), Duration::from_millis(150));
    /// ```
    pub fn avg_solve_time(&self) -> Duration {
        if self.runs.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.runs.iter().map(|r| r.solve_time()).sum();
        total / self.runs.len() as u32
    }

    /// Returns the minimum solve time.
    pub fn min_solve_time(&self) -> Duration {
        self.runs
            .iter()
            .map(|r| r.solve_time())
            .min()
            .unwrap_or(Duration::ZERO)
    }

    /// Returns the maximum solve time.
    pub fn max_solve_time(&self) -> Duration {
        self.runs
            .iter()
            .map(|r| r.solve_time())
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Returns the average moves per second.
    pub fn avg_moves_per_second(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        let total: f64 = self.runs.iter().map(|r| r.moves_per_second()).sum();
        total / self.runs.len() as f64
    }

    /// Returns the average score calculation speed.
    pub fn avg_score_calculation_speed(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        let total: f64 = self.runs.iter().map(|r| r.score_calculation_speed()).sum();
        total / self.runs.len() as f64
    }

    /// Returns the average acceptance rate.
    pub fn avg_acceptance_rate(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        let total: f64 = self.runs.iter().map(|r| r.acceptance_rate()).sum();
        total / self.runs.len() as f64
    }
}

/// The full set of results a report is built from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct BenchmarkResults {
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkResults {
    pub fn new(results: Vec<BenchmarkResult>) -> Self {
        Self { results }
    }

    /// Parses a JSON array of results.
    pub fn from_json_str(s: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Reads a JSON array of results from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BenchmarkResult> {
        self.results.iter()
    }

    /// Distinct problem names in first-seen order.
    pub fn problem_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for result in &self.results {
            if !names.contains(&result.problem_name.as_str()) {
                names.push(&result.problem_name);
            }
        }
        names
    }

    /// Widest score level count across all results.
    pub fn score_level_count(&self) -> usize {
        self.results
            .iter()
            .map(BenchmarkResult::score_level_count)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_JSON: &str = r#"[
        {
            "name": "NQueens",
            "solver_name": "Hill Climbing",
            "problem_name": "8 queens",
            "runs": [
                {
                    "run_index": 0,
                    "solve_time_ms": 1500,
                    "final_score": "-2",
                    "score_levels": [-2.0],
                    "score_history": [
                        {"time_ms": 0, "levels": [-9.0]},
                        {"time_ms": 700, "step_count": 12, "levels": [-2.0]}
                    ],
                    "moves_evaluated": 3000,
                    "moves_accepted": 300
                }
            ]
        },
        {
            "name": "NQueens",
            "solver_name": "Tabu Search",
            "problem_name": "16 queens"
        }
    ]"#;

    #[test]
    fn test_parse_results_json() {
        let results = BenchmarkResults::from_json_str(RESULTS_JSON).unwrap();
        assert_eq!(results.len(), 2);

        let hc = &results.results[0];
        assert_eq!(hc.run_count(), 1);
        let run = &hc.runs[0];
        assert_eq!(run.score_history.len(), 2);
        assert_eq!(run.score_history[0].step_count, 0);
        assert_eq!(run.score_history[1].step_count, 12);
        assert_eq!(run.score_calculations, 0);
        assert_eq!(run.score_calculation_speed(), 0.0);
        assert_eq!(run.step_count(), Some(12));
        assert!((run.moves_per_second() - 2000.0).abs() < 1e-9);
        assert!((run.acceptance_rate() - 0.1).abs() < 1e-9);

        assert!(results.results[1].runs.is_empty());
        assert_eq!(results.problem_names(), vec!["8 queens", "16 queens"]);
        assert_eq!(results.score_level_count(), 1);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = BenchmarkResults::from_json_str("{").unwrap_err();
        assert!(matches!(err, ReportError::Json(_)));
    }

    #[test]
    fn test_compare_levels_is_hardest_first() {
        assert_eq!(compare_levels(&[0.0, -10.0], &[-1.0, 0.0]), Ordering::Greater);
        assert_eq!(compare_levels(&[0.0, -10.0], &[0.0, -5.0]), Ordering::Less);
        assert_eq!(compare_levels(&[0.0], &[0.0]), Ordering::Equal);
        assert_eq!(compare_levels(&[0.0], &[0.0, 1.0]), Ordering::Less);
    }

    #[test]
    fn test_empty_result_statistics() {
        let result = BenchmarkResult::new("Test", "HC", "P");
        assert!(result.best_run().is_none());
        assert_eq!(result.avg_solve_time(), Duration::ZERO);
        assert_eq!(result.max_solve_time(), Duration::ZERO);
        assert_eq!(result.avg_moves_per_second(), 0.0);
        assert_eq!(result.avg_acceptance_rate(), 0.0);
    }

    #[test]
    fn test_score_calculation_speed() {
        let mut result = BenchmarkResult::new("Test", "HC", "P");
        let mut fast = BenchmarkRun::new(0, 500, "0", vec![0.0]);
        fast.score_calculations = 4_000;
        let mut slow = BenchmarkRun::new(1, 2_000, "0", vec![0.0]);
        slow.score_calculations = 4_000;
        result.add_run(fast);
        result.add_run(slow);

        assert_eq!(result.runs[0].score_calculation_speed(), 8_000.0);
        assert_eq!(result.runs[1].step_count(), None);
        assert_eq!(result.avg_score_calculation_speed(), 5_000.0);
    }

    #[test]
    fn test_solve_time_extremes() {
        let mut result = BenchmarkResult::new("Test", "HC", "P");
        result.add_run(BenchmarkRun::new(0, 300, "0", vec![0.0]));
        result.add_run(BenchmarkRun::new(1, 100, "0", vec![0.0]));
        assert_eq!(result.min_solve_time(), Duration::from_millis(100));
        assert_eq!(result.max_solve_time(), Duration::from_millis(300));
    }
}
