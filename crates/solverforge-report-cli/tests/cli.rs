//! End-to-end tests for the `solverforge-report` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const RESULTS: &str = r#"[
    {
        "name": "NQueens",
        "solver_name": "Hill Climbing",
        "problem_name": "8 queens",
        "runs": [
            {
                "run_index": 0,
                "solve_time_ms": 1200,
                "final_score": "0",
                "score_levels": [0.0],
                "score_history": [
                    {"time_ms": 0, "levels": [-7.0]},
                    {"time_ms": 300, "levels": [-2.0]},
                    {"time_ms": 900, "levels": [0.0]}
                ],
                "moves_evaluated": 4800,
                "moves_accepted": 600
            }
        ]
    },
    {
        "name": "NQueens",
        "solver_name": "Late Acceptance",
        "problem_name": "8 queens",
        "runs": [
            {
                "run_index": 0,
                "solve_time_ms": 800,
                "final_score": "-1",
                "score_levels": [-1.0]
            }
        ]
    }
]"#;

fn solverforge_report(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_solverforge-report"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run solverforge-report")
}

fn write_results(dir: &Path) -> String {
    let path = dir.join("results.json");
    fs::write(&path, RESULTS).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn writes_report_directory() {
    let dir = tempfile::tempdir().unwrap();
    let results = write_results(dir.path());
    let out = dir.path().join("report");

    let output = solverforge_report(&[results.as_str(), "--output", out.to_str().unwrap()]);
    assert!(output.status.success(), "{:?}", output);

    for file in ["report.md", "results.csv", "colors.json", "timeSpentSummary.json"] {
        assert!(out.join(file).exists(), "{} missing", file);
    }

    let colors: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("colors.json")).unwrap()).unwrap();
    assert_eq!(colors["Hill Climbing"], "#8ae234");
    assert_eq!(colors["Late Acceptance"], "#fce94f");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Report written to"));
    assert!(stdout.contains("Late Acceptance"));
}

#[test]
fn quiet_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let results = write_results(dir.path());
    let out = dir.path().join("quiet");

    let output = solverforge_report(&[results.as_str(), "-o", out.to_str().unwrap(), "--quiet"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(out.join("report.md").exists());
}

#[test]
fn config_file_controls_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let results = write_results(dir.path());
    let out = dir.path().join("from-config");
    let config = dir.path().join("report.yaml");
    fs::write(
        &config,
        format!(
            "output_directory: {:?}\ncsv: false\ncharts: false\n",
            out.to_string_lossy()
        ),
    )
    .unwrap();

    let output = solverforge_report(&[results.as_str(), "--config", config.to_str().unwrap(), "-q"]);
    assert!(output.status.success(), "{:?}", output);
    assert!(out.join("report.md").exists());
    assert!(!out.join("results.csv").exists());
    assert!(!out.join("timeSpentSummary.json").exists());
}

#[test]
fn empty_results_fail() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("empty.json");
    fs::write(&results, "[]").unwrap();

    let output = solverforge_report(&[results.to_str().unwrap(), "-q"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No benchmark results to report"));
}

#[test]
fn malformed_results_fail() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("broken.json");
    fs::write(&results, "{ not json").unwrap();

    let output = solverforge_report(&[results.to_str().unwrap(), "-q"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("JSON error"));
}
