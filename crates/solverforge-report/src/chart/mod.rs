//! Line charts for the benchmark report.
//!
//! A [`LineChart`] is plain data: x keys shared by every dataset, and per
//! dataset one optional y value for each key. Rendering is left to whatever
//! charting library consumes the JSON written by [`LineChart::write_to_dir`].

mod builder;
mod downsample;


use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ReportError;
use crate::time::{format_clock, humanize_millis};

pub use builder::LineChartBuilder;
pub use downsample::largest_triangle_three_buckets;

/// Hands out chart ids that are unique within one report.
///
/// # Example
///
/// ```
/// use solverforge_report::chart::ChartIdRegistry;
///
/// let mut ids = ChartIdRegistry::new();
/// assert_eq!(ids.make_unique("bestScore"), "bestScore");
/// assert_eq!(ids.make_unique("bestScore"), "bestScore_1");
/// assert_eq!(ids.make_unique("bestScore"), "bestScore_2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChartIdRegistry {
    used: HashSet<String>,
}

impl ChartIdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_unique(&mut self, id: &str) -> String {
        if self.used.insert(id.to_string()) {
            return id.to_string();
        }
        let mut suffix = 1usize;
        loop {
            let candidate = format!("{}_{}", id, suffix);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

/// One series of a line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    /// One value per chart key; `None` where the series has no point.
    pub data: Vec<Option<f64>>,
    pub favorite: bool,
    /// CSS hex color from the report's color sequence.
    pub color: String,
}

/// A built line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub id: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub keys: Vec<u64>,
    pub datasets: Vec<Dataset>,
    pub stepped: bool,
    pub time_on_x: bool,
    pub time_on_y: bool,
    linear_y: bool,
    log_scale_min_datasets: usize,
}

#[derive(Serialize)]
struct ChartJson<'a> {
    id: &'a str,
    title: &'a str,
    x_label: &'a str,
    y_label: &'a str,
    stepped: bool,
    time_on_x: bool,
    time_on_y: bool,
    x: AxisJson,
    y: AxisJson,
    keys: &'a [u64],
    datasets: &'a [Dataset],
}

#[derive(Serialize)]
struct AxisJson {
    min: f64,
    max: f64,
    step_size: f64,
    logarithmic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<TimeAxisLabels>,
}

/// Human-readable bounds and tick spacing of a millisecond axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeAxisLabels {
    pub min: String,
    pub max: String,
    pub step_size: String,
}

impl TimeAxisLabels {
    /// Bounds render as clock positions, the step as a duration.
    ///
    /// # Example
    ///
    /// ```
    /// use solverforge_report::chart::TimeAxisLabels;
    ///
    /// let labels = TimeAxisLabels::new(0.0, 90_500.0, 1_000.0);
    /// assert_eq!(labels.max, "00:01:30.500");
    /// assert_eq!(labels.step_size, "1s");
    /// ```
    pub fn new(min: f64, max: f64, step_size: f64) -> Self {
        // Saturating casts; time axes never go below zero.
        let millis = |value: f64| value.max(0.0) as u64;
        Self {
            min: format_clock(millis(min)),
            max: format_clock(millis(max)),
            step_size: humanize_millis(millis(step_size)),
        }
    }
}

impl LineChart {
    pub fn x_min(&self) -> f64 {
        axis_min(self.x_values())
    }

    pub fn x_max(&self) -> f64 {
        axis_max(self.x_values())
    }

    pub fn y_min(&self) -> f64 {
        axis_min(self.y_values())
    }

    pub fn y_max(&self) -> f64 {
        axis_max(self.y_values())
    }

    pub fn x_step_size(&self) -> f64 {
        step_size(self.x_min(), self.x_max())
    }

    pub fn y_step_size(&self) -> f64 {
        step_size(self.y_min(), self.y_max())
    }

    /// Logarithmic time does not make sense, so a time axis is always linear.
    pub fn x_logarithmic(&self) -> bool {
        !self.time_on_x && use_logarithmic_scale(self.x_values(), self.log_scale_min_datasets)
    }

    pub fn y_logarithmic(&self) -> bool {
        !self.time_on_y
            && !self.linear_y
            && use_logarithmic_scale(self.y_values(), self.log_scale_min_datasets)
    }

    /// Labels for the x axis when it carries time.
    pub fn x_time_labels(&self) -> Option<TimeAxisLabels> {
        self.time_on_x
            .then(|| TimeAxisLabels::new(self.x_min(), self.x_max(), self.x_step_size()))
    }

    pub fn y_time_labels(&self) -> Option<TimeAxisLabels> {
        self.time_on_y
            .then(|| TimeAxisLabels::new(self.y_min(), self.y_max(), self.y_step_size()))
    }

    /// Returns the non-empty `(x, y)` points of the dataset labelled `label`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::DatasetNotFound`] for an unknown label.
    pub fn points(&self, label: &str) -> Result<Vec<(u64, f64)>, ReportError> {
        let dataset = self
            .datasets
            .iter()
            .find(|d| d.label == label)
            .ok_or_else(|| ReportError::DatasetNotFound(label.to_string()))?;
        Ok(self
            .keys
            .iter()
            .zip(&dataset.data)
            .filter_map(|(x, y)| y.map(|y| (*x, y)))
            .collect())
    }

    /// Serializes the chart, including its computed axes, as pretty JSON.
    pub fn to_json(&self) -> Result<String, ReportError> {
        let view = ChartJson {
            id: &self.id,
            title: &self.title,
            x_label: &self.x_label,
            y_label: &self.y_label,
            stepped: self.stepped,
            time_on_x: self.time_on_x,
            time_on_y: self.time_on_y,
            x: AxisJson {
                min: self.x_min(),
                max: self.x_max(),
                step_size: self.x_step_size(),
                logarithmic: self.x_logarithmic(),
                labels: self.x_time_labels(),
            },
            y: AxisJson {
                min: self.y_min(),
                max: self.y_max(),
                step_size: self.y_step_size(),
                logarithmic: self.y_logarithmic(),
                labels: self.y_time_labels(),
            },
            keys: &self.keys,
            datasets: &self.datasets,
        };
        Ok(serde_json::to_string_pretty(&view)?)
    }

    /// Writes `<id>.json` into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", self.id));
        fs::write(&path, self.to_json()?)?;
        Ok(path)
    }

    fn x_values(&self) -> Vec<f64> {
        self.keys.iter().map(|&x| x as f64).collect()
    }

    fn y_values(&self) -> Vec<f64> {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().flatten().copied())
            .collect()
    }
}

/// Lower axis bound; always reaches down to zero.
fn axis_min(values: Vec<f64>) -> f64 {
    let min = values.into_iter().reduce(f64::min).unwrap_or(0.0);
    if min > 0.0 {
        0.0
    } else {
        min
    }
}

/// Upper axis bound; always reaches up to zero.
fn axis_max(values: Vec<f64>) -> f64 {
    let max = values.into_iter().reduce(f64::max).unwrap_or(0.0);
    if max < 0.0 {
        0.0
    } else {
        max
    }
}

/// Tick spacing two orders of magnitude below the range, so that a range of
/// `123_456_789` ticks every `1_000_000`.
///
/// # Example
///
/// ```
/// use solverforge_report::chart::step_size;
///
/// assert_eq!(step_size(0.0, 123_456_789.0), 1_000_000.0);
/// assert_eq!(step_size(5.0, 5.0), 1.0);
/// ```
pub fn step_size(min: f64, max: f64) -> f64 {
    let diff = (max - min).abs();
    if diff == 0.0 {
        1.0
    } else {
        let nearest_power_of_ten = diff.log10().round() as i32;
        10f64.powi(nearest_power_of_ten - 2)
    }
}

/// Decides whether values are skewed enough to warrant a logarithmic axis.
///
/// Requires every value to be positive and at least `min_distinct` distinct
/// values. Then, if 60% of the distinct values lie below 20% of their range,
/// the axis goes logarithmic.
pub fn use_logarithmic_scale(values: Vec<f64>, min_distinct: usize) -> bool {
    let mut distinct = values;
    if distinct.iter().any(|&v| v <= 0.0) {
        return false;
    }
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    let (Some(&first), Some(&last)) = (distinct.first(), distinct.last()) else {
        return false;
    };
    if distinct.len() < min_distinct {
        return false;
    }
    let threshold = 0.2 * (last - first);
    let below_threshold = distinct.iter().filter(|&&v| v < threshold).count();
    below_threshold as f64 >= 0.6 * distinct.len() as f64
}
