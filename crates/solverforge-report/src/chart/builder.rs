//! Line chart builder.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use indexmap::IndexMap;
use tracing::debug;

use super::downsample::largest_triangle_three_buckets;
use super::{ChartIdRegistry, Dataset, LineChart};
use crate::color::ColorSequence;

/// Collects points per dataset and turns them into a [`LineChart`].
///
/// # Example
///
/// ```
/// use solverforge_report::chart::{ChartIdRegistry, LineChartBuilder};
/// use solverforge_report::ColorSequence;
///
/// let mut builder = LineChartBuilder::new("bestScore", "Best score")
///     .with_x_label("Time spent")
///     .with_y_label("Score")
///     .time_on_x();
/// builder.add("Hill Climbing", 0, -10.0).add("Hill Climbing", 500, -4.0);
/// builder.add("Tabu Search", 250, -6.0);
///
/// let mut ids = ChartIdRegistry::new();
/// let mut colors: ColorSequence = ColorSequence::new();
/// let chart = builder.build(&mut ids, &mut colors);
///
/// assert_eq!(chart.keys, vec![0, 250, 500]);
/// assert_eq!(chart.datasets[0].data, vec![Some(-10.0), None, Some(-4.0)]);
/// assert_eq!(chart.datasets[1].color, "#fce94f");
/// ```
#[derive(Debug, Clone)]
pub struct LineChartBuilder {
    id: String,
    title: String,
    x_label: String,
    y_label: String,
    stepped: bool,
    time_on_x: bool,
    time_on_y: bool,
    linear_y: bool,
    max_chart_width: usize,
    log_scale_min_datasets: usize,
    data: IndexMap<String, BTreeMap<u64, f64>>,
    favorites: HashSet<String>,
}

impl LineChartBuilder {
    /// Maximum points kept per dataset.
    pub const DEFAULT_MAX_CHART_WIDTH: usize = 3840;

    /// Distinct values needed before a logarithmic axis is considered.
    pub const DEFAULT_LOG_SCALE_MIN_DATASETS: usize = 5;

    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            stepped: false,
            time_on_x: false,
            time_on_y: false,
            linear_y: false,
            max_chart_width: Self::DEFAULT_MAX_CHART_WIDTH,
            log_scale_min_datasets: Self::DEFAULT_LOG_SCALE_MIN_DATASETS,
            data: IndexMap::new(),
            favorites: HashSet::new(),
        }
    }

    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    /// Draws datasets as step functions.
    pub fn stepped(mut self) -> Self {
        self.stepped = true;
        self
    }

    pub fn time_on_x(mut self) -> Self {
        self.time_on_x = true;
        self
    }

    pub fn time_on_y(mut self) -> Self {
        self.time_on_y = true;
        self
    }

    /// Keeps the y axis linear whatever the spread of the values.
    pub fn linear_y(mut self) -> Self {
        self.linear_y = true;
        self
    }

    /// Sets the number of points above which a dataset is downsampled.
    ///
    /// Values below 3 are raised to 3; LTTB always keeps both end points.
    pub fn with_max_chart_width(mut self, width: usize) -> Self {
        self.max_chart_width = width.max(3);
        self
    }

    pub fn with_log_scale_min_datasets(mut self, count: usize) -> Self {
        self.log_scale_min_datasets = count;
        self
    }

    /// Records `y` at `x` for `dataset`, replacing an earlier value at `x`.
    pub fn add(&mut self, dataset: &str, x: u64, y: f64) -> &mut Self {
        match self.data.get_mut(dataset) {
            Some(points) => {
                points.insert(x, y);
            }
            None => {
                self.data.insert(dataset.to_string(), BTreeMap::from([(x, y)]));
            }
        }
        self
    }

    /// Marks `dataset` as a favorite, which renderers draw emphasized.
    pub fn mark_favorite(&mut self, dataset: &str) -> &mut Self {
        self.favorites.insert(dataset.to_string());
        self
    }

    /// Dataset names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.data.keys().map(String::as_str)
    }

    /// Number of points recorded for `dataset`.
    pub fn count(&self, dataset: &str) -> usize {
        self.data.get(dataset).map_or(0, BTreeMap::len)
    }

    /// The value at the largest x of `dataset`.
    pub fn last_value(&self, dataset: &str) -> Option<f64> {
        self.data
            .get(dataset)
            .and_then(|points| points.values().next_back().copied())
    }

    /// Builds the chart.
    ///
    /// Each dataset first loses the middle of every run of three equal values,
    /// then is downsampled to the maximum chart width. All remaining x keys are
    /// merged, and every dataset is aligned to them with `None` for gaps.
    /// Datasets are colored by label from `colors`.
    pub fn build(self, ids: &mut ChartIdRegistry, colors: &mut ColorSequence) -> LineChart {
        let max_chart_width = self.max_chart_width;
        let sampled: IndexMap<String, BTreeMap<u64, f64>> = self
            .data
            .into_iter()
            .map(|(label, mut points)| {
                remove_redundant_points(&mut points);
                let points = largest_triangle_three_buckets(&points, max_chart_width);
                (label, points)
            })
            .collect();

        let keys: Vec<u64> = sampled
            .values()
            .flat_map(|points| points.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let datasets: Vec<Dataset> = sampled
            .into_iter()
            .map(|(label, points)| Dataset {
                data: keys.iter().map(|x| points.get(x).copied()).collect(),
                favorite: self.favorites.contains(&label),
                color: colors.color_for(label.as_str()),
                label,
            })
            .collect();

        let id = ids.make_unique(&self.id);
        debug!(
            event = "chart_built",
            chart = %id,
            datasets = datasets.len() as u64,
            points = keys.len() as u64,
        );

        LineChart {
            id,
            title: self.title,
            x_label: self.x_label,
            y_label: self.y_label,
            keys,
            datasets,
            stepped: self.stepped,
            time_on_x: self.time_on_x,
            time_on_y: self.time_on_y,
            linear_y: self.linear_y,
            log_scale_min_datasets: self.log_scale_min_datasets,
        }
    }
}

/// Drops the middle point of every three consecutive equal values.
///
/// Runs are judged on the points as they were before any removal, so a run
/// of equal values collapses to its two end points.
pub(crate) fn remove_redundant_points(points: &mut BTreeMap<u64, f64>) {
    if points.len() < 3 {
        return;
    }
    let snapshot: Vec<(u64, f64)> = points.iter().map(|(x, y)| (*x, *y)).collect();
    for window in snapshot.windows(3) {
        let (_, y1) = window[0];
        let (x2, y2) = window[1];
        let (_, y3) = window[2];
        if y1 == y2 && y2 == y3 {
            points.remove(&x2);
        }
    }
}
