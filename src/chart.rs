//! Chart data preparation: unit scale, metric labels, legend visibility and series building.

use std::collections::BTreeSet;

use crate::state::{ChartMode, Record};
use crate::util::title_case;

/// Unit scale applied to the y axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    /// Raw values.
    Units,
    /// Values divided by 1e3.
    Thousands,
    /// Values divided by 1e6.
    Millions,
    /// Values divided by 1e9.
    Billions,
}

impl Scale {
    /// Divisor applied to raw values.
    #[must_use]
    pub const fn divisor(self) -> f64 {
        match self {
            Self::Units => 1.0,
            Self::Thousands => 1e3,
            Self::Millions => 1e6,
            Self::Billions => 1e9,
        }
    }

    /// Axis subtitle; `None` for raw units.
    #[must_use]
    pub const fn subtitle(self) -> Option<&'static str> {
        match self {
            Self::Units => None,
            Self::Thousands => Some("Y-axis values in Thousands"),
            Self::Millions => Some("Y-axis values in Millions"),
            Self::Billions => Some("Y-axis values in Billions"),
        }
    }
}

/// What: Pick the unit scale for the selected metrics of a dataset.
///
/// Inputs:
/// - `rows`: Displayed dataset
/// - `metrics`: Metrics plotted
///
/// Output:
/// - The largest scale whose threshold the biggest magnitude reaches.
#[must_use]
pub fn detect_scale(rows: &[Record], metrics: &[String]) -> Scale {
    let max = rows
        .iter()
        .flat_map(|r| metrics.iter().filter_map(move |m| r.number(m)))
        .map(f64::abs)
        .fold(0.0_f64, f64::max);
    if max >= 1e9 {
        Scale::Billions
    } else if max >= 1e6 {
        Scale::Millions
    } else if max >= 1e3 {
        Scale::Thousands
    } else {
        Scale::Units
    }
}

/// Which selected metrics are drawn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Legend {
    /// Selected metrics in legend order.
    metrics: Vec<String>,
    /// Metrics toggled off.
    hidden: BTreeSet<String>,
}

impl Legend {
    /// Legend with every metric visible.
    #[must_use]
    pub const fn new(metrics: Vec<String>) -> Self {
        Self {
            metrics,
            hidden: BTreeSet::new(),
        }
    }

    /// Selected metrics in legend order.
    #[must_use]
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// What: Flip the visibility of the metric at `index`.
    ///
    /// Output:
    /// - `true` when something changed; a lone metric and out-of-range indices are no-ops.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.metrics.len() < 2 {
            return false;
        }
        let Some(metric) = self.metrics.get(index) else {
            return false;
        };
        if !self.hidden.remove(metric) {
            self.hidden.insert(metric.clone());
        }
        true
    }

    /// Whether `metric` is drawn.
    #[must_use]
    pub fn is_visible(&self, metric: &str) -> bool {
        self.metrics.len() == 1 || !self.hidden.contains(metric)
    }

    /// Visible metrics in legend order.
    #[must_use]
    pub fn visible(&self) -> Vec<String> {
        self.metrics
            .iter()
            .filter(|m| self.is_visible(m))
            .cloned()
            .collect()
    }
}

/// One plotted metric.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    /// Metric key.
    pub metric: String,
    /// Title Case label.
    pub label: String,
    /// `(x index, scaled value)` points in dataset order.
    pub points: Vec<(f64, f64)>,
}

/// Everything the chart widget needs.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartData {
    /// Unit scale.
    pub scale: Scale,
    /// X labels (years) by index.
    pub x_labels: Vec<String>,
    /// Visible series in legend order; cumulative in stacked mode.
    pub series: Vec<Series>,
    /// Smallest and largest plotted y values.
    pub y_bounds: (f64, f64),
}

/// X label of a record: `calendarYear`, else the year of `date`, else blank.
fn x_label(record: &Record) -> String {
    record
        .year("calendarYear")
        .or_else(|| record.year("date"))
        .map(|y| y.to_string())
        .unwrap_or_default()
}

/// What: Build chart series from the displayed dataset.
///
/// Inputs:
/// - `rows`: Displayed dataset, plotted in its current order
/// - `legend`: Selected metrics and visibility
/// - `mode`: Line, stacked area or area
///
/// Output:
/// - Scaled series and axis data; stacked mode sums visible metrics cumulatively in legend order
///   (missing values count as zero there, and are skipped in the other modes).
///
/// Details:
/// - Scale detection looks at every selected metric, visible or not, so toggling the legend does
///   not rescale the axis.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn build_chart(rows: &[Record], legend: &Legend, mode: ChartMode) -> ChartData {
    let scale = detect_scale(rows, legend.metrics());
    let divisor = scale.divisor();
    let mut running = vec![0.0_f64; rows.len()];
    let mut series = Vec::new();
    for metric in legend.visible() {
        let points = rows
            .iter()
            .enumerate()
            .filter_map(|(i, r)| {
                let value = r.number(&metric).map(|v| v / divisor);
                match mode {
                    ChartMode::StackedArea => {
                        running[i] += value.unwrap_or(0.0);
                        Some((i as f64, running[i]))
                    }
                    ChartMode::Line | ChartMode::Area => value.map(|v| (i as f64, v)),
                }
            })
            .collect();
        series.push(Series {
            label: title_case(&metric),
            metric,
            points,
        });
    }
    let (lo, hi) = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, y)| *y))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
    let y_bounds = if lo.is_finite() { (lo.min(0.0), hi.max(0.0)) } else { (0.0, 1.0) };
    ChartData {
        scale,
        x_labels: rows.iter().map(x_label).collect(),
        series,
        y_bounds,
    }
}
