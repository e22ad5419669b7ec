use serde::{Deserialize, Serialize};

use super::instrument::HistoryPoint;
use super::period::Period;

/// Direction of the plotted series, used to color the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    /// Last plotted price is at or above the first
    Up,
    Down,
}

/// Which step of the windowing pipeline produced a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesSource {
    /// Date-bounded to the requested period and sorted
    Windowed,
    /// Too few points in the window; tail of the raw input instead
    Tail,
    /// No input at all; generated sample data
    Synthetic,
}

/// A chart-ready series.
///
/// The core computes everything. The frontend only renders:
/// `labels[i]` and `prices[i]` belong to `points[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub period: Period,
    pub points: Vec<HistoryPoint>,

    /// X-axis labels, empty string where the label is thinned out
    pub labels: Vec<String>,

    /// Last price of each point
    pub prices: Vec<f64>,

    pub trend: Trend,
    pub source: SeriesSource,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Summary numbers shown under the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub max: f64,
    pub min: f64,
    pub range: f64,
}
