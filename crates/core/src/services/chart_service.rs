use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::models::chart::{ChartSeries, PriceStats, SeriesSource, Trend};
use crate::models::instrument::HistoryPoint;
use crate::models::period::Period;
use crate::services::sample_data::SampleDataGenerator;

/// A window with fewer points than this is considered degenerate.
pub const MIN_WINDOW_POINTS: usize = 5;

/// Size of the raw-tail fallback for a degenerate window.
pub const FALLBACK_TAIL_POINTS: usize = 30;

/// Default upper bound on non-empty x-axis labels.
pub const DEFAULT_MAX_LABELS: usize = 15;

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a history timestamp in any of the shapes the data resources use.
///
/// 1. `"DD-MM-YYYY HH:MM:SS"`: only the date part is kept (midnight).
/// 2. Otherwise (or if step 1 yields no valid date): RFC 3339, ISO 8601
///    without offset, `YYYY-MM-DD[ HH:MM[:SS]]`, `YYYY/MM/DD`, RFC 2822.
///    Offset-bearing values are normalized to UTC.
pub fn parse_history_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.contains('-') && s.contains(' ') {
        if let Some(dt) = parse_day_month_year(s) {
            return Some(dt);
        }
    }
    parse_generic(s)
}

fn parse_day_month_year(s: &str) -> Option<NaiveDateTime> {
    let date_part = s.split(' ').next()?;
    let mut fields = date_part.split('-');
    let day: u32 = fields.next()?.parse().ok()?;
    let month: u32 = fields.next()?.parse().ok()?;
    let year: i32 = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

fn parse_generic(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    DateTime::parse_from_rfc2822(s).ok().map(|dt| dt.naive_utc())
}

/// Turns raw instrument history into chart-ready series.
///
/// The engine trusts neither the order nor the date format of its input.
/// Every path ends in a non-empty series:
/// window → tail of the raw input → synthetic sample data.
#[derive(Debug, Clone)]
pub struct ChartService {
    max_labels: usize,
}

impl ChartService {
    pub fn new() -> Self {
        Self::with_max_labels(DEFAULT_MAX_LABELS)
    }

    pub fn with_max_labels(max_labels: usize) -> Self {
        Self {
            max_labels: max_labels.max(1),
        }
    }

    pub fn max_labels(&self) -> usize {
        self.max_labels
    }

    /// Most recent parseable date in `points`, or `now` when none parses.
    pub fn reference_date(&self, points: &[HistoryPoint], now: DateTime<Utc>) -> NaiveDateTime {
        points
            .iter()
            .filter_map(|p| parse_history_datetime(&p.datetime_last_price))
            .max()
            .unwrap_or_else(|| now.naive_utc())
    }

    /// Points dated within `[reference - period, reference]`, oldest first.
    ///
    /// Points whose date does not parse are dropped.
    pub fn filter_by_period(
        &self,
        points: &[HistoryPoint],
        period: Period,
        now: DateTime<Utc>,
    ) -> Vec<HistoryPoint> {
        let reference = self.reference_date(points, now);
        let start = reference - Duration::days(period.offset_days());

        let mut dated: Vec<(NaiveDateTime, &HistoryPoint)> = points
            .iter()
            .filter_map(|p| parse_history_datetime(&p.datetime_last_price).map(|d| (d, p)))
            .filter(|(d, _)| *d >= start && *d <= reference)
            .collect();
        dated.sort_by_key(|(d, _)| *d);

        debug!(
            period = %period,
            kept = dated.len(),
            total = points.len(),
            from = %start,
            to = %reference,
            "filtered history by period"
        );

        dated.into_iter().map(|(_, p)| p.clone()).collect()
    }

    /// Build the series to plot for `period`.
    ///
    /// When the window holds fewer than `MIN_WINDOW_POINTS`, the last
    /// `FALLBACK_TAIL_POINTS` raw points are used as they are, even if they
    /// predate the window. Empty input yields the generic sample series.
    pub fn build_series(
        &self,
        points: &[HistoryPoint],
        period: Period,
        now: DateTime<Utc>,
    ) -> ChartSeries {
        let windowed = self.filter_by_period(points, period, now);

        let (points, source) = if windowed.len() >= MIN_WINDOW_POINTS {
            (windowed, SeriesSource::Windowed)
        } else {
            let take = points.len().min(FALLBACK_TAIL_POINTS);
            let tail = points[points.len() - take..].to_vec();
            if tail.is_empty() {
                debug!("no history to plot, using sample series");
                (SampleDataGenerator::generic(now), SeriesSource::Synthetic)
            } else {
                debug!(window = windowed.len(), tail = tail.len(), "window too sparse, using raw tail");
                (tail, SeriesSource::Tail)
            }
        };

        let labels = self.build_labels(&points, period);
        let prices: Vec<f64> = points.iter().map(|p| p.last_price).collect();
        let trend = trend_of(&prices);

        ChartSeries {
            period,
            points,
            labels,
            prices,
            trend,
            source,
        }
    }

    /// X-axis labels: one every `ceil(n / max_labels)` points, plus the last.
    pub fn build_labels(&self, points: &[HistoryPoint], period: Period) -> Vec<String> {
        let n = points.len();
        if n == 0 {
            return Vec::new();
        }
        let stride = n.div_ceil(self.max_labels);
        points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i % stride == 0 || i == n - 1 {
                    format_label(&p.datetime_last_price, period)
                } else {
                    String::new()
                }
            })
            .collect()
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Short es-CL date label: `"6 nov"`, or `"6 nov 2023"` for the 1-year period.
///
/// A value that does not parse is returned unchanged.
pub fn format_label(raw: &str, period: Period) -> String {
    let Some(dt) = parse_history_datetime(raw) else {
        return raw.to_string();
    };
    let month = MONTHS_ES[dt.month0() as usize];
    match period {
        Period::OneYear => format!("{} {} {}", dt.day(), month, dt.year()),
        _ => format!("{} {}", dt.day(), month),
    }
}

/// `Up` when the last price is at or above the first.
pub fn trend_of(prices: &[f64]) -> Trend {
    match (prices.first(), prices.last()) {
        (Some(first), Some(last)) if last < first => Trend::Down,
        _ => Trend::Up,
    }
}

/// Max, min and range of the plotted prices; `None` for an empty series.
pub fn price_stats(series: &ChartSeries) -> Option<PriceStats> {
    if series.prices.is_empty() {
        return None;
    }
    let max = series.prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = series.prices.iter().copied().fold(f64::INFINITY, f64::min);
    Some(PriceStats {
        max,
        min,
        range: max - min,
    })
}
