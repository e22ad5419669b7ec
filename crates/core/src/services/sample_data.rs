use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::models::instrument::{ConstituentSummary, HistoryPoint, Tendency};

/// Days reached back from the end date; the series has `SAMPLE_DAYS + 1` points.
pub const SAMPLE_DAYS: i64 = 365;

/// Base price for codes missing from the table, and for the generic series.
pub const DEFAULT_BASE_PRICE: f64 = 5000.0;

/// Relative daily volatility around the base price.
const VOLATILITY: f64 = 0.02;

/// Base price the sample series oscillates around for a known instrument.
pub fn base_price_for(code: &str) -> f64 {
    match code {
        "AGUAS-A" => 280.0,
        "ANDINA-B" => 2800.0,
        "BCI" => 28000.0,
        "BSANTANDER" => 45000.0,
        "CAP" => 6000.0,
        _ => DEFAULT_BASE_PRICE,
    }
}

/// Sum of the UTF-16 code units of the code, wrapping on overflow.
pub fn seed_for(code: &str) -> u32 {
    code.encode_utf16()
        .fold(0u32, |acc, unit| acc.wrapping_add(u32::from(unit)))
}

/// Stand-in price history used when real data is unavailable.
///
/// The series is a pure function of the instrument code and end instant:
/// trigonometric terms of the seed and day offset, no randomness. It is
/// meant to keep the chart populated, not to look like a real market.
pub struct SampleDataGenerator;

impl SampleDataGenerator {
    /// 366 daily points ending at `end` for the given instrument.
    pub fn for_instrument(code: &str, end: DateTime<Utc>) -> Vec<HistoryPoint> {
        generate(f64::from(seed_for(code)), base_price_for(code), end)
    }

    /// 366 daily points ending at `end`, not tied to any instrument.
    pub fn generic(end: DateTime<Utc>) -> Vec<HistoryPoint> {
        generate(0.0, DEFAULT_BASE_PRICE, end)
    }
}

fn generate(seed: f64, base: f64, end: DateTime<Utc>) -> Vec<HistoryPoint> {
    let volatility = base * VOLATILITY;

    (0..=SAMPLE_DAYS)
        .rev()
        .map(|days_back| {
            let i = days_back as f64;
            let date = end - Duration::days(days_back);

            let random_factor = ((seed + i * 0.1).sin() + (seed * 0.7 + i * 0.15).cos()) / 2.0;
            let trend_factor = (i * 0.2).sin() * 0.3;

            let price = base + random_factor * volatility + trend_factor * volatility;
            let open = price + (seed + i * 0.3).sin() * volatility * 0.5;
            let high = price.max(open) + (seed + i * 0.2).cos().abs() * volatility * 0.3;
            let low = price.min(open) - (seed + i * 0.4).sin().abs() * volatility * 0.3;
            let change = price - base;

            HistoryPoint {
                datetime_last_price: date.to_rfc3339_opts(SecondsFormat::Millis, true),
                datetime_last_price_ts: date.timestamp_millis(),
                last_price: round2(price),
                open_price: round2(open),
                close_price: round2(price),
                high_price: round2(high),
                low_price: round2(low),
                volume: ((seed + i).sin().abs() * 1_000_000.0).floor() + 100_000.0,
                volume_money: ((seed + i).cos().abs() * 50_000_000.0).floor() + 1_000_000.0,
                performance_relative: change / base * 100.0,
                performance_absolute: change,
                tend: Tendency::from_change(change),
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Constituent list shown when the constituents resource cannot be fetched.
pub fn mock_constituents() -> Vec<ConstituentSummary> {
    vec![
        mock_constituent(
            "AGUAS-A",
            "Aguas Andinas A",
            [-1.85, 5.23, 12.45, 8.76],
            347.50,
            (1_250_000.0, 15_600_000.0),
            Tendency::Down,
            (-6.45, -1.85),
        ),
        mock_constituent(
            "ANDINA-B",
            "Compañía Cervecerías Unidas B",
            [2.34, -3.12, 18.90, 25.43],
            8950.0,
            (2_340_000.0, 28_900_000.0),
            Tendency::Up,
            (205.0, 2.34),
        ),
        mock_constituent(
            "BCI",
            "Banco de Crédito e Inversiones",
            [0.89, 7.65, 22.10, 35.67],
            28560.0,
            (4_560_000.0, 67_800_000.0),
            Tendency::Up,
            (252.0, 0.89),
        ),
    ]
}

fn mock_constituent(
    code: &str,
    name: &str,
    [pct_day, pct_30d, pct_cy, pct_1y]: [f64; 4],
    last_price: f64,
    (volume_money, accumulated_volume_money): (f64, f64),
    tend: Tendency,
    (performance_absolute, performance_relative): (f64, f64),
) -> ConstituentSummary {
    ConstituentSummary {
        code_instrument: code.to_string(),
        name: name.to_string(),
        short_name: code.to_string(),
        pct_day,
        pct_30d,
        pct_cy,
        pct_1y,
        last_price,
        datetime_last_price: "2025-09-05T15:30:00".to_string(),
        volume_money,
        accumulated_volume_money,
        tend,
        performance_absolute,
        performance_relative,
    }
}
