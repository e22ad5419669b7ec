//! es-CL display formatting shared by the list, summary, header and chart.

/// Placeholder for a value that has not been loaded.
pub const NOT_AVAILABLE: &str = "N/A";

/// Sign class of a performance figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceClass {
    Positive,
    Negative,
    Neutral,
}

impl PerformanceClass {
    pub fn of(value: Option<f64>) -> Self {
        match value {
            Some(v) if v > 0.0 => PerformanceClass::Positive,
            Some(v) if v < 0.0 => PerformanceClass::Negative,
            _ => PerformanceClass::Neutral,
        }
    }
}

impl std::fmt::Display for PerformanceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerformanceClass::Positive => write!(f, "positive"),
            PerformanceClass::Negative => write!(f, "negative"),
            PerformanceClass::Neutral => write!(f, "neutral"),
        }
    }
}

/// Two decimals, `.` thousands separator, `,` decimal separator: `1.234,50`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{},{frac_part}", group_thousands(int_part))
}

/// `format_number`, or `N/A` when the value is missing.
pub fn format_number_opt(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format_number)
}

/// Signed percentage with two decimals: `+1.50%`, `-0.25%`.
pub fn format_percentage(value: f64) -> String {
    // -0.0 prints as "-0.00"
    let value = if value == 0.0 { 0.0 } else { value };
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}%")
}

pub fn format_percentage_opt(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format_percentage)
}

/// Compact volume: `2.5M`, `12.3K`, or the plain grouped number below 1000.
pub fn format_volume(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format_plain(value)
    }
}

pub fn format_volume_opt(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format_volume)
}

/// Grouped number with up to three decimals and no trailing zeros.
fn format_plain(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}{}", group_thousands(int_part))
    } else {
        format!("{sign}{},{frac_part}", group_thousands(int_part))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
