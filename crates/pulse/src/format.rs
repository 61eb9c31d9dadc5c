//! Display formatting shared by the TUI and the printed snapshot.

pub const MISSING: &str = "—";

/// Direction of a percent change, used to pick a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Unknown,
}

impl Trend {
    pub fn of(change: Option<f64>) -> Self {
        match change {
            Some(change) if change >= 0.0 => Trend::Up,
            Some(change) if change < 0.0 => Trend::Down,
            _ => Trend::Unknown,
        }
    }
}

/// Thousands separators and at most two fraction digits. Missing or zero
/// prices print as a dash.
pub fn price(value: Option<f64>) -> String {
    match value {
        Some(value) if value != 0.0 && value.is_finite() => grouped(value),
        _ => MISSING.to_string(),
    }
}

/// Fixed two decimals, with a trailing `%`.
pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(value) if value.is_finite() => format!("{value:.2}%"),
        _ => MISSING.to_string(),
    }
}

fn grouped(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (int, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut out = String::with_capacity(rounded.len() + int.len() / 3 + 1);
    for (i, digit) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }

    // keeps the sign even when rounding leaves only zeros: -0.001 -> "-0"
    if value < 0.0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_are_grouped_and_trimmed() {
        assert_eq!(price(Some(67012.5)), "67,012.5");
        assert_eq!(price(Some(1234567.891)), "1,234,567.89");
        assert_eq!(price(Some(0.456789)), "0.46");
        assert_eq!(price(Some(189.0)), "189");
        assert_eq!(price(Some(999.999)), "1,000");
        assert_eq!(price(Some(-1500.25)), "-1,500.25");
        assert_eq!(price(Some(-0.001)), "-0");
    }

    #[test]
    fn missing_and_zero_prices_are_dashed() {
        assert_eq!(price(None), MISSING);
        assert_eq!(price(Some(0.0)), MISSING);
        assert_eq!(price(Some(f64::NAN)), MISSING);
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(percent(Some(-1.2345)), "-1.23%");
        assert_eq!(percent(Some(3.0)), "3.00%");
        assert_eq!(percent(None), MISSING);
    }

    #[test]
    fn trend_follows_sign() {
        assert_eq!(Trend::of(Some(0.0)), Trend::Up);
        assert_eq!(Trend::of(Some(-0.01)), Trend::Down);
        assert_eq!(Trend::of(None), Trend::Unknown);
    }
}
