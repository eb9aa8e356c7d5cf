use crate::data::{
    fields::{BALANCE_UNIT, BALANCE_UNIT_TEXT, NORTH_UNIT, NORTH_UNIT_TEXT, SIGNAL_EPSILON},
    ColorState,
};

/// Format a turnover amount in CNY as hundred-millions
/// Example: 1230000000 → 12.30亿
pub fn format_balance(raw_amount: f64) -> String {
    scaled(raw_amount, BALANCE_UNIT, BALANCE_UNIT_TEXT)
}

/// Format a northbound net flow (reported in 10 000 CNY) as hundred-millions
/// Example: 12345.6 → 1.23亿
pub fn format_north_flow(raw_amount: f64) -> String {
    scaled(raw_amount, NORTH_UNIT, NORTH_UNIT_TEXT)
}

fn scaled(raw: f64, unit: f64, suffix: &str) -> String {
    let value = if raw.is_finite() { raw / unit } else { 0.0 };
    format!("{value:.2}{suffix}")
}

/// Remove every known unit suffix from a formatted value
pub fn strip_units(text: &str) -> String {
    [BALANCE_UNIT_TEXT, NORTH_UNIT_TEXT]
        .iter()
        .fold(text.to_string(), |acc, unit| acc.replace(unit, ""))
}

/// Signal of `current` against `previous`
pub fn color_for_delta(current: f64, previous: f64) -> ColorState {
    signal(current - previous)
}

/// Signal of an already formatted value such as `-3.21亿`
///
/// Anything that does not parse counts as zero.
pub fn color_for_formatted_value(text: &str) -> ColorState {
    let value = strip_units(text)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    signal(value)
}

fn signal(delta: f64) -> ColorState {
    if delta > SIGNAL_EPSILON {
        ColorState::Up
    } else if delta < -SIGNAL_EPSILON {
        ColorState::Down
    } else {
        ColorState::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_balance_scales_to_yi() {
        assert_eq!(format_balance(1.23e9), "12.30亿");
        assert_eq!(format_balance(0.0), "0.00亿");
        assert_eq!(format_balance(-45_670_000.0), "-0.46亿");
        assert_eq!(format_balance(987_654_321_000.0), "9876.54亿");
    }

    #[test]
    fn format_balance_matches_rounded_quotient() {
        for raw in [1.0, 12_345_678.0, 1.23e9, 5.5e10, 314_159_265_358.0, -2.7e8] {
            let text = format_balance(raw);
            assert!(text.ends_with(BALANCE_UNIT_TEXT), "{text}");
            let parsed: f64 = strip_units(&text).parse().expect("numeric prefix");
            let expected = (raw / BALANCE_UNIT * 100.0).round() / 100.0;
            assert!((parsed - expected).abs() < 1e-9, "{raw}: {parsed} vs {expected}");
        }
    }

    #[test]
    fn format_north_flow_scales_from_wan() {
        assert_eq!(format_north_flow(12_345.6), "1.23亿");
        assert_eq!(format_north_flow(-250_000.0), "-25.00亿");
    }

    #[test]
    fn non_finite_input_formats_as_zero() {
        assert_eq!(format_balance(f64::NAN), "0.00亿");
        assert_eq!(format_north_flow(f64::INFINITY), "0.00亿");
    }

    #[test]
    fn color_for_delta_respects_epsilon() {
        assert_eq!(color_for_delta(1700.0, 1690.0), ColorState::Up);
        assert_eq!(color_for_delta(1690.0, 1700.0), ColorState::Down);
        assert_eq!(color_for_delta(10.0, 10.0), ColorState::Neutral);
        assert_eq!(color_for_delta(0.000_000_5, 0.0), ColorState::Neutral);
    }

    #[test]
    fn color_for_delta_boundary_is_neutral() {
        assert_eq!(color_for_delta(SIGNAL_EPSILON, 0.0), ColorState::Neutral);
        assert_eq!(color_for_delta(0.0, SIGNAL_EPSILON), ColorState::Neutral);
        assert_eq!(color_for_delta(2.0 * SIGNAL_EPSILON, 0.0), ColorState::Up);
    }

    #[test]
    fn color_for_formatted_value_strips_units() {
        assert_eq!(color_for_formatted_value("12.30亿"), ColorState::Up);
        assert_eq!(color_for_formatted_value("-3.21亿"), ColorState::Down);
        assert_eq!(color_for_formatted_value("0.00亿"), ColorState::Neutral);
    }

    #[test]
    fn color_for_formatted_value_tolerates_garbage() {
        assert_eq!(color_for_formatted_value(""), ColorState::Neutral);
        assert_eq!(color_for_formatted_value("--"), ColorState::Neutral);
        assert_eq!(color_for_formatted_value("abc亿"), ColorState::Neutral);
    }
}
