//! Quantity parsing and display formatting
//!
//! Every quantity shown on screen or written to an export goes through
//! [`format_quantity`], so the dashboard, alerts, analysis tables and CSV
//! files all agree on how a number looks.

use serde::{Deserialize, Deserializer};

/// Replace non-finite values with zero
pub fn sanitize_quantity(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parse a quantity leniently: blank, garbage or non-finite input becomes 0
pub fn parse_quantity(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .map(sanitize_quantity)
        .unwrap_or(0.0)
}

/// Format a quantity for display.
///
/// Whole numbers render without decimals, anything else with exactly two.
pub fn format_quantity(value: f64) -> String {
    let value = sanitize_quantity(value);
    if value.fract() == 0.0 {
        // -0.0 would otherwise print as "-0"
        format!("{}", value + 0.0)
    } else {
        format!("{:.2}", value)
    }
}

/// Round to one decimal place, used for per-item averages in summaries
pub fn round_to_tenth(value: f64) -> f64 {
    (sanitize_quantity(value) * 10.0).round() / 10.0
}

/// Percentage of `part` in `whole`, with `0/0` defined as 0%
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Serde helper accepting a number, a numeric string, or null/missing.
///
/// Anything unparseable is coerced to 0 instead of failing the record.
pub fn deserialize_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawQuantity {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<RawQuantity>::deserialize(deserializer)? {
        Some(RawQuantity::Number(n)) => sanitize_quantity(n),
        Some(RawQuantity::Text(s)) => parse_quantity(&s),
        None => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_whole_numbers() {
        assert_eq!(format_quantity(0.0), "0");
        assert_eq!(format_quantity(5.0), "5");
        assert_eq!(format_quantity(-3.0), "-3");
        assert_eq!(format_quantity(-0.0), "0");
        assert_eq!(format_quantity(1200.0), "1200");
    }

    #[test]
    fn test_format_fractions() {
        assert_eq!(format_quantity(5.5), "5.50");
        assert_eq!(format_quantity(5.504), "5.50");
        assert_eq!(format_quantity(0.25), "0.25");
        assert_eq!(format_quantity(-2.75), "-2.75");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_quantity(f64::NAN), "0");
        assert_eq!(format_quantity(f64::INFINITY), "0");
    }

    #[test]
    fn test_format_is_fixed_point() {
        for x in [0.0, 5.0, 5.5, 5.504, 5.505] {
            let once = format_quantity(x);
            let twice = format_quantity(parse_quantity(&once));
            assert_eq!(once, twice, "not a fixed point for {}", x);
        }
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("12.5"), 12.5);
        assert_eq!(parse_quantity(" 7 "), 7.0);
        assert_eq!(parse_quantity(""), 0.0);
        assert_eq!(parse_quantity("lots"), 0.0);
        assert_eq!(parse_quantity("NaN"), 0.0);
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(5.0, 0.0), 0.0);
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(percentage(5.0, 20.0), 25.0);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(1.0 / 3.0), 0.3);
        assert_eq!(round_to_tenth(2.0), 2.0);
        assert_eq!(round_to_tenth(2.46), 2.5);
    }

    #[test]
    fn test_deserialize_quantity_variants() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "deserialize_quantity")]
            quantity: f64,
        }

        let parse = |json: &str| serde_json::from_str::<Row>(json).unwrap().quantity;
        assert_eq!(parse(r#"{"quantity": 4.5}"#), 4.5);
        assert_eq!(parse(r#"{"quantity": "3.25"}"#), 3.25);
        assert_eq!(parse(r#"{"quantity": "n/a"}"#), 0.0);
        assert_eq!(parse(r#"{"quantity": null}"#), 0.0);
        assert_eq!(parse(r#"{}"#), 0.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_format_round_trips_after_one_application(cents in -1_000_000i64..1_000_000) {
            let once = format_quantity(cents as f64 / 100.0);
            prop_assert_eq!(format_quantity(parse_quantity(&once)), once);
        }

        #[test]
        fn prop_whole_numbers_have_no_decimals(n in -100_000i64..100_000) {
            let formatted = format_quantity(n as f64);
            prop_assert!(!formatted.contains('.'));
        }
    }
}
