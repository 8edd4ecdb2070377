//! Unit tests for price string normalization.

use super::*;

fn assert_price(raw: &str, expected: f64) {
    let price = parse_price(raw).unwrap_or_else(|| panic!("'{raw}' should parse"));
    assert!(
        (price - expected).abs() < 1e-9,
        "'{raw}' parsed as {price}, expected {expected}"
    );
}

mod parse_price_tests {
    use super::*;

    #[test]
    fn parses_brazilian_format_with_currency() {
        assert_price("R$ 1.234,56", 1234.56);
    }

    #[test]
    fn parses_comma_decimal() {
        assert_price("12,50", 12.50);
    }

    #[test]
    fn parses_international_thousands() {
        assert_price("1,234.56", 1234.56);
    }

    #[test]
    fn parses_plain_number_directly() {
        assert_price("9.5", 9.5);
        assert_price("100", 100.0);
    }

    #[test]
    fn strips_currency_without_space() {
        assert_price("R$9,50", 9.50);
        assert_price("$ 3.75", 3.75);
    }

    #[test]
    fn strips_non_breaking_space() {
        assert_price("R$\u{a0}7,25", 7.25);
    }

    #[test]
    fn comma_with_three_decimals_is_thousands_separator() {
        assert_price("1,234", 1234.0);
    }

    #[test]
    fn single_comma_digit_is_decimal() {
        assert_price("12,5", 12.5);
    }

    #[test]
    fn repeated_periods_before_comma_are_thousands() {
        assert_price("1.234.567,89", 1234567.89);
    }

    #[test]
    fn repeated_commas_before_period_are_thousands() {
        assert_price("1,234,567.89", 1234567.89);
    }

    #[test]
    fn last_comma_with_short_tail_is_decimal() {
        assert_price("1,234,56", 1234.56);
    }

    #[test]
    fn ignores_trailing_text() {
        assert_price("12,50 / kg", 12.50);
    }

    #[test]
    fn keeps_negative_sign() {
        assert_price("-5,00", -5.0);
    }

    #[test]
    fn empty_string_is_nan() {
        assert!(parse_price("").is_none());
    }

    #[test]
    fn letters_only_is_nan() {
        assert!(parse_price("abc").is_none());
    }

    #[test]
    fn currency_only_is_nan() {
        assert!(parse_price("R$").is_none());
        assert!(parse_price("  ").is_none());
    }

    #[test]
    fn infinity_text_is_not_a_price() {
        assert!(parse_price("inf").is_none());
    }

    #[test]
    fn overflowing_exponent_is_not_a_price() {
        assert!(parse_price("1e400").is_none());
        assert!(parse_price("R$ 1e400").is_none());
    }

    #[test]
    fn exponent_within_range_parses_directly() {
        assert_price("1.5e2", 150.0);
    }

    #[test]
    fn hex_literal_reads_as_zero() {
        assert_eq!(parse_price("0x1A"), Some(0.0));
        assert_eq!(parse_price("0b101"), Some(0.0));
    }

    #[test]
    fn hex_like_text_with_bad_digits_uses_fallback() {
        assert_price("0xZ9", 9.0);
    }

    #[test]
    fn first_comma_after_period_is_decimal() {
        assert_price("1.2,3,4", 12.3);
    }
}

mod parse_price_cell_tests {
    use super::*;

    #[test]
    fn numeric_cell_is_used_as_is() {
        assert_eq!(parse_price_cell(&Cell::Number(12.5)), Some(12.5));
    }

    #[test]
    fn text_cell_is_trimmed_and_parsed() {
        assert_eq!(parse_price_cell(&Cell::Text("  R$ 9,50 ".to_string())), Some(9.5));
    }

    #[test]
    fn empty_cell_has_no_price() {
        assert_eq!(parse_price_cell(&Cell::Empty), None);
    }

    #[test]
    fn non_finite_number_has_no_price() {
        assert_eq!(parse_price_cell(&Cell::Number(f64::NAN)), None);
    }
}

mod leading_float_tests {
    use super::*;

    #[test]
    fn stops_at_second_period() {
        assert_eq!(parse_leading_float("1.2.3"), Some(1.2));
    }

    #[test]
    fn lone_minus_is_not_a_number() {
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("--5"), None);
    }

    #[test]
    fn trailing_period_is_dropped() {
        assert_eq!(parse_leading_float("12."), Some(12.0));
    }
}
