use regex::Regex;

lazy_static::lazy_static! {
    static ref NON_NUMERIC: Regex = Regex::new(r"[^0-9.\-]+").unwrap();
}

/// Parses a formatted price such as `"$1,299.99"` by dropping every
/// character other than digits, `.` and `-`. Empty or unparseable
/// remainders are `0.0`; this never fails.
pub fn parse_cost_text(raw: &str) -> f64 {
    let stripped = NON_NUMERIC.replace_all(raw, "");
    if stripped.is_empty() {
        return 0.0;
    }

    match stripped.parse::<f64>() {
        Ok(value) if !value.is_nan() => value,
        _ => 0.0,
    }
}

/// Two-decimal rendering of an amount. Negative zero renders as `0.00`.
pub fn format_amount(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.2}", value)
}

pub fn format_price(value: f64) -> String {
    format!("${}", format_amount(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_currency_formatting() {
        assert_eq!(parse_cost_text("$5.00"), 5.0);
        assert_eq!(parse_cost_text("$1,299.99"), 1299.99);
        assert_eq!(parse_cost_text(" 12 USD"), 12.0);
    }

    #[test]
    fn test_minus_sign_survives_stripping() {
        assert_eq!(parse_cost_text("-$3.25"), -3.25);
    }

    #[test]
    fn test_unparseable_is_zero() {
        assert_eq!(parse_cost_text("abc"), 0.0);
        assert_eq!(parse_cost_text(""), 0.0);
        assert_eq!(parse_cost_text("1.2.3"), 0.0);
        assert_eq!(parse_cost_text("5-"), 0.0);
        assert_eq!(parse_cost_text("."), 0.0);
    }

    #[test]
    fn test_exponent_letters_are_stripped() {
        assert_eq!(parse_cost_text("1e5"), 15.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(13.5), "13.50");
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(-0.0), "0.00");
        assert_eq!(format_amount(-2.0), "-2.00");
        assert_eq!(format_price(10.0), "$10.00");
    }
}
