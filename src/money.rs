//! Conversions between sale amounts in cents and the ledger's currency text.
//!
//! Amounts are held as integer cents everywhere inside the application and
//! only rendered as `$`-formatted text (`$1,234.50`) at the presentation
//! boundary: the HTML table and the serialization endpoints.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::Error;

/// A sale amount in cents.
pub type Cents = i64;

/// Format `cents` as currency text with a dollar sign, thousands separators,
/// and exactly two decimal places, e.g. `123450` becomes `"$1,234.50"`.
pub fn format_amount(cents: Cents) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let dollars = cents as f64 / 100.0;

    let mut formatted_string = if dollars < 0.0 {
        negative_fmt.fmt_string(dollars.abs())
    } else if dollars > 0.0 {
        positive_fmt.fmt_string(dollars)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

/// Parse a numeric or currency-formatted string into cents.
///
/// Every character that is not an ASCII digit or a decimal point is stripped
/// before parsing, so `"$1,234.50"`, `"1,234.50"` and `"1234.5"` all yield
/// `123450`. The remainder is rounded to the nearest cent.
///
/// # Errors
/// Returns [Error::InvalidAmount] if nothing numeric remains after stripping,
/// or if the remainder is not a valid decimal number.
pub fn parse_amount(input: &str) -> Result<Cents, Error> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return Err(Error::InvalidAmount(input.to_owned()));
    }

    let dollars: f64 = cleaned
        .parse()
        .map_err(|_| Error::InvalidAmount(input.to_owned()))?;

    Ok((dollars * 100.0).round() as Cents)
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{format_amount, parse_amount};

    #[test]
    fn formats_with_thousands_separator_and_two_decimals() {
        assert_eq!(format_amount(123450), "$1,234.50");
    }

    #[test]
    fn formats_trailing_zero() {
        assert_eq!(format_amount(1230), "$12.30");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_amount(0), "$0.00");
    }

    #[test]
    fn formats_negative_amount() {
        assert_eq!(format_amount(-123450), "-$1,234.50");
    }

    #[test]
    fn formats_large_amount() {
        assert_eq!(format_amount(123456789), "$1,234,567.89");
    }

    #[test]
    fn parses_bare_decimal() {
        assert_eq!(parse_amount("1234.5"), Ok(123450));
    }

    #[test]
    fn parses_formatted_currency_text() {
        assert_eq!(parse_amount("$1,234.50"), Ok(123450));
    }

    #[test]
    fn parses_whole_dollars() {
        assert_eq!(parse_amount("37"), Ok(3700));
    }

    #[test]
    fn bare_decimal_round_trips_through_ledger_text() {
        let cents = parse_amount("1234.5").unwrap();

        assert_eq!(format_amount(cents), "$1,234.50");
    }

    #[test]
    fn rejects_text_with_no_digits() {
        assert_eq!(
            parse_amount("so much money"),
            Err(Error::InvalidAmount("so much money".to_owned()))
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse_amount(""), Err(Error::InvalidAmount("".to_owned())));
    }

    #[test]
    fn rejects_multiple_decimal_points() {
        assert_eq!(
            parse_amount("12.34.56"),
            Err(Error::InvalidAmount("12.34.56".to_owned()))
        );
    }
}
