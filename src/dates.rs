//! Conversions between [time::Date] and the two text forms a transaction date
//! takes at the application's edges.
//!
//! HTML date inputs and query parameters carry `YYYY-MM-DD`; the ledger's
//! interchange form, emitted by the table and the serialization endpoints, is
//! `M/D/YYYY` with no leading zeros.

use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

const FORM_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Format `date` in the ledger's interchange form, `M/D/YYYY` with leading
/// zeros stripped from both the month and the day, e.g. `1/5/2023`.
pub fn format_ledger_date(date: Date) -> String {
    format!("{}/{}/{}", date.month() as u8, date.day(), date.year())
}

/// Parse a date in the ledger's `M/D/YYYY` interchange form.
///
/// Zero-padded months and days are accepted, so `01/05/2023` and `1/5/2023`
/// parse to the same date.
///
/// # Errors
/// Returns [Error::InvalidDate] if the input does not have three `/`-separated
/// numeric parts or does not name a real calendar date.
pub fn parse_ledger_date(input: &str) -> Result<Date, Error> {
    let invalid = || Error::InvalidDate(input.to_owned());

    let mut parts = input.split('/');
    let month: u8 = parts
        .next()
        .and_then(|part| part.parse().ok())
        .ok_or_else(invalid)?;
    let day: u8 = parts
        .next()
        .and_then(|part| part.parse().ok())
        .ok_or_else(invalid)?;
    let year: i32 = parts
        .next()
        .and_then(|part| part.parse().ok())
        .ok_or_else(invalid)?;

    if parts.next().is_some() {
        return Err(invalid());
    }

    let month = Month::try_from(month).map_err(|_| invalid())?;

    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}

/// Parse a date in the `YYYY-MM-DD` form used by HTML date inputs and query
/// parameters.
///
/// # Errors
/// Returns [Error::InvalidDate] if the input is not a valid calendar date in
/// that form.
pub fn parse_form_date(input: &str) -> Result<Date, Error> {
    Date::parse(input, FORM_DATE_FORMAT).map_err(|_| Error::InvalidDate(input.to_owned()))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::Error;

    use super::{format_ledger_date, parse_form_date, parse_ledger_date};

    #[test]
    fn strips_leading_zeros_when_formatting() {
        assert_eq!(format_ledger_date(date!(2023 - 01 - 05)), "1/5/2023");
    }

    #[test]
    fn keeps_two_digit_month_and_day() {
        assert_eq!(format_ledger_date(date!(2023 - 11 - 28)), "11/28/2023");
    }

    #[test]
    fn form_date_round_trips_through_ledger_text() {
        let date = parse_form_date("2023-01-05").unwrap();

        let ledger_text = format_ledger_date(date);
        assert_eq!(ledger_text, "1/5/2023");

        let parsed_back = parse_ledger_date(&ledger_text).unwrap();
        assert_eq!(parsed_back.to_string(), "2023-01-05");
    }

    #[test]
    fn parses_zero_padded_ledger_date() {
        assert_eq!(parse_ledger_date("01/05/2023"), Ok(date!(2023 - 01 - 05)));
    }

    #[test]
    fn rejects_ledger_date_with_missing_parts() {
        assert_eq!(
            parse_ledger_date("5/2023"),
            Err(Error::InvalidDate("5/2023".to_owned()))
        );
    }

    #[test]
    fn rejects_ledger_date_with_extra_parts() {
        assert_eq!(
            parse_ledger_date("1/5/2023/7"),
            Err(Error::InvalidDate("1/5/2023/7".to_owned()))
        );
    }

    #[test]
    fn rejects_impossible_calendar_date() {
        assert_eq!(
            parse_ledger_date("2/30/2023"),
            Err(Error::InvalidDate("2/30/2023".to_owned()))
        );
    }

    #[test]
    fn parses_form_date() {
        assert_eq!(parse_form_date("2023-01-05"), Ok(date!(2023 - 01 - 05)));
    }

    #[test]
    fn rejects_form_date_in_ledger_form() {
        assert_eq!(
            parse_form_date("1/5/2023"),
            Err(Error::InvalidDate("1/5/2023".to_owned()))
        );
    }

    #[test]
    fn rejects_form_date_with_invalid_month() {
        assert_eq!(
            parse_form_date("2023-13-01"),
            Err(Error::InvalidDate("2023-13-01".to_owned()))
        );
    }
}
