//! Cell to text formatting
//!
//! Formatting is pure and locale-independent: the same cell always renders to
//! the same bytes, whatever the host configuration.

use crate::model::Cell;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::fmt::Write;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a cell as its CSV field text.
///
/// - `Null` is always the empty string
/// - `Date` is `YYYY-MM-DD`
/// - `DateTime` is `YYYY-MM-DD HH:MM:SS`, or just the date when the time of
///   day is exactly midnight
/// - `Number` is plain decimal notation, never scientific
/// - `Text` is verbatim
pub fn format_cell(cell: &Cell) -> String {
    let mut out = String::new();
    format_cell_into(cell, &mut out);
    out
}

/// Same as [`format_cell`], appending into a caller-owned buffer.
pub fn format_cell_into(cell: &Cell, out: &mut String) {
    match cell {
        Cell::Null => {},
        Cell::Text(text) => out.push_str(text),
        Cell::Date(date) => push_date(*date, out),
        Cell::DateTime(value) => push_date_time(*value, out),
        Cell::Number(number) => out.push_str(&number.to_plain_string()),
    }
}

fn push_date(date: NaiveDate, out: &mut String) {
    // Writing into a String cannot fail
    let _ = write!(out, "{}", date.format(DATE_FORMAT));
}

fn push_date_time(value: NaiveDateTime, out: &mut String) {
    if is_midnight(&value) {
        push_date(value.date(), out);
    } else {
        let _ = write!(out, "{}", value.format(DATE_TIME_FORMAT));
    }
}

/// Sub-second precision is not part of the test; only h:m:s are printed.
fn is_midnight(value: &NaiveDateTime) -> bool {
    value.hour() == 0 && value.minute() == 0 && value.second() == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use bigdecimal::num_bigint::BigInt;
    use bigdecimal::BigDecimal;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn number(text: &str) -> Cell {
        Cell::Number(BigDecimal::from_str(text).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_null_is_empty() {
        assert_eq!(format_cell(&Cell::Null), "");
    }

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(format_cell(&Cell::from("  Mixed Case, \"quoted\"  ")), "  Mixed Case, \"quoted\"  ");
        assert_eq!(format_cell(&Cell::from("")), "");
    }

    #[test]
    fn test_date() {
        assert_eq!(format_cell(&Cell::Date(date(2016, 3, 9))), "2016-03-09");
        assert_eq!(format_cell(&Cell::Date(date(1960, 1, 1))), "1960-01-01");
        assert_eq!(format_cell(&Cell::Date(date(99, 12, 31))), "0099-12-31");
    }

    #[test]
    fn test_midnight_datetime_collapses_to_date() {
        let d = date(2020, 2, 29);
        let midnight = d.and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(format_cell(&Cell::DateTime(midnight)), format_cell(&Cell::Date(d)));
        assert_eq!(format_cell(&Cell::DateTime(midnight)), "2020-02-29");
    }

    #[test]
    fn test_datetime_with_time_of_day() {
        let d = date(2020, 2, 29);
        assert_eq!(
            format_cell(&Cell::DateTime(d.and_hms_opt(13, 5, 9).unwrap())),
            "2020-02-29 13:05:09"
        );
        assert_eq!(
            format_cell(&Cell::DateTime(d.and_hms_opt(0, 0, 1).unwrap())),
            "2020-02-29 00:00:01"
        );
        assert_eq!(
            format_cell(&Cell::DateTime(d.and_hms_opt(23, 59, 59).unwrap())),
            "2020-02-29 23:59:59"
        );
    }

    #[test]
    fn test_subsecond_midnight_still_collapses() {
        let value = date(2001, 9, 9).and_hms_milli_opt(0, 0, 0, 500).unwrap();
        assert_eq!(format_cell(&Cell::DateTime(value)), "2001-09-09");
    }

    #[test]
    fn test_number_plain_notation() {
        assert_eq!(format_cell(&number("0.0000001")), "0.0000001");
        assert_eq!(format_cell(&number("1E-7")), "0.0000001");
        assert_eq!(format_cell(&number("1.5e10")), "15000000000");
        assert_eq!(format_cell(&number("-42")), "-42");
        assert_eq!(format_cell(&number("3.14159")), "3.14159");
    }

    #[test]
    fn test_number_keeps_full_precision() {
        let digits = "12345678901234567890.123456789012345678901234567890";
        assert_eq!(format_cell(&number(digits)), digits);
    }

    #[test]
    fn test_number_from_f64() {
        assert_eq!(format_cell(&Cell::from_f64(1e-7)), "0.0000001");
        assert_eq!(format_cell(&Cell::from_f64(2.5)), "2.5");
        assert_eq!(format_cell(&Cell::from_f64(1e21)), "1000000000000000000000");
    }

    #[test]
    fn test_format_into_appends() {
        let mut buf = String::from("x=");
        format_cell_into(&number("10"), &mut buf);
        assert_eq!(buf, "x=10");
    }

    proptest! {
        #[test]
        fn prop_number_never_scientific(mantissa in any::<i64>(), scale in -40i64..40) {
            let value = BigDecimal::new(BigInt::from(mantissa), scale);
            let text = format_cell(&Cell::Number(value.clone()));

            prop_assert!(!text.contains('e') && !text.contains('E'));
            prop_assert!(!text.contains(','));
            prop_assert_eq!(BigDecimal::from_str(&text).unwrap(), value);
        }
    }
}
