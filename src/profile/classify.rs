//! Tests that tell what kind of value a piece of text is.
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Values that stand for a missing value.
pub const NULL_VALUES: &[&str] = &["NULL", "\\N"];

pub const BOOLEAN_VALUES: &[&str] = &[
    "0", "1", "Y", "N", "y", "n", "Yes", "No", "YES", "NO", "yes", "no", "T", "F", "True", "False",
    "TRUE", "FALSE", "true", "false",
];

/// Date formats in the order they are tried.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%d-%B-%Y",
    "%d-%b-%Y",
    "%m/%d/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d %B %y",
    "%B %d, %y",
    "%d %b %y",
    "%b %d, %y",
    "%d-%B-%y",
    "%d-%b-%y",
];

/// Time formats in the order they are tried.
pub const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M:%S %p"];

static DATETIME_FORMATS: OnceLock<Vec<String>> = OnceLock::new();

/// Every date format followed by a space and every time format, dates
/// varying slowest.
pub fn datetime_formats() -> &'static [String] {
    DATETIME_FORMATS.get_or_init(|| {
        DATE_FORMATS
            .iter()
            .flat_map(|date| TIME_FORMATS.iter().map(move |time| format!("{} {}", date, time)))
            .collect()
    })
}

pub fn is_null(value: &str) -> bool {
    NULL_VALUES.contains(&value)
}

pub fn is_boolean(value: &str) -> bool {
    BOOLEAN_VALUES.contains(&value)
}

/// Reads an integer. Values with leading zeros are codes, not numbers.
pub fn parse_integer(value: &str) -> Option<i128> {
    if value != "0" && value.starts_with('0') {
        return None;
    }

    if value.contains('.') {
        return None;
    }

    value.parse().ok()
}

/// Reads a decimal number. A leading zero is only allowed right before the
/// decimal point.
pub fn parse_decimal(value: &str) -> Option<f64> {
    let mut chars = value.chars();

    if let (Some('0'), Some(c)) = (chars.next(), chars.next()) {
        if c != '.' {
            return None;
        }
    }

    value.parse().ok()
}

/// Types whose values can be read from text with a format.
pub trait TemporalValue: PartialOrd + Clone {
    fn parse_from(value: &str, format: &str) -> Option<Self>;
}

impl TemporalValue for NaiveDate {
    fn parse_from(value: &str, format: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value, format).ok()
    }
}

impl TemporalValue for NaiveTime {
    fn parse_from(value: &str, format: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(value, format).ok()
    }
}

impl TemporalValue for NaiveDateTime {
    fn parse_from(value: &str, format: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(value, format).ok()
    }
}

/// Format specifiers that read a run of digits.
const NUMERIC_SPECIFIERS: &[char] = &['Y', 'y', 'm', 'd', 'H', 'I', 'M', 'S'];

fn numeric_specifiers(format: &str) -> Vec<char> {
    let mut specifiers = Vec::new();
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.next() {
                Some(s) if NUMERIC_SPECIFIERS.contains(&s) => specifiers.push(s),
                _ => {}
            }
        }
    }

    specifiers
}

/// Byte ranges of the runs of digits in `value`.
fn digit_runs(value: &str) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, c) in value.char_indices() {
        match (c.is_ascii_digit(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        runs.push((s, value.len()));
    }

    runs
}

/// Reads `value` with `format`. A `%Y` year must be written with exactly
/// four digits and a `%y` one with exactly two, `69` to `99` being years of
/// the 1900s and `00` to `68` years of the 2000s.
pub fn parse_temporal<T: TemporalValue>(value: &str, format: &str) -> Option<T> {
    let specifiers = numeric_specifiers(format);
    let runs = digit_runs(value);

    if specifiers.len() != runs.len() {
        return None;
    }

    let mut text = value.to_string();

    // right to left so the inserted centuries don't move the runs still to check
    for (specifier, &(start, end)) in specifiers.iter().zip(runs.iter()).rev() {
        match (*specifier, end - start) {
            ('Y', 4) => {}
            ('Y', _) => return None,
            ('y', 2) => {
                let century = if &value[start..end] >= "69" { "19" } else { "20" };

                text.insert_str(start, century);
            }
            ('y', _) => return None,
            _ => {}
        }
    }

    T::parse_from(&text, &format.replace("%y", "%Y"))
}

/// Formats a decimal statistic, always showing a fractional part and never
/// an exponent.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_boolean() {
        assert!(is_null("NULL"));
        assert!(is_null("\\N"));
        assert!(!is_null("null"));

        assert!(is_boolean("Yes"));
        assert!(is_boolean("0"));
        assert!(!is_boolean("yEs"));
        assert!(!is_boolean("2"));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("123"), Some(123));
        assert_eq!(parse_integer("-45"), Some(-45));
        assert_eq!(parse_integer("+6"), Some(6));
        assert_eq!(parse_integer("0"), Some(0));
        assert_eq!(parse_integer("01234"), None);
        assert_eq!(parse_integer("1.0"), None);
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(
            parse_integer("99999999999999999999"),
            Some(99_999_999_999_999_999_999)
        );
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("123.45"), Some(123.45));
        assert_eq!(parse_decimal("0.5"), Some(0.5));
        assert_eq!(parse_decimal("0"), Some(0.0));
        assert_eq!(parse_decimal("-3"), Some(-3.0));
        assert_eq!(parse_decimal("01234"), None);
        assert_eq!(parse_decimal("00.5"), None);
        assert_eq!(parse_decimal("x"), None);
    }

    #[test]
    fn test_dates() {
        assert_eq!(
            parse_temporal::<NaiveDate>("2017-07-16", "%Y-%m-%d"),
            NaiveDate::from_ymd_opt(2017, 7, 16)
        );
        assert_eq!(
            parse_temporal::<NaiveDate>("July 16, 2017", "%B %d, %Y"),
            NaiveDate::from_ymd_opt(2017, 7, 16)
        );
        assert_eq!(
            parse_temporal::<NaiveDate>("07/16/17", "%m/%d/%y"),
            NaiveDate::from_ymd_opt(2017, 7, 16)
        );
    }

    #[test]
    fn test_long_year_needs_four_digits() {
        assert_eq!(parse_temporal::<NaiveDate>("07/16/17", "%m/%d/%Y"), None);

        let first = DATE_FORMATS
            .iter()
            .find(|f| parse_temporal::<NaiveDate>("07/16/17", f).is_some());

        assert_eq!(first, Some(&"%m/%d/%y"));
    }

    #[test]
    fn test_short_year_needs_two_digits() {
        assert_eq!(parse_temporal::<NaiveDate>("7/4/7", "%m/%d/%y"), None);
        assert_eq!(parse_temporal::<NaiveDate>("12/25/9", "%m/%d/%y"), None);
        assert_eq!(parse_temporal::<NaiveDate>("12/25/109", "%m/%d/%y"), None);
        assert_eq!(
            parse_temporal::<NaiveDate>("7/4/07", "%m/%d/%y"),
            NaiveDate::from_ymd_opt(2007, 7, 4)
        );
    }

    #[test]
    fn test_short_year_century() {
        assert_eq!(
            parse_temporal::<NaiveDate>("01/01/69", "%m/%d/%y"),
            NaiveDate::from_ymd_opt(1969, 1, 1)
        );
        assert_eq!(
            parse_temporal::<NaiveDate>("31-12-68", "%d-%m-%y"),
            NaiveDate::from_ymd_opt(2068, 12, 31)
        );
        assert_eq!(
            parse_temporal::<NaiveDate>("16 July 99", "%d %B %y"),
            NaiveDate::from_ymd_opt(1999, 7, 16)
        );
        assert_eq!(
            parse_temporal::<NaiveDateTime>("01/01/69 13:05", "%m/%d/%y %H:%M"),
            NaiveDate::from_ymd_opt(1969, 1, 1).and_then(|d| d.and_hms_opt(13, 5, 0))
        );
    }

    #[test]
    fn test_datetime_formats() {
        let formats = datetime_formats();

        assert_eq!(formats.len(), DATE_FORMATS.len() * TIME_FORMATS.len());
        assert_eq!(formats[0], "%Y-%m-%d %H:%M");
        assert_eq!(formats[1], "%Y-%m-%d %H:%M:%S");
        assert_eq!(formats[4], "%m/%d/%Y %H:%M");

        let first = formats
            .iter()
            .find(|f| parse_temporal::<NaiveDateTime>("2017-07-16 15:00:00", f).is_some());

        assert_eq!(first.map(String::as_str), Some("%Y-%m-%d %H:%M:%S"));
    }

    #[test]
    fn test_times() {
        assert!(parse_temporal::<NaiveTime>("13:00", "%H:%M").is_some());
        assert!(parse_temporal::<NaiveTime>("1:30 PM", "%I:%M %p").is_some());
        assert!(parse_temporal::<NaiveTime>("25:00", "%H:%M").is_none());
        assert!(parse_temporal::<NaiveTime>("13:00", "%H:%M:%S").is_none());
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(123.0), "123.0");
        assert_eq!(format_decimal(123.45), "123.45");
        assert_eq!(format_decimal(123.225), "123.225");
        assert_eq!(format_decimal(-0.5), "-0.5");
    }

    #[test]
    fn test_format_decimal_without_exponent() {
        assert_eq!(format_decimal(1e21), "1000000000000000000000.0");
        assert_eq!(format_decimal(1.5e-7), "0.00000015");
        assert_eq!(format_decimal("2.5E3".parse().unwrap()), "2500.0");
    }
}
