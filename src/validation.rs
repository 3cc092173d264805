use chrono::{Datelike, NaiveDate};
use std::borrow::Cow;
use validator::ValidationError;

use crate::forms::Choice;

/// Accepted date spellings, tried in order.
pub const DATE_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d",  // 2015-03-01
    "%m/%d/%Y",  // 03/01/2015
    "%m/%d/%y",  // 03/01/15
    "%b %d %Y",  // Mar 01 2015
    "%b %d, %Y", // Mar 01, 2015
    "%d %b %Y",  // 01 Mar 2015
    "%d %b, %Y", // 01 Mar, 2015
    "%B %d %Y",  // March 01 2015
    "%B %d, %Y", // March 01, 2015
    "%d %B %Y",  // 01 March 2015
    "%d %B, %Y", // 01 March, 2015
];

/// Format used when a date is shown back to the user.
pub const DATE_DISPLAY_FORMAT: &str = "%m/%d/%Y";

pub const MAX_KEY_LEN: u64 = 64;

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn required_error() -> ValidationError {
    error("required", "This field is required.")
}

/// Trims the raw value; `None` for missing or blank input.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

pub fn clean_text(raw: Option<&str>, required: bool) -> Result<Option<String>, ValidationError> {
    match present(raw) {
        Some(s) => Ok(Some(s.to_string())),
        None if required => Err(required_error()),
        None => Ok(None),
    }
}

pub fn clean_float(raw: Option<&str>, required: bool) -> Result<Option<f64>, ValidationError> {
    let Some(s) = present(raw) else {
        return if required { Err(required_error()) } else { Ok(None) };
    };
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(error("invalid", "Enter a number.")),
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS.iter().find_map(|fmt| {
        let date = NaiveDate::parse_from_str(s, fmt).ok()?;
        if fmt.contains("%Y") {
            // %Y also matches short years ("15" -> 0015); the year must be
            // written with exactly four digits so %y gets its turn.
            let year = format!("{:04}", date.year());
            (year.len() == 4 && digit_runs(s).any(|run| run == year)).then_some(date)
        } else if date.year() == 2069 {
            // Two-digit years pivot at 69 -> 1969, not 2069.
            date.with_year(1969)
        } else {
            Some(date)
        }
    })
}

fn digit_runs(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_ascii_digit()).filter(|run| !run.is_empty())
}

pub fn clean_date(raw: Option<&str>, required: bool) -> Result<Option<NaiveDate>, ValidationError> {
    let Some(s) = present(raw) else {
        return if required { Err(required_error()) } else { Ok(None) };
    };
    parse_date(s)
        .map(Some)
        .ok_or_else(|| error("invalid", "Enter a valid date."))
}

pub fn clean_choice(
    raw: Option<&str>,
    required: bool,
    choices: &[Choice],
) -> Result<Option<String>, ValidationError> {
    let Some(s) = present(raw) else {
        return if required { Err(required_error()) } else { Ok(None) };
    };
    if choices.iter().any(|c| c.value == s) {
        Ok(Some(s.to_string()))
    } else {
        Err(error(
            "invalid_choice",
            format!("Select a valid choice. {s} is not one of the available choices."),
        ))
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_DISPLAY_FORMAT).to_string()
}

pub fn validate_key(key: &str) -> Result<(), ValidationError> {
    let trimmed = key.trim();
    if trimmed.is_empty() || trimmed.len() as u64 > MAX_KEY_LEN {
        return Err(ValidationError::new("key"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: ValidationError) -> String {
        err.message.map(|m| m.into_owned()).unwrap_or_default()
    }

    #[test]
    fn text_is_trimmed_and_required() {
        assert_eq!(clean_text(Some("  Lake  "), true).unwrap(), Some("Lake".into()));
        assert_eq!(message(clean_text(Some("   "), true).unwrap_err()), "This field is required.");
        assert_eq!(clean_text(None, false).unwrap(), None);
    }

    #[test]
    fn float_has_no_range_check() {
        assert_eq!(clean_float(Some("91"), true).unwrap(), Some(91.0));
        assert_eq!(clean_float(Some(" -181.5 "), true).unwrap(), Some(-181.5));
    }

    #[test]
    fn float_rejects_garbage_and_non_finite() {
        for raw in ["abc", "nan", "inf", "-inf", "1,5"] {
            let err = clean_float(Some(raw), true).unwrap_err();
            assert_eq!(err.code, "invalid", "{raw}");
            assert_eq!(message(err), "Enter a number.");
        }
    }

    #[test]
    fn date_formats() {
        let expected = NaiveDate::from_ymd_opt(2015, 3, 1).unwrap();
        for raw in ["2015-03-01", "03/01/2015", "03/01/15", "Mar 01 2015", "March 1, 2015", "1 March 2015"] {
            assert_eq!(clean_date(Some(raw), true).unwrap(), Some(expected), "{raw}");
        }
    }

    #[test]
    fn two_digit_years_pivot_at_69() {
        assert_eq!(parse_date("03/01/15"), NaiveDate::from_ymd_opt(2015, 3, 1));
        assert_eq!(parse_date("03/01/68"), NaiveDate::from_ymd_opt(2068, 3, 1));
        assert_eq!(parse_date("03/01/69"), NaiveDate::from_ymd_opt(1969, 3, 1));
        assert_eq!(parse_date("03/01/99"), NaiveDate::from_ymd_opt(1999, 3, 1));
    }

    #[test]
    fn four_digit_years_below_1000() {
        assert_eq!(parse_date("0999-01-01"), NaiveDate::from_ymd_opt(999, 1, 1));
        assert_eq!(parse_date("01/02/0050"), NaiveDate::from_ymd_opt(50, 1, 2));
        assert_eq!(parse_date("10000-01-01"), None);
    }

    #[test]
    fn date_rejects_unparsable() {
        let err = clean_date(Some("not-a-date"), true).unwrap_err();
        assert_eq!(message(err), "Enter a valid date.");
        assert!(clean_date(Some("02/30/2015"), true).is_err());
    }

    #[test]
    fn choice_membership() {
        let choices = vec![Choice::new("0", "Black"), Choice::new("1", "White")];
        assert_eq!(clean_choice(Some("1"), true, &choices).unwrap(), Some("1".into()));

        let err = clean_choice(Some("7"), true, &choices).unwrap_err();
        assert_eq!(err.code, "invalid_choice");
        assert_eq!(
            message(err),
            "Select a valid choice. 7 is not one of the available choices."
        );
    }

    #[test]
    fn display_format() {
        let date = NaiveDate::from_ymd_opt(2015, 4, 1).unwrap();
        assert_eq!(format_date(date), "04/01/2015");
    }

    #[test]
    fn key_length() {
        assert!(validate_key("LANDSAT_7").is_ok());
        assert!(validate_key(" ").is_err());
        assert!(validate_key(&"x".repeat(65)).is_err());
    }
}
