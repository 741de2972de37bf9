// --- File: crates/terminwahl_form/src/validate.rs ---
//! Submit-time checks of the booking form.

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Europe::Berlin;
use tracing::info;

use crate::error::FormError;
use crate::page::Page;

/// Applicants must be at least this many years old (by birth year).
pub const MIN_AGE_YEARS: i32 = 11;
/// Number of trailing VIN digits asked for.
pub const VIN_SUFFIX_LEN: usize = 6;

pub const BIRTHDAY_ALERT: &str =
    "\nÜberprüfen Sie bitte Ihr Geburtsdatum \n\nPlease check your date of birth";
pub const VIN_ALERT: &str =
    "\nBitte tragen Sie die letzten 6 Ziffern der Fahrzeugidentifikationsnummer ein.";

/// Today's date at the office.
pub fn today_in_office_tz() -> NaiveDate {
    Utc::now().with_timezone(&Berlin).date_naive()
}

pub fn not_empty(page: &Page, id: &str) -> Result<bool, FormError> {
    Ok(!page.registry().require(id)?.value.is_empty())
}

/// Integer prefix of `input` after leading whitespace, with optional sign.
/// `None` when no digit follows.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Rejects birth dates whose year lies within the last `MIN_AGE_YEARS` years.
///
/// Only the first four characters are read as the year. A value without a
/// leading number passes; the server checks the full date.
pub fn check_birthday(page: &mut Page, id: &str, today: NaiveDate) -> Result<bool, FormError> {
    let value = &page.registry().require(id)?.value;
    let year_part: String = value.chars().take(4).collect();
    let latest_year = i64::from(today.year() - MIN_AGE_YEARS);

    match parse_leading_int(&year_part) {
        Some(year) if year > latest_year => {
            info!("Birth year {} rejected (latest {})", year, latest_year);
            page.alert(BIRTHDAY_ALERT);
            Ok(false)
        }
        _ => Ok(true),
    }
}

/// True iff the value of `id` has exactly `length` characters; alerts otherwise.
pub fn check_input_length(page: &mut Page, id: &str, length: usize) -> Result<bool, FormError> {
    let actual = page.registry().require(id)?.value.chars().count();
    if actual == length {
        return Ok(true);
    }
    page.alert(VIN_ALERT);
    Ok(false)
}

/// Birthday of `geburtstag`, then the VIN suffix in `fin`. Stops at the first failure.
pub fn check_input(page: &mut Page, today: NaiveDate) -> Result<bool, FormError> {
    Ok(check_birthday(page, "geburtstag", today)?
        && check_input_length(page, "fin", VIN_SUFFIX_LEN)?)
}
