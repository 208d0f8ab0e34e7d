//! Interpret the dates written in footnotes and party change tables.
//!
//! Footnotes say either `on 5 June 2007` (a full date) or `in 2007` (just a year).
//! Which forms are acceptable, and in which order they are tried, depends on where the
//! text came from, so each caller picks the function matching its source.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use crate::error::ExtractionError;
use crate::member::PartialDate;

static ON_DAY_MONTH_YEAR : Lazy<Regex> = Lazy::new(||Regex::new(r"\bon (\d{1,2} \p{L}+ \d{4})").unwrap());
static IN_YEAR : Lazy<Regex> = Lazy::new(||Regex::new(r"\bin (\d{4})\b").unwrap());

/// Formats seen in the date column of party change tables.
const CALENDAR_FORMATS : [&str;3] = ["%d %B %Y","%B %d, %Y","%Y-%m-%d"];

fn unparseable(text:&str) -> ExtractionError {
    ExtractionError::UnparseableDate(text.trim().to_string())
}

/// Parse a written out calendar date such as `5 June 2007`.
pub fn parse_calendar_date(text:&str) -> Option<NaiveDate> {
    let text = text.trim();
    CALENDAR_FORMATS.iter().find_map(|format|NaiveDate::parse_from_str(text,format).ok())
}

/// Find `on <day> <month> <year>` anywhere in the text.
/// It is an error for the phrase to be present but not a real date.
pub fn find_full_date(text:&str) -> Result<Option<PartialDate>,ExtractionError> {
    match ON_DAY_MONTH_YEAR.captures(text) {
        Some(cap) => parse_calendar_date(&cap[1]).map(|d|Some(PartialDate::Full(d))).ok_or_else(||unparseable(text)),
        None => Ok(None),
    }
}

/// Find `in <year>` anywhere in the text.
pub fn find_year(text:&str) -> Option<PartialDate> {
    IN_YEAR.captures(text).and_then(|cap|cap[1].parse().ok()).map(PartialDate::Year)
}

/// Try `on <date>` first, falling back to `in <year>`.
pub fn resolve(text:&str) -> Result<PartialDate,ExtractionError> {
    if let Some(date) = find_full_date(text)? { return Ok(date) }
    find_year(text).ok_or_else(||unparseable(text))
}

/// Only accept `in <year>`.
pub fn resolve_year_only(text:&str) -> Result<PartialDate,ExtractionError> {
    find_year(text).ok_or_else(||unparseable(text))
}

/// Interpret the date cell of a party change table. Anything longer than 4 characters is
/// a calendar date, otherwise a bare year.
pub fn resolve_table_date(text:&str) -> Result<PartialDate,ExtractionError> {
    let text = text.trim();
    if text.chars().count()>4 {
        parse_calendar_date(text).map(PartialDate::Full).ok_or_else(||unparseable(text))
    } else {
        text.parse::<i32>().map(PartialDate::Year).map_err(|_|unparseable(text))
    }
}
