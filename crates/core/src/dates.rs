//! Due-date extraction, lenient parsing and cutoff filtering.

use crate::PatternTable;
use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;

/// Canonical output format for due dates.
pub const DUE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Days counted per month of lookback.
const DAYS_PER_MONTH: i64 = 30;

/// Compute the earliest reportable due date: `today - 30 * months_back` days.
pub fn cutoff_date(today: NaiveDate, months_back: u32) -> NaiveDate {
    today - Duration::days(DAYS_PER_MONTH * i64::from(months_back))
}

/// Parse a loose numeric date, month first.
///
/// Non-digit noise around and between the three components is ignored.
/// When the first component cannot be a month but the second can, the
/// components are read day-first instead. A leading component that cannot
/// be a day (3-4 digits, or above 31) is read as a year: `2027-03-15`,
/// `45/03/27`. Two-digit years land within 50 years of `today`'s year.
///
/// Returns `None` for anything that is not a real calendar date.
pub fn parse_lenient(token: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = token
        .split(|c: char| !c.is_ascii_digit())
        .filter(|p| !p.is_empty())
        .collect();

    let [a, b, c] = parts.as_slice() else {
        return None;
    };

    let first: u32 = a.parse().ok()?;

    if a.len() >= 3 || first > 31 {
        let year = resolve_year(a, today)?;
        return NaiveDate::from_ymd_opt(year, b.parse().ok()?, c.parse().ok()?);
    }

    let second: u32 = b.parse().ok()?;
    let year = resolve_year(c, today)?;

    let (month, day) = if first > 12 && second <= 12 {
        (second, first)
    } else {
        (first, second)
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Interpret a year component.
fn resolve_year(digits: &str, today: NaiveDate) -> Option<i32> {
    if digits.len() > 4 {
        return None;
    }
    let year: i32 = digits.parse().ok()?;

    if digits.len() <= 2 {
        let current = today.year();
        let mut full = current - current % 100 + year;
        if full >= current + 50 {
            full -= 100;
        } else if full < current - 50 {
            full += 100;
        }
        return Some(full);
    }

    // Year zero has no calendar meaning here.
    (year > 0).then_some(year)
}

/// Earliest date in a `;`-separated due-date list.
///
/// Blank items are skipped. If any item fails to parse, or nothing is
/// left, the list has no earliest date.
pub fn earliest_due_date(due_dates: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parsed: Option<Vec<NaiveDate>> = due_dates
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| parse_lenient(d, today))
        .collect();

    parsed?.into_iter().min()
}

/// Finds date tokens in sanitized lines and keeps those on or after the cutoff.
#[derive(Debug, Clone)]
pub struct DateExtractor<'a> {
    pattern: &'a Regex,
    today: NaiveDate,
    cutoff: NaiveDate,
}

impl<'a> DateExtractor<'a> {
    pub fn new(table: &'a PatternTable, today: NaiveDate, months_back: u32) -> Self {
        Self {
            pattern: table.date(),
            today,
            cutoff: cutoff_date(today, months_back),
        }
    }

    /// The earliest date that will be kept.
    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    /// Formatted qualifying dates found in `line`, in encounter order.
    ///
    /// Tokens that do not parse are skipped.
    pub fn extract(&self, line: &str) -> Vec<String> {
        self.pattern
            .find_iter(line)
            .filter_map(|m| {
                let parsed = parse_lenient(m.as_str(), self.today);
                if parsed.is_none() {
                    log::debug!("Skipping unparsable date token {:?}", m.as_str());
                }
                parsed
            })
            .filter(|date| *date >= self.cutoff)
            .map(|date| date.format(DUE_DATE_FORMAT).to_string())
            .collect()
    }
}
