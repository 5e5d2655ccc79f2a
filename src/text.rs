//! Text formatting shared by every section builder: partial dates, date
//! ranges and hyperlink runs.

use std::fmt;

use chrono::NaiveDate;

use crate::blocks::Run;
use crate::error::{Error, Result};
use crate::style::Style;

/// Separator between the two ends of a date range.
pub const RANGE_SEPARATOR: &str = " \u{2013} ";

/// Label used for an open-ended range.
pub const PRESENT: &str = "Present";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// An ISO 8601 date with optional month (and an ignored, but validated, day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartialDate {
    pub year: i32,
    /// 1-based month.
    pub month: Option<u32>,
}

impl PartialDate {
    /// Parse `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub fn parse(value: &str) -> Result<Self> {
        let malformed = |reason| Error::DateFormat {
            value: value.to_string(),
            reason,
        };

        let mut parts = value.trim().split('-');
        let year = parts.next().unwrap_or_default();
        let month = parts.next();
        let day = parts.next();
        if parts.next().is_some() {
            return Err(malformed("too many components"));
        }

        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("year must be four digits"));
        }
        let year: i32 = year.parse().map_err(|_| malformed("invalid year"))?;

        let Some(month) = month else {
            return Ok(Self { year, month: None });
        };
        let month = parse_component(month).ok_or_else(|| malformed("invalid month"))?;
        if !(1..=12).contains(&month) {
            return Err(malformed("month out of range"));
        }

        if let Some(day) = day {
            let day = parse_component(day).ok_or_else(|| malformed("invalid day"))?;
            if NaiveDate::from_ymd_opt(year, month, day).is_none() {
                return Err(malformed("day out of range"));
            }
        }

        Ok(Self {
            year,
            month: Some(month),
        })
    }
}

fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(m) => write!(f, "{} {}", MONTHS[(m - 1) as usize], self.year),
            None => write!(f, "{}", self.year),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn is_present(value: &str) -> bool {
    value.eq_ignore_ascii_case(PRESENT)
}

/// Format a single date literal (`"2020-01"` becomes `"Jan 2020"`).
///
/// An empty string formats as an empty string.
pub fn format_date(value: &str) -> Result<String> {
    match non_empty(Some(value)) {
        None => Ok(String::new()),
        Some(v) if is_present(v) => Ok(PRESENT.to_string()),
        Some(v) => Ok(PartialDate::parse(v)?.to_string()),
    }
}

/// Format a start/end pair for display.
///
/// Missing dates are not errors: both missing gives `""`, a missing end (or
/// an end of `"present"`) gives an open range, and a missing start gives
/// `"Until {end}"`.
pub fn format_date_range(start: Option<&str>, end: Option<&str>) -> Result<String> {
    let start = non_empty(start);
    let end = non_empty(end);

    Ok(match (start, end) {
        (None, None) => String::new(),
        (Some(s), None) => format!("{}{RANGE_SEPARATOR}{PRESENT}", format_date(s)?),
        (Some(s), Some(e)) => format!("{}{RANGE_SEPARATOR}{}", format_date(s)?, format_date(e)?),
        (None, Some(e)) if is_present(e) => PRESENT.to_string(),
        (None, Some(e)) => format!("Until {}", format_date(e)?),
    })
}

/// Build a run that links `display` to `target`, colored with the style's
/// accent color.
pub fn hyperlink_run(display: &str, target: &str, style: &Style) -> Run {
    let mut run = Run::new(display, style.accent, style.body_font);
    run.link = Some(normalize_url(target));
    run
}

/// Give scheme-less web addresses an `https://` prefix.
pub fn normalize_url(target: &str) -> String {
    let target = target.trim();
    let has_scheme = target.contains("://")
        || ["mailto:", "tel:"]
            .iter()
            .any(|scheme| {
                target
                    .get(..scheme.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
            });
    if has_scheme {
        target.to_string()
    } else {
        format!("https://{target}")
    }
}

/// `mailto:` target for an email address.
pub fn mailto(email: &str) -> String {
    format!("mailto:{}", email.trim())
}

/// `tel:` target for a phone number, whitespace removed.
pub fn tel(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    format!("tel:{digits}")
}
