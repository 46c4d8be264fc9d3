//! The `Delivery-Date: <date>` directive embedded in sale notes.
//!
//! Warehouse staff read and edit these notes by hand, so the grammar stays
//! deliberately loose: the first `Delivery-Date:` followed by digits and
//! slashes wins, and a rewrite replaces everything up to the end of the line
//! holding the date, even when staff put the date on the line below.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use regex::{NoExpand, Regex};
use std::sync::OnceLock;

pub const DIRECTIVE_PREFIX: &str = "Delivery-Date";

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static EXTRACT_RE: OnceLock<Regex> = OnceLock::new();
static REWRITE_RE: OnceLock<Regex> = OnceLock::new();

fn extract_re() -> &'static Regex {
    EXTRACT_RE.get_or_init(|| Regex::new(r"Delivery-Date:\s*([0-9/]+)").unwrap())
}

fn rewrite_re() -> &'static Regex {
    REWRITE_RE.get_or_init(|| Regex::new(r"Delivery-Date[:\s]*[^\r\n]*").unwrap())
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Pull the delivery date out of a sale note.
///
/// Returns `None` when the note is absent or empty, when no directive is
/// present, or when the directive's value is not a real calendar date. The
/// result is always UTC midnight.
pub fn extract_delivery_date(note: Option<&str>) -> Option<DateTime<Utc>> {
    let note = note.filter(|n| !n.is_empty())?;
    let token = extract_re().captures(note)?.get(1)?.as_str();
    parse_directive_date(token)
}

/// Parse a `/`-separated date token.
///
/// Parts are read year/month/day. When only the last part is four digits
/// long the token is read month/day/year instead, which is the form
/// [`directive_line`] writes.
pub fn parse_directive_date(token: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = token.split('/').collect();
    let [first, second, third] = parts.as_slice() else {
        return None;
    };
    if first.is_empty() || second.is_empty() || third.is_empty() {
        return None;
    }

    let (year, month, day) = if third.len() == 4 && first.len() != 4 {
        (third, first, second)
    } else {
        (first, second, third)
    };

    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;
    midnight_utc(date)
}

pub(crate) fn midnight_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// `MM/DD/YYYY` in UTC.
pub fn format_directive_date(date: DateTime<Utc>) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// A complete directive, e.g. `Delivery-Date: 10/11/2024`.
pub fn directive_line(date: DateTime<Utc>) -> String {
    format!("{DIRECTIVE_PREFIX}: {}", format_directive_date(date))
}

/// Replace every directive in `note` (through the end of its line) with `line`.
pub fn replace_directives(note: &str, line: &str) -> String {
    rewrite_re().replace_all(note, NoExpand(line)).into_owned()
}

/// Put `line` on its own line ahead of the existing note text.
pub fn prepend_directive(note: &str, line: &str) -> String {
    format!("{line}\n{note}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
