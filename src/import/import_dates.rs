//! Day/month token scanning for schedule cells.
//
// Cells carry loose text such as "Mon 01/03", "15-3" or "1/3 (story)". Only
// the first day/month pair is used and the year always comes from the caller.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DAY_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2})[/-]([0-9]{1,2})").expect("day/month pattern is valid"));

/// Find the first `DD/MM` or `DD-MM` token in `cell` and resolve it in `year`.
///
/// Returns `None` when no token is present or the pair is not a real calendar
/// date (`31/04`, `32/13`, `00/05`).
pub fn extract_day_month(cell: &str, year: i32) -> Option<NaiveDate> {
    let caps = DAY_MONTH_RE.captures(cell)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
