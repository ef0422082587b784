//! Field checks for records entered through the editor commands.
//
// Only presence and basic shape are checked. The import path does not use
// these; it applies the parser's own row rules.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex colour pattern is valid"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern is valid"));
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,2}:[0-9]{2}$").expect("time pattern is valid"));

/// Validate colour has format #RGB or #RRGGBB
pub fn validate_hex_color(color: &str) -> bool {
    HEX_COLOR_RE.is_match(color)
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_client_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(anyhow!("Client name cannot be empty"));
    }
    Ok(())
}

pub fn validate_post_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(anyhow!("Post content cannot be empty"));
    }
    if content.len() > 5000 {
        warn!("Post content is very long: {} characters", content.len());
    }
    Ok(())
}

/// Validate date string has format YYYY-MM-DD
pub fn validate_date_format(date: &str) -> bool {
    DATE_RE.is_match(date) && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

/// Validate time string has format HH:MM
pub fn validate_time_format(time: &str) -> bool {
    TIME_RE.is_match(time) && NaiveTime::parse_from_str(time, "%H:%M").is_ok()
}

/// Resolve a local `YYYY-MM-DD` + `HH:MM` pair into a UTC timestamp
pub fn parse_local_schedule(date: &str, time: &str) -> Result<DateTime<Utc>> {
    if !validate_date_format(date) {
        return Err(anyhow!("Invalid date format: '{}'. Expected YYYY-MM-DD", date));
    }
    if !validate_time_format(time) {
        return Err(anyhow!("Invalid time format: '{}'. Expected HH:MM", time));
    }

    let naive = NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow!("Invalid date/time '{} {}': {}", date, time, e))?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("Invalid or ambiguous local time: {} {}", date, time))?;
    Ok(local.with_timezone(&Utc))
}
