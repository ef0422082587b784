//! Calendar and overview queries over the post collection.

use crate::models::{Client, Post, PostStatus, DEFAULT_CLIENT_COLOR};
use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub draft: usize,
    pub scheduled: usize,
    pub published: usize,
}

/// Posts due from now on, plus anything earlier today, soonest first
pub fn upcoming_posts(posts: &[Post], now: DateTime<Local>, limit: usize) -> Vec<&Post> {
    let today = now.date_naive();
    let cutoff = now.with_timezone(&Utc);
    let mut upcoming: Vec<&Post> = posts
        .iter()
        .filter(|p| p.scheduled_date >= cutoff || p.scheduled_local_date() == today)
        .collect();
    upcoming.sort_by_key(|p| p.scheduled_date);
    upcoming.truncate(limit);
    upcoming
}

/// First and last day of the Sunday-start week containing `day`
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = day - Duration::days(i64::from(day.weekday().num_days_from_sunday()));
    (start, start + Duration::days(6))
}

pub fn posts_this_week(posts: &[Post], now: DateTime<Local>) -> Vec<&Post> {
    let (start, end) = week_bounds(now.date_naive());
    posts
        .iter()
        .filter(|p| {
            let day = p.scheduled_local_date();
            day >= start && day <= end
        })
        .collect()
}

pub fn first_of_month(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.day0()))
}

/// First day of the month `months` away from the one containing `day`
pub fn shift_month(day: NaiveDate, months: i32) -> Option<NaiveDate> {
    let first = first_of_month(day);
    if months >= 0 {
        first.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        first.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

/// Calendar grid for the month containing `day`: whole Sunday-start weeks
/// covering the first to the last day of the month
pub fn month_grid(day: NaiveDate) -> Vec<NaiveDate> {
    let first = first_of_month(day);
    let Some(last) = shift_month(first, 1).and_then(|next| next.pred_opt()) else {
        return Vec::new();
    };
    let (start, _) = week_bounds(first);
    let (_, end) = week_bounds(last);
    start.iter_days().take_while(|d| *d <= end).collect()
}

pub fn posts_in_month(posts: &[Post], day: NaiveDate) -> Vec<&Post> {
    posts
        .iter()
        .filter(|p| {
            let scheduled = p.scheduled_local_date();
            scheduled.year() == day.year() && scheduled.month() == day.month()
        })
        .collect()
}

pub fn posts_on_day(posts: &[Post], day: NaiveDate) -> Vec<&Post> {
    posts.iter().filter(|p| p.scheduled_local_date() == day).collect()
}

pub fn status_counts(posts: &[Post]) -> StatusCounts {
    posts.iter().fold(StatusCounts::default(), |mut counts, post| {
        match post.status {
            PostStatus::Draft => counts.draft += 1,
            PostStatus::Scheduled => counts.scheduled += 1,
            PostStatus::Published => counts.published += 1,
        }
        counts
    })
}

pub fn client_color<'a>(clients: &'a [Client], client_id: &str) -> &'a str {
    clients
        .iter()
        .find(|c| c.id == client_id)
        .map(|c| c.color.as_str())
        .unwrap_or(DEFAULT_CLIENT_COLOR)
}

pub fn find_client_by_name<'a>(clients: &'a [Client], name: &str) -> Option<&'a Client> {
    let wanted = name.trim().to_lowercase();
    clients.iter().find(|c| c.name.to_lowercase() == wanted)
}
