use super::{format_post_line, Session};
use crate::cli::PostActions;
use crate::models::{Client, Platform, Post, PostChanges, PostStatus};
use crate::planner::{NewPost, Planner};
use crate::schedule::{
    client_color, find_client_by_name, month_grid, posts_in_month, posts_on_day,
    posts_this_week, shift_month, upcoming_posts, week_bounds,
};
use crate::state::Storage;
use crate::validation::parse_local_schedule;
use anyhow::{anyhow, Result};
use chrono::{Datelike, Local, NaiveDate};

pub fn handle_posts_command<S: Storage>(
    planner: &mut Planner<S>,
    action: PostActions,
    session: &Session,
) -> Result<()> {
    match action {
        PostActions::List { client, status } => {
            let posts = filtered_posts(planner.posts(), client.as_deref(), status);
            print_posts("Posts:", &posts, planner);
            Ok(())
        }
        PostActions::Add { client_id, content, date, time, platform, status, media_url } => {
            let scheduled_date = parse_local_schedule(&date, &time)?;
            let client_id = resolve_client_id(planner.clients(), &client_id);
            let post = planner.add_post(NewPost {
                client_id,
                content,
                scheduled_date,
                platform,
                status,
                media_url,
            })?;
            println!("Post created: {}", format_post_line(&post, planner.clients()));
            Ok(())
        }
        PostActions::Edit { id, content, date, time, platform, status, media_url } => {
            let current =
                planner.post(&id).ok_or_else(|| anyhow!("Post '{}' not found", id))?.clone();
            let changes =
                edit_changes(&current, content, date, time.as_deref(), platform, status, media_url)?;
            if changes == PostChanges::default() {
                return Err(anyhow!("Nothing to change. Pass at least one field to edit"));
            }
            let post = planner.update_post(&id, &changes)?;
            println!("Post updated: {}", format_post_line(&post, planner.clients()));
            Ok(())
        }
        PostActions::Status { id, status } => {
            let post = planner.set_post_status(&id, status)?;
            println!("Post {} is now {}", post.id, post.status);
            Ok(())
        }
        PostActions::Delete { id } => {
            planner.delete_post(&id)?;
            println!("Post {} deleted", id);
            Ok(())
        }
        PostActions::Upcoming { limit } => {
            let limit = limit.unwrap_or(session.config.overview.upcoming_limit);
            let posts = upcoming_posts(planner.posts(), planner.now(), limit);
            print_posts("Upcoming posts:", &posts, planner);
            Ok(())
        }
        PostActions::Day { date } => {
            let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|_| anyhow!("Invalid date format: '{}'. Expected YYYY-MM-DD", date))?;
            let mut posts = posts_on_day(planner.posts(), day);
            posts.sort_by_key(|p| p.scheduled_date);
            print_posts(&format!("Posts on {}:", day), &posts, planner);
            Ok(())
        }
        PostActions::Week => {
            let now = planner.now();
            let (start, end) = week_bounds(now.date_naive());
            let mut posts = posts_this_week(planner.posts(), now);
            posts.sort_by_key(|p| p.scheduled_date);
            print_posts(&format!("Posts for {} to {}:", start, end), &posts, planner);
            Ok(())
        }
        PostActions::Month { month } => {
            let anchor = resolve_month(month.as_deref(), planner.now().date_naive())?;
            println!("{}", render_month(planner.posts(), planner.clients(), anchor));
            Ok(())
        }
    }
}

/// First day of the month named by `arg`, relative to `today` for "next"/"prev"
fn resolve_month(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let shifted = |months: i32| {
        shift_month(today, months).ok_or_else(|| anyhow!("Month out of range"))
    };
    match arg.map(|a| a.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("this") => shifted(0),
        Some("next") => shifted(1),
        Some("prev") | Some("previous") => shifted(-1),
        Some(value) => NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
            .map_err(|_| anyhow!("Invalid month: '{}'. Expected YYYY-MM, next or prev", value)),
    }
}

/// Sunday-start month grid marking days with posts, followed by the month's posts
/// prefixed with their client colour
fn render_month(posts: &[Post], clients: &[Client], anchor: NaiveDate) -> String {
    let mut in_month = posts_in_month(posts, anchor);
    in_month.sort_by_key(|p| p.scheduled_date);

    let mut out = format!("{}\n Su  Mo  Tu  We  Th  Fr  Sa", anchor.format("%B %Y"));
    for (i, day) in month_grid(anchor).into_iter().enumerate() {
        if i % 7 == 0 {
            out.push('\n');
        }
        if day.month() != anchor.month() {
            out.push_str("  . ");
            continue;
        }
        let marker = if in_month.iter().any(|p| p.scheduled_local_date() == day) { '*' } else { ' ' };
        out.push_str(&format!("{:>3}{}", day.day(), marker));
    }

    if in_month.is_empty() {
        out.push_str("\n\nNo posts this month");
    } else {
        out.push('\n');
        for post in in_month {
            out.push_str(&format!(
                "\n  {}  {}",
                client_color(clients, &post.client_id),
                format_post_line(post, clients)
            ));
        }
    }
    out
}

/// Accept a client name in place of its id
fn resolve_client_id(clients: &[Client], id_or_name: &str) -> String {
    if clients.iter().any(|c| c.id == id_or_name) {
        return id_or_name.to_string();
    }
    find_client_by_name(clients, id_or_name)
        .map(|c| c.id.clone())
        .unwrap_or_else(|| id_or_name.to_string())
}

/// Posts matching the optional filters, ordered by scheduled date
pub fn filtered_posts<'a>(
    posts: &'a [Post],
    client_id: Option<&str>,
    status: Option<PostStatus>,
) -> Vec<&'a Post> {
    let mut matching: Vec<&Post> = posts
        .iter()
        .filter(|p| client_id.map_or(true, |id| p.client_id == id))
        .filter(|p| status.map_or(true, |s| p.status == s))
        .collect();
    matching.sort_by_key(|p| p.scheduled_date);
    matching
}

fn edit_changes(
    current: &Post,
    content: Option<String>,
    date: Option<String>,
    time: Option<&str>,
    platform: Option<Platform>,
    status: Option<PostStatus>,
    media_url: Option<String>,
) -> Result<PostChanges> {
    let mut changes = PostChanges::new();
    if let Some(content) = content {
        changes = changes.content(content);
    }
    if let Some(date) = date {
        // keep the existing time of day unless a new one is given
        let existing_time = current.scheduled_date.with_timezone(&Local).format("%H:%M").to_string();
        let when = parse_local_schedule(&date, time.unwrap_or(&existing_time))?;
        changes = changes.scheduled_date(when);
    }
    if let Some(platform) = platform {
        changes = changes.platform(platform);
    }
    if let Some(status) = status {
        changes = changes.status(status);
    }
    if let Some(media_url) = media_url {
        changes = changes.media_url((!media_url.is_empty()).then_some(media_url));
    }
    Ok(changes)
}

fn print_posts<S: Storage>(title: &str, posts: &[&Post], planner: &Planner<S>) {
    if posts.is_empty() {
        println!("No posts found");
        return;
    }
    println!("{}", title);
    for post in posts {
        println!("  {}", format_post_line(post, planner.clients()));
    }
}
