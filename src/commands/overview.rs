use super::{format_post_line, Session};
use crate::planner::Planner;
use crate::schedule::{posts_this_week, status_counts, upcoming_posts};
use crate::state::Storage;
use anyhow::Result;

pub fn print_overview<S: Storage>(planner: &Planner<S>, session: &Session) -> Result<()> {
    println!("{}", render_overview(planner, session.config.overview.upcoming_limit));
    Ok(())
}

pub fn render_overview<S: Storage>(planner: &Planner<S>, upcoming_limit: usize) -> String {
    let now = planner.now();
    let counts = status_counts(planner.posts());

    let mut out = String::from("Overview\n");
    out.push_str(&format!("  Clients:          {}\n", planner.clients().len()));
    out.push_str(&format!("  Posts:            {}\n", planner.posts().len()));
    out.push_str(&format!("  This week:        {}\n", posts_this_week(planner.posts(), now).len()));
    out.push_str(&format!(
        "  Draft / Scheduled / Published: {} / {} / {}\n",
        counts.draft, counts.scheduled, counts.published
    ));

    let upcoming = upcoming_posts(planner.posts(), now, upcoming_limit);
    if upcoming.is_empty() {
        out.push_str("\nNo upcoming posts");
    } else {
        out.push_str("\nUpcoming:");
        for post in upcoming {
            out.push_str(&format!("\n  {}", format_post_line(post, planner.clients())));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ParserOptions;
    use crate::state::MemoryStorage;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_overview_after_import() -> Result<()> {
        let mut planner = Planner::open(MemoryStorage::new(), ParserOptions::default())?
            .with_fixed_clock(Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap());
        planner
            .import_text("t\nh\nh\n1,Acme,Pack,8 posts,01/03,x,15/03\n2,Beta,Reels,4,12/03,20/03")
            .map_err(anyhow::Error::from)?;

        let text = render_overview(&planner, 5);
        assert!(text.contains("Clients:          2"));
        assert!(text.contains("Posts:            4"));
        // week of Sunday 9 March: 12/03 and 15/03
        assert!(text.contains("This week:        2"));
        assert!(text.contains("Draft / Scheduled / Published: 0 / 3 / 1"));
        assert_eq!(text.matches("\n  2025-03-").count(), 3);
        Ok(())
    }

    #[test]
    fn test_overview_empty() -> Result<()> {
        let planner = Planner::open(MemoryStorage::new(), ParserOptions::default())?;
        let text = render_overview(&planner, 5);
        assert!(text.contains("Posts:            0"));
        assert!(text.ends_with("No upcoming posts"));
        Ok(())
    }
}
