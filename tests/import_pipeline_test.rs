use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use postdeck::{
    import_text, merge, Client, ImportError, Platform, Post, PostStatus, TabularParser,
};
use pretty_assertions::assert_eq;

fn parser() -> TabularParser {
    TabularParser::default().with_now(Local.with_ymd_and_hms(2025, 4, 2, 9, 0, 0).unwrap())
}

fn local_day(post: &Post) -> NaiveDate {
    post.scheduled_date.with_timezone(&Local).date_naive()
}

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

fn stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

#[test]
fn integration_reference_sheet() {
    let result = parser().parse("h1\nh2\nh3\n0,Acme,Pack,8 posts,01/03,x,15/03\n");

    assert_eq!(result.clients.len(), 1);
    let acme = &result.clients[0];
    assert_eq!(acme.name, "Acme");
    assert_eq!(acme.platforms, vec![Platform::Instagram, Platform::Facebook]);

    let summary: Vec<(NaiveDate, PostStatus)> =
        result.posts.iter().map(|p| (local_day(p), p.status)).collect();
    assert_eq!(
        summary,
        vec![(day(3, 1), PostStatus::Scheduled), (day(3, 15), PostStatus::Published)]
    );
    assert!(result.posts.iter().all(|p| p.client_id == acme.id));
    assert!(result.posts.iter().all(|p| p.content == "Pack - 8 posts"));
}

#[test]
fn integration_malformed_date_only_drops_that_cell() {
    let result = parser().parse("h1\nh2\nh3\n0,Acme,Pack,8 posts,32/13,05/03,07-03\n");
    let days: Vec<NaiveDate> = result.posts.iter().map(local_day).collect();
    assert_eq!(days, vec![day(3, 5), day(3, 7)]);
}

#[test]
fn integration_posts_land_on_local_midnight() {
    let result = parser().parse("h1\nh2\nh3\n0,Acme,Pack,8 posts,01/03\n");
    let local = result.posts[0].scheduled_date.with_timezone(&Local);
    assert_eq!(local.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-03-01 00:00:00");
}

#[test]
fn integration_merge_keeps_existing_client_and_remaps_posts() {
    let mut stored = Client::new("Acme", "#6366f1", vec![Platform::LinkedIn], stamp());
    stored.email = Some("team@acme.test".to_string());

    let imported = parser().parse("h1\nh2\nh3\n0,ACME,Pack,8 posts,01/03\n");
    let dropped_id = imported.clients[0].id.clone();

    let merged = merge(&[stored.clone()], &[], imported.clients, imported.posts);

    assert_eq!(merged.clients, vec![stored.clone()]);
    assert_eq!(merged.posts.len(), 1);
    assert_eq!(merged.posts[0].client_id, stored.id);
    assert_ne!(merged.posts[0].client_id, dropped_id);
    assert_eq!(merged.skipped_clients, 1);
    assert_eq!(merged.remapped_posts, 1);
}

#[test]
fn integration_reimport_adds_posts_again() {
    let sheet = "h1\nh2\nh3\n0,Acme,Pack,8 posts,01/03,15/03\n";
    let first = import_text(sheet, &[], &[], &parser()).unwrap();
    let second = import_text(sheet, &first.clients, &first.posts, &parser()).unwrap();

    assert_eq!(second.clients.len(), 1);
    assert_eq!(second.added_clients, 0);
    assert_eq!(second.posts.len(), 4);
    assert!(second.posts.iter().all(|p| p.client_id == first.clients[0].id));
}

#[test]
fn integration_import_errors() {
    assert_eq!(import_text(" \n\t", &[], &[], &parser()).unwrap_err(), ImportError::EmptyInput);
    assert_eq!(
        import_text("h1\nh2\nh3\nonly,three,cells\n", &[], &[], &parser()).unwrap_err(),
        ImportError::NoValidClients
    );
}

#[test]
fn integration_tab_separated_sheet() -> Result<()> {
    let sheet = "Plan\r\nApril\r\nNo\tClient\tPack\tPosts\r\n1\tBeta, Inc\tReels\t4\t02/04\tpaused\t?\t09/04\r\n";
    let result = parser().parse(sheet);

    assert_eq!(result.clients.len(), 1);
    assert_eq!(result.clients[0].name, "Beta, Inc");
    let days: Vec<NaiveDate> = result.posts.iter().map(local_day).collect();
    assert_eq!(days, vec![day(4, 2), day(4, 9)]);
    Ok(())
}
