use anyhow::Result;
use chrono::{Local, TimeZone};
use postdeck::planner::NewClient;
use postdeck::{FileStorage, ImportError, ParserOptions, Planner, PostStatus};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

const SHEET: &str = "Content plan\nMarch\nNo,Client,Pack,Posts\n\
                     1,Acme,Pack,8 posts,01/03,x,15/03\n\
                     2,Beta,Reels,4,02/03\n";

fn open(dir: &std::path::Path) -> Result<Planner<FileStorage>> {
    Ok(Planner::open(FileStorage::new(dir)?, ParserOptions::default())?
        .with_fixed_clock(Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()))
}

#[test]
fn integration_import_survives_reopen() -> Result<()> {
    let temp_dir = tempdir()?;
    {
        let mut planner = open(temp_dir.path())?;
        planner.import_text(SHEET)?;
    }

    let planner = open(temp_dir.path())?;
    let names: Vec<&str> = planner.clients().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Acme", "Beta"]);
    assert_eq!(planner.posts().len(), 3);
    assert_eq!(
        planner.posts().iter().filter(|p| p.status == PostStatus::Published).count(),
        1
    );
    Ok(())
}

#[test]
fn integration_stored_json_uses_camel_case_keys() -> Result<()> {
    let temp_dir = tempdir()?;
    let mut planner = open(temp_dir.path())?;
    planner.import_text(SHEET)?;

    let posts: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("sm-posts.json"))?)?;
    let first = &posts[0];
    for key in ["id", "clientId", "content", "scheduledDate", "platform", "status", "createdAt", "updatedAt"] {
        assert!(first.get(key).is_some(), "missing key {}", key);
    }
    assert_eq!(first["status"], "scheduled");
    assert_eq!(first["platform"], "Instagram");

    let clients: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("sm-clients.json"))?)?;
    assert!(clients[0].get("createdAt").is_some());
    assert_eq!(clients[0]["color"], "#6366f1");
    Ok(())
}

#[test]
fn integration_case_insensitive_merge_against_saved_clients() -> Result<()> {
    let temp_dir = tempdir()?;
    let mut planner = open(temp_dir.path())?;
    let acme = planner.add_client(NewClient { name: "acme".to_string(), ..Default::default() })?;

    let merged = planner.import_text(SHEET)?;
    assert_eq!(merged.added_clients, 1);
    assert_eq!(merged.skipped_clients, 1);

    let reopened = open(temp_dir.path())?;
    assert_eq!(reopened.clients().len(), 2);
    assert_eq!(reopened.posts_for_client(&acme.id).len(), 2);
    Ok(())
}

#[test]
fn integration_delete_client_cascades_on_disk() -> Result<()> {
    let temp_dir = tempdir()?;
    let mut planner = open(temp_dir.path())?;
    planner.import_text(SHEET)?;
    let acme_id = planner.clients()[0].id.clone();

    assert_eq!(planner.delete_client(&acme_id)?, 2);

    let reopened = open(temp_dir.path())?;
    assert_eq!(reopened.clients().len(), 1);
    assert_eq!(reopened.posts().len(), 1);
    assert!(reopened.posts().iter().all(|p| p.client_id != acme_id));
    Ok(())
}

#[test]
fn integration_oversized_import_leaves_store_loadable() -> Result<()> {
    let temp_dir = tempdir()?;
    let mut planner = open(temp_dir.path())?;
    planner.import_text(SHEET)?;

    let cells = vec!["01/03"; 10_001].join(",");
    let oversized = format!("t\nh\nh\n1,Gamma,Pack,Contents,{}", cells);
    assert!(matches!(planner.import_text(&oversized), Err(ImportError::Failed(_))));
    assert_eq!(planner.posts().len(), 3);

    let reopened = open(temp_dir.path())?;
    assert_eq!(reopened.clients().len(), 2);
    assert_eq!(reopened.posts().len(), 3);
    Ok(())
}
