//! Merging freshly imported records into existing collections.
//
// Clients are matched by lowercase name and the first record holding a name wins
// outright (no field merging). Posts are always appended. A post whose client was
// dropped as a duplicate is pointed at the surviving client so no post is left
// referencing an id absent from the merged collection.

use crate::models::{Client, Post};
use log::{debug, info};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
    pub clients: Vec<Client>,
    pub posts: Vec<Post>,
    /// Imported clients appended to the collection
    pub added_clients: usize,
    /// Imported clients dropped because the name already existed
    pub skipped_clients: usize,
    pub added_posts: usize,
    /// Imported posts whose `client_id` was rewritten to a surviving client
    pub remapped_posts: usize,
}

pub fn merge(
    existing_clients: &[Client],
    existing_posts: &[Post],
    imported_clients: Vec<Client>,
    imported_posts: Vec<Post>,
) -> MergeResult {
    let mut ids_by_name: HashMap<String, String> = HashMap::new();
    for client in existing_clients {
        ids_by_name.entry(client.name.to_lowercase()).or_insert_with(|| client.id.clone());
    }

    let mut clients = existing_clients.to_vec();
    let mut replaced_ids: HashMap<String, String> = HashMap::new();
    let mut added_clients = 0;

    for client in imported_clients {
        let key = client.name.to_lowercase();
        match ids_by_name.get(&key) {
            Some(surviving_id) => {
                debug!("Skipping duplicate client '{}' (matches {})", client.name, surviving_id);
                replaced_ids.insert(client.id, surviving_id.clone());
            }
            None => {
                ids_by_name.insert(key, client.id.clone());
                clients.push(client);
                added_clients += 1;
            }
        }
    }

    let added_posts = imported_posts.len();
    let mut remapped_posts = 0;
    let mut posts = existing_posts.to_vec();
    posts.reserve(added_posts);
    for mut post in imported_posts {
        if let Some(surviving_id) = replaced_ids.get(&post.client_id) {
            post.client_id = surviving_id.clone();
            remapped_posts += 1;
        }
        posts.push(post);
    }

    let skipped_clients = replaced_ids.len();
    info!(
        "Merged import: {} new client(s), {} duplicate(s) skipped, {} post(s) added, {} re-linked",
        added_clients, skipped_clients, added_posts, remapped_posts
    );

    MergeResult { clients, posts, added_clients, skipped_clients, added_posts, remapped_posts }
}
