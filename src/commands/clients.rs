use crate::cli::ClientActions;
use crate::models::{Client, ClientChanges, Platform};
use crate::planner::{NewClient, Planner};
use crate::state::Storage;
use anyhow::{anyhow, Result};

pub fn handle_clients_command<S: Storage>(
    planner: &mut Planner<S>,
    action: ClientActions,
) -> Result<()> {
    match action {
        ClientActions::List => {
            list_clients(planner);
            Ok(())
        }
        ClientActions::Add { name, email, color, platforms } => {
            let client = planner.add_client(NewClient { name, email, color, platforms })?;
            println!("Client created: {} ({})", client.name, client.id);
            Ok(())
        }
        ClientActions::Edit { id, name, email, clear_email, color, platforms } => {
            let changes = edit_changes(name, email, clear_email, color, platforms);
            if changes.is_empty() {
                return Err(anyhow!("Nothing to change. Pass at least one field to edit"));
            }
            let client = planner.update_client(&id, &changes)?;
            println!("Client updated: {} ({})", client.name, client.id);
            Ok(())
        }
        ClientActions::Delete { id } => {
            let removed = planner.delete_client(&id)?;
            println!("Client {} deleted along with {} post(s)", id, removed);
            Ok(())
        }
    }
}

fn list_clients<S: Storage>(planner: &Planner<S>) {
    if planner.clients().is_empty() {
        println!("No clients yet. Import a content plan or run 'clients add <name>'");
        return;
    }

    println!("Clients:");
    for client in planner.clients() {
        println!("  {}", client_line(client, planner.posts_for_client(&client.id).len()));
    }
}

fn client_line(client: &Client, post_count: usize) -> String {
    let platforms = if client.platforms.is_empty() {
        "-".to_string()
    } else {
        client.platforms.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
    };
    let mut line = format!(
        "{}  {}  [{}]  {} post(s)  ({})",
        client.color, client.name, platforms, post_count, client.id
    );
    if let Some(email) = &client.email {
        line.push_str(&format!("  <{}>", email));
    }
    line
}

fn edit_changes(
    name: Option<String>,
    email: Option<String>,
    clear_email: bool,
    color: Option<String>,
    platforms: Option<Vec<Platform>>,
) -> ClientChanges {
    let mut changes = ClientChanges::new();
    if let Some(name) = name {
        changes = changes.name(name);
    }
    if clear_email {
        changes = changes.email(None);
    } else if let Some(email) = email {
        changes = changes.email(Some(email));
    }
    if let Some(color) = color {
        changes = changes.color(color);
    }
    if let Some(platforms) = platforms {
        changes = changes.platforms(platforms);
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ParserOptions;
    use crate::state::MemoryStorage;

    fn planner() -> Planner<MemoryStorage> {
        Planner::open(MemoryStorage::new(), ParserOptions::default()).unwrap()
    }

    #[test]
    fn test_add_edit_delete_client() -> Result<()> {
        let mut planner = planner();
        handle_clients_command(
            &mut planner,
            ClientActions::Add {
                name: "Acme".to_string(),
                email: Some("hi@acme.test".to_string()),
                color: None,
                platforms: vec![Platform::LinkedIn],
            },
        )?;
        let id = planner.clients()[0].id.clone();

        handle_clients_command(
            &mut planner,
            ClientActions::Edit {
                id: id.clone(),
                name: Some("Acme Ltd".to_string()),
                email: None,
                clear_email: true,
                color: None,
                platforms: None,
            },
        )?;
        let client = planner.client(&id).unwrap();
        assert_eq!(client.name, "Acme Ltd");
        assert_eq!(client.email, None);
        assert_eq!(client.platforms, vec![Platform::LinkedIn]);

        handle_clients_command(&mut planner, ClientActions::Delete { id })?;
        assert!(planner.clients().is_empty());
        Ok(())
    }

    #[test]
    fn test_edit_without_fields_fails() {
        let mut planner = planner();
        let result = handle_clients_command(
            &mut planner,
            ClientActions::Edit {
                id: "client-1".to_string(),
                name: None,
                email: None,
                clear_email: false,
                color: None,
                platforms: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_client_line() {
        let mut client =
            Client::new("Acme", "#ec4899", vec![Platform::Instagram, Platform::TikTok], chrono::Utc::now());
        client.id = "client-1".to_string();
        assert_eq!(client_line(&client, 3), "#ec4899  Acme  [Instagram, TikTok]  3 post(s)  (client-1)");

        client.platforms.clear();
        client.email = Some("a@b.co".to_string());
        assert_eq!(client_line(&client, 0), "#ec4899  Acme  [-]  0 post(s)  (client-1)  <a@b.co>");
    }
}
