use super::Session;
use crate::cli::ConfigActions;
use crate::config::Config;
use anyhow::Result;

pub fn handle_config_command(action: ConfigActions, session: &Session) -> Result<()> {
    match action {
        ConfigActions::Show => {
            println!("{}", describe(&session.config));
            Ok(())
        }
        ConfigActions::Path => {
            println!("{}", session.config_path.display());
            Ok(())
        }
    }
}

fn describe(config: &Config) -> String {
    let platforms: Vec<&str> = config.import.default_platforms.iter().map(|p| p.as_str()).collect();
    let data_dir = config
        .storage
        .data_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "(default)".to_string());

    let mut out = String::from("\nCurrent Configuration:\n");
    out.push_str("\nImport Settings:\n");
    out.push_str(&format!("  Header Rows: {}\n", config.import.header_rows));
    out.push_str(&format!("  Default Client Platforms: {}\n", platforms.join(", ")));
    out.push_str(&format!("  Default Post Platform: {}\n", config.import.default_post_platform));
    out.push_str("\nStorage Settings:\n");
    out.push_str(&format!("  Data Directory: {}\n", data_dir));
    out.push_str("\nOverview Settings:\n");
    out.push_str(&format!("  Upcoming Limit: {}", config.overview.upcoming_limit));
    out
}
