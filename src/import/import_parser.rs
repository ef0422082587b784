//! Spreadsheet parser turning pasted rows into candidate clients and posts.
//
// Layout: after the leading title rows, each row is
//   [0] row marker, [1] client name, [2] pack name, [3] pack contents, [4..] schedule cells
// Clients are deduplicated within a single parse by exact name only; matching
// against stored clients happens in `crate::reconcile`.

use crate::config::ImportConfig;
use crate::import::import_dates::extract_day_month;
use crate::import::import_splitter::split_columns;
use crate::models::{Client, Platform, Post, PostStatus, CLIENT_PALETTE};
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use log::debug;
use std::collections::HashMap;

/// Rows shorter than this carry no client/pack information
pub const MIN_COLUMNS: usize = 4;

/// First column holding schedule cells
pub const FIRST_DATE_COLUMN: usize = 4;

/// Marks a finished slot; the next dated cell in the row is imported as published
pub const DONE_TOKEN: &str = "x";

/// Cells that explicitly mean "no post here"
pub const SENTINEL_TOKENS: [&str; 3] = ["x", "?", "paused"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Leading non-data rows to drop (after empty lines are removed)
    pub header_rows: usize,
    pub default_platforms: Vec<Platform>,
    pub default_post_platform: Platform,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::from(&ImportConfig::default())
    }
}

impl From<&ImportConfig> for ParserOptions {
    fn from(config: &ImportConfig) -> Self {
        Self {
            header_rows: config.header_rows,
            default_platforms: config.default_platforms.clone(),
            default_post_platform: config.default_post_platform,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    pub clients: Vec<Client>,
    pub posts: Vec<Post>,
}

pub struct TabularParser {
    options: ParserOptions,
    now: Option<DateTime<Local>>,
}

impl TabularParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options, now: None }
    }

    /// Pin the clock used for `createdAt` stamps and for the import year
    pub fn with_now(mut self, now: DateTime<Local>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse raw pasted text. Unusable rows and cells are skipped, never reported.
    pub fn parse(&self, raw: &str) -> ParseResult {
        let now = self.now.unwrap_or_else(Local::now);
        let stamp = now.with_timezone(&Utc);
        let year = now.year();

        let mut result = ParseResult::default();
        let mut client_index: HashMap<String, usize> = HashMap::new();

        let data_rows = raw
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .skip(self.options.header_rows);

        for (row, line) in data_rows {
            let columns = split_columns(line);
            if columns.len() < MIN_COLUMNS {
                debug!("Skipping row {}: only {} column(s)", row, columns.len());
                continue;
            }

            let client_name = columns[1].trim();
            let pack_name = columns[2].trim();
            let pack_contents = columns[3].trim();

            if client_name.is_empty() || client_name.to_lowercase().contains("column") {
                debug!("Skipping row {}: no usable client name", row);
                continue;
            }

            let idx = match client_index.get(client_name) {
                Some(idx) => *idx,
                None => {
                    let color = CLIENT_PALETTE[result.clients.len() % CLIENT_PALETTE.len()];
                    let client = Client::new(
                        client_name,
                        color,
                        self.options.default_platforms.clone(),
                        stamp,
                    );
                    debug!("Created client '{}' ({})", client.name, client.id);
                    result.clients.push(client);
                    client_index.insert(client_name.to_string(), result.clients.len() - 1);
                    result.clients.len() - 1
                }
            };
            let client_id = result.clients[idx].id.clone();

            let content = format!(
                "{} - {}",
                if pack_name.is_empty() { "Post" } else { pack_name },
                if pack_contents.is_empty() { "Scheduled post" } else { pack_contents }
            );

            let mut next_is_published = false;
            for (col, cell) in columns.iter().enumerate().skip(FIRST_DATE_COLUMN) {
                let token = cell.trim();
                if token.is_empty() {
                    continue;
                }
                if SENTINEL_TOKENS.contains(&token) {
                    if token == DONE_TOKEN {
                        next_is_published = true;
                    }
                    continue;
                }

                let Some(date) = extract_day_month(token, year) else {
                    debug!("Skipping cell {}:{} '{}': no valid day/month", row, col, token);
                    continue;
                };
                let Some(scheduled) = local_midnight(date) else {
                    debug!("Skipping cell {}:{}: local midnight does not exist on {}", row, col, date);
                    continue;
                };

                let status =
                    if next_is_published { PostStatus::Published } else { PostStatus::Scheduled };
                next_is_published = false;

                result.posts.push(Post::new(
                    client_id.clone(),
                    content.clone(),
                    scheduled,
                    self.options.default_post_platform,
                    status,
                    stamp,
                ));
            }
        }

        debug!("Parsed {} client(s) and {} post(s)", result.clients.len(), result.posts.len());
        result
    }
}

impl Default for TabularParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

/// Parse with default options against the wall clock
pub fn parse(raw: &str) -> ParseResult {
    TabularParser::default().parse(raw)
}

fn local_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    Local.from_local_datetime(&naive).earliest().map(|dt| dt.with_timezone(&Utc))
}
