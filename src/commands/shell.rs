use super::{execute, import, Session};
use crate::cli::{Cli, Commands};
use crate::planner::Planner;
use crate::state::Storage;
use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser};
use log::{debug, error, info, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "postdeck> ";
const PASTE_PROMPT: &str = "... ";
const PASTE_END: &str = ".";

/// What the shell should do with one line of input
#[derive(Debug)]
enum ShellLine {
    Empty,
    Exit,
    Help,
    Command(Box<Cli>),
}

pub fn run_shell<S: Storage>(planner: &mut Planner<S>, session: &Session) -> Result<()> {
    info!("Starting postdeck shell");

    let mut rl = DefaultEditor::new()?;
    println!("Welcome to postdeck! Type 'help' for commands or 'exit' to leave.");

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match parse_line(&line) {
                    Ok(ShellLine::Empty) => {}
                    Ok(ShellLine::Exit) => break,
                    Ok(ShellLine::Help) => println!("{}", Cli::command().render_help()),
                    Ok(ShellLine::Command(cli)) => {
                        if let Err(err) = run_line(*cli, planner, session, &mut rl) {
                            error!("{:#}", err);
                        }
                    }
                    Err(err) => println!("{}", err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

fn run_line<S: Storage>(
    cli: Cli,
    planner: &mut Planner<S>,
    session: &Session,
    rl: &mut DefaultEditor,
) -> Result<()> {
    if cli.config.is_some() || cli.data_dir.is_some() {
        warn!("--config and --data-dir only apply when starting postdeck; ignoring");
    }

    match cli.command {
        // pasted sheet: read lines until a lone "."
        Some(Commands::Import { file: None, dry_run }) => {
            println!("Paste the sheet, then enter '{}' on its own line to finish.", PASTE_END);
            let raw = read_pasted(rl)?;
            let merged = import::import_raw(planner, &raw, dry_run)?;
            println!("{}", import::summary_line(&merged, dry_run));
            Ok(())
        }
        Some(command) => execute(command, planner, session),
        None => Ok(()),
    }
}

fn read_pasted(rl: &mut DefaultEditor) -> Result<String> {
    let mut lines = Vec::new();
    loop {
        match rl.readline(PASTE_PROMPT) {
            Ok(line) if line.trim() == PASTE_END => break,
            Ok(line) => lines.push(line),
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(anyhow!("Paste cancelled: {}", err)),
        }
    }
    debug!("Collected {} pasted line(s)", lines.len());
    Ok(lines.join("\n"))
}

fn parse_line(line: &str) -> Result<ShellLine> {
    let mut words = split_words(line);
    if words.first().is_some_and(|w| w.eq_ignore_ascii_case("postdeck")) {
        words.remove(0);
    }

    match words.first().map(|w| w.to_lowercase()).as_deref() {
        None => return Ok(ShellLine::Empty),
        Some("exit") | Some("quit") => return Ok(ShellLine::Exit),
        Some("help") | Some("--help") | Some("-h") if words.len() == 1 => return Ok(ShellLine::Help),
        _ => {}
    }

    debug!("Shell words: {:?}", words);
    let cli = Cli::try_parse_from(std::iter::once("postdeck".to_string()).chain(words))
        .map_err(|e| anyhow!(e.render().to_string()))?;
    Ok(ShellLine::Command(Box::new(cli)))
}

/// Split a line into words, honouring double quotes and backslash escapes
fn split_words(input: &str) -> Vec<String> {
    let normalized = input.replace('\u{a0}', " ");
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escaped = false;

    for c in normalized.trim().chars() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes && !escaped => {
                if !current.is_empty() || quoted {
                    words.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            _ => {
                if escaped && c != '"' && c != '\\' {
                    current.push('\\');
                }
                current.push(c);
                escaped = false;
            }
        }
    }
    if escaped {
        current.push('\\');
    }
    if !current.is_empty() || quoted {
        words.push(current);
    }
    words
}
