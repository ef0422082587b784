use clap::Parser;
use log::debug;
use postdeck::cli::Cli;
use postdeck::{commands, init_logger};

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    debug!("Starting postdeck {}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = commands::run(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
