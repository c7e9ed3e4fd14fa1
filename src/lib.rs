pub mod analysis;
pub mod classifier;
pub mod commands;
pub mod db;
pub mod evaluation;
pub mod models;
pub mod monitoring;
pub mod settings;
mod utils;

use clap::Parser;

use commands::Cli;

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging (reads RUST_LOG env var)
    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(err) = commands::execute(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
