// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

mod catalog;
mod cmd;
mod compare;
mod config;
mod error;
mod extract;
mod render;
mod schema;
mod simplify;

use clap::Parser;
use cmd::Cli;

fn main() {
    // Connection URLs commonly live in .env during development
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = cmd::run(cli) {
        eprintln!("Error generating ERD: {e}");
        std::process::exit(1);
    }
}
