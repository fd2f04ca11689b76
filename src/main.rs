use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let parsed = cli::Cli::parse();
    cli::run(parsed)
}
