use anyhow::Result;
use clap::Parser;
use mealscout::Cli;

fn main() -> Result<()> {
    mealscout::run(Cli::parse())
}
