use crate::commands::*;
use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod io;

#[cfg(not(windows))]
#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[derive(Subcommand, Debug)]
enum Command {
    Evaluate(evaluate::Args),
    Range(range::Args),
}

/// Nim values of Nim played on a graph of piles
#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    match args.command {
        Command::Evaluate(args) => evaluate::run(args),
        Command::Range(args) => range::run(args),
    }
}
