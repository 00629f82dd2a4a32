use crate::{
    commands::common::{Topology, check_bounds},
    io::FileOrStdout,
};
use adjacent_nim::short::impartial::games::adjacent_nim::AdjacentNim;
use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use std::io::{BufWriter, Write};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Evaluate a position for every possible last played pile and report the highest value
#[derive(Parser, Debug)]
pub struct Args {
    /// Pile sizes, e.g. `3,5` or `[3, 5]`
    #[arg(long, allow_hyphen_values = true)]
    piles: String,

    /// Adjacency matrix, e.g. `01,10` or `[[0, 1], [1, 0]]`
    #[arg(long, allow_hyphen_values = true, conflicts_with = "topology")]
    adjacency: Option<String>,

    /// Named graph of piles, used instead of `--adjacency`
    #[arg(long, value_enum)]
    topology: Option<Topology>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print evaluation counters
    #[arg(long, default_value_t = false)]
    stats: bool,

    /// Output path, `-` for stdout
    #[arg(long, default_value = "-")]
    output: FileOrStdout,
}

pub fn run(args: Args) -> Result<()> {
    let game = match (&args.adjacency, args.topology) {
        (Some(adjacency), _) => AdjacentNim::parse(&args.piles, adjacency),
        (None, Some(topology)) => {
            AdjacentNim::parse_with_graph(&args.piles, |size| topology.graph(size))
        }
        (None, None) => bail!("Graph of piles is missing. Use --adjacency or --topology."),
    }
    .context("Invalid game")?;
    check_bounds(&game)?;

    log::info!("Solving {} piles: {:?}", game.size(), game.piles());
    let solution = game.solve();
    log::info!("{}", solution.stats);

    let mut w = BufWriter::new(
        args.output
            .create()
            .with_context(|| format!("Could not create file '{}'", args.output))?,
    );
    match args.format {
        Format::Text => {
            writeln!(w, "Nim Value: {}", solution.nim_value.value())?;
            write!(w, "{}", solution.starting_positions)?;
            if args.stats {
                writeln!(w, "Stats: {}", solution.stats)?;
            }
        }
        Format::Json => {
            serde_json::to_writer(&mut w, &solution)?;
            writeln!(w)?;
        }
    }
    w.flush()
        .with_context(|| format!("Could not write to file '{}'", args.output))?;

    Ok(())
}
