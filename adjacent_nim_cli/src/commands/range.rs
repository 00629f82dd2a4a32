use crate::{
    commands::common::{Topology, check_pile_count, check_pile_size},
    io::FileOrStdout,
};
use adjacent_nim::{
    numeric::nimber::Nimber,
    short::impartial::games::adjacent_nim::{AdjacentNim, Solver},
};
use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use itertools::Itertools;
use serde::Serialize;
use std::io::{BufWriter, Write};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GameValueFilter {
    None,
    Zero,
    NonZero,
}

impl GameValueFilter {
    fn matches(self, nim_value: Nimber) -> bool {
        match self {
            Self::None => true,
            Self::Zero => nim_value == Nimber::new(0),
            Self::NonZero => nim_value != Nimber::new(0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Report<'a> {
    piles: &'a [u32],
    nim_value: u32,
}

/// Evaluate all pile sizes up to a given maximum on a named graph of piles.
#[derive(Parser, Debug)]
pub struct Args {
    #[arg(long, value_enum, default_value_t = Topology::Path)]
    topology: Topology,

    /// Number of piles
    #[arg(long, default_value_t = 3)]
    piles: usize,

    /// Largest pile size to try
    #[arg(long, default_value_t = 4)]
    max_pile: u32,

    #[arg(long, value_enum, default_value_t = GameValueFilter::None)]
    filter: GameValueFilter,

    /// Output path, `-` for stdout
    #[arg(long, default_value = "-")]
    output: FileOrStdout,
}

pub fn run(args: Args) -> Result<()> {
    if args.piles == 0 {
        bail!("Number of piles must be positive");
    }
    check_pile_count(args.piles)?;
    check_pile_size(args.max_pile)?;

    let graph = args.topology.graph(args.piles);
    let mut w = BufWriter::new(
        args.output
            .create()
            .with_context(|| format!("Could not create file '{}'", args.output))?,
    );

    let mut total = 0_usize;
    let mut reported = 0_usize;
    for piles in (0..args.piles)
        .map(|_| 0..=args.max_pile)
        .multi_cartesian_product()
    {
        let game = AdjacentNim::new(piles, graph.clone())?;
        let nim_value = Solver::new(&game).max_nim_value();
        total += 1;

        if args.filter.matches(nim_value) {
            reported += 1;
            let report = Report {
                piles: game.piles(),
                nim_value: nim_value.value(),
            };
            serde_json::to_writer(&mut w, &report)?;
            writeln!(w)?;
        }
    }
    w.flush()
        .with_context(|| format!("Could not write to file '{}'", args.output))?;

    log::info!("Reported {reported} of {total} positions");
    Ok(())
}
