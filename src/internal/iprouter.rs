//! Router control program over a `RouteTable`.

use std::{error::Error, io, path::PathBuf};

use chaintable::{RouterDriver, Tokens, initialize_logger};
use clap::Parser;

/// Simulates an internet router driven by a classful route table
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Batch file of router commands, read before the keyboard
    batch: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    initialize_logger();
    let args = Args::parse();

    let mut tokens = Tokens::open(args.batch.as_deref())?;
    let mut out = io::stdout().lock();
    RouterDriver.run(&mut tokens, &mut out)?;
    Ok(())
}
