//! Command harness for a `HashTable<String, i32>`.
//!
//! Reads commands from the keyboard, or from a batch file first when one is
//! given. Set `RUST_LOG=chaintable=debug` to watch construction and rehashing.

use std::{error::Error, io, path::PathBuf};

use chaintable::{
    Sizing, TableDriver, Tokens,
    hashers::{ByteSumBuilder, DefaultHashBuilder, Fnv1aBuilder},
    initialize_logger,
};
use clap::{Parser, ValueEnum};

/// Hash strategies selectable for string keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// std's `SipHash`
    Default,
    /// FNV-1a
    Fnv,
    /// Sum of the key bytes
    ByteSum,
}

/// Command harness for a separate-chaining hash table
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Batch file of commands, read before the keyboard
    batch: Option<PathBuf>,

    /// Hash strategy for the keys
    #[arg(long, value_enum, default_value_t = Strategy::Default)]
    hash: Strategy,

    /// Use the bucket estimate as given instead of rounding it down to a prime
    #[arg(long)]
    exact: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    initialize_logger();
    let args = Args::parse();

    let mut tokens = Tokens::open(args.batch.as_deref())?;
    let sizing = if args.exact { Sizing::Exact } else { Sizing::Primed };
    let mut out = io::stdout().lock();

    match args.hash {
        Strategy::Default => {
            TableDriver::new(DefaultHashBuilder::default(), sizing, "DefaultHasher")
                .run(&mut tokens, &mut out)?;
        }
        Strategy::Fnv => {
            TableDriver::new(Fnv1aBuilder::default(), sizing, "Fnv1aHasher")
                .run(&mut tokens, &mut out)?;
        }
        Strategy::ByteSum => {
            TableDriver::new(ByteSumBuilder::default(), sizing, "ByteSumHasher")
                .run(&mut tokens, &mut out)?;
        }
    }
    Ok(())
}
