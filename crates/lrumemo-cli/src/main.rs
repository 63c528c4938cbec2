//! lrumemo - drive a memoized function from the command line

mod demo;

use anyhow::Result;
use clap::Parser;
use lrumemo::lru_cache;
use tracing::info;

use crate::demo::{run_calls, slow_square, Outcome};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of results)
    #[arg(short, long, default_value_t = 2)]
    capacity: usize,

    /// Arguments to call the function with, in order
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true, default_value = "1,2,1,3")]
    keys: Vec<i64>,

    /// Arguments for which the function fails
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    fail_on: Vec<i64>,

    /// Simulated cost of one function call in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Starting lrumemo v{}", env!("CARGO_PKG_VERSION"));
    info!("Cache capacity: {}", args.capacity);

    let decorator = lru_cache(args.capacity)?;
    let fail_on = args.fail_on.clone();
    let delay_ms = args.delay_ms;
    let memo = decorator.decorate(move |n: i64| slow_square(n, &fail_on, delay_ms));

    let outcomes = run_calls(&memo, &args.keys);
    for (n, outcome) in args.keys.iter().zip(&outcomes) {
        match outcome {
            Outcome::Hit(value) => println!("{n:>8} -> {value:<12} hit"),
            Outcome::Miss(value) => println!("{n:>8} -> {value:<12} miss"),
            Outcome::Failed(err) => println!("{n:>8} !! {err}"),
        }
    }

    let stats = memo.stats().snapshot();
    println!();
    println!("cached keys (newest first): {:?}", memo.cached_keys());
    println!(
        "hits: {}  misses: {}  evictions: {}  hit ratio: {:.2}",
        stats.hits,
        stats.misses,
        stats.evictions,
        stats.hit_ratio()
    );

    info!("Done after {} calls", outcomes.len());
    Ok(())
}
