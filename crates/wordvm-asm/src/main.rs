use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use wordvm_rs::{assemble, image};

#[derive(Parser, Debug)]
#[command(author, version, about = "Assemble wordvm source to a bytecode image")]
struct Opts {
    /// Input assembly file
    #[arg(short, long)]
    input: PathBuf,
    /// Output binary file (8-byte little-endian words)
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let text = std::fs::read_to_string(&opts.input)
        .with_context(|| format!("couldn't read {}", opts.input.display()))?;
    let words = assemble(&text).with_context(|| format!("assembling {}", opts.input.display()))?;
    image::save(&opts.output, &words)?;
    Ok(())
}
