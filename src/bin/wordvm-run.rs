use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use wordvm_rs::{image, Exit, Machine, StdConsole};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a wordvm bytecode image")]
struct Opts {
    /// Initial program counter
    #[arg(long, default_value_t = 0i64)]
    entry: i64,
    /// Memory size in 8-byte words (image is loaded at address 0)
    #[arg(long, default_value_t = 1 << 20)]
    mem_words: usize,
    /// Print the final machine state as JSON after the run
    #[arg(long)]
    dump_state: bool,
    #[arg(value_name = "BINFILE")]
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    let mut mem = image::load(&opts.input)?;
    anyhow::ensure!(
        mem.len() <= opts.mem_words,
        "image of {} words exceeds --mem-words {}",
        mem.len(),
        opts.mem_words
    );
    mem.resize(opts.mem_words, 0);

    let mut machine = Machine::new();
    machine.pc = opts.entry;

    let exit = machine.run(&mut mem, &mut StdConsole)?;
    if exit == Exit::Yielded {
        eprintln!("yielded at pc {}", machine.pc);
    }
    if opts.dump_state {
        println!("{}", serde_json::to_string(&machine)?);
    }
    Ok(())
}
