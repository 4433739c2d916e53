use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use wordvm_rs::{disasm, image};

#[derive(Parser, Debug)]
#[command(author, version, about = "Disassemble a wordvm bytecode image")]
struct Opts {
    #[arg(value_name = "BINFILE")]
    input: PathBuf,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let words = image::load(&opts.input)?;
    for line in disasm::disassemble(&words) {
        println!("{line}");
    }
    Ok(())
}
