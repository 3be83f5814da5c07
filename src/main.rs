use std::fs;

use clap::Parser;
use tupla::{get_result, render::TreeFormat};

/// tupla is a small declarative language built around named bindings, tuple
/// values and dependency-driven evaluation.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells tupla to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Renders the parsed program as a tree (unicode, ascii or dot) before
    /// the program is run.
    #[arg(short, long)]
    treetype: Option<TreeFormat>,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    match get_result(&script, args.treetype) {
        Ok(_) => println!("Program finished."),
        Err(e) => eprintln!("{e}"),
    }
}
