//! lirutil CLI entry point.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use lirutil::DataLayout;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Layout {
            descriptor,
            os,
            arch,
            dump,
        } => match DataLayout::parse(&descriptor, &os, &arch) {
            Ok(layout) => {
                println!("{layout}");
                if dump {
                    println!("{layout:#?}");
                }
            }
            Err(e) => {
                eprintln!("Error parsing data layout: {e}");
                std::process::exit(1);
            }
        },
    }
}
