//! Command-line interface for lirutil.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lirutil")]
#[command(about = "Utilities for LLVM-style IR", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a `target datalayout` descriptor and print it normalised
    Layout {
        /// Descriptor string, e.g. `e-m:e-i64:64-n8:16:32:64-S128`
        descriptor: String,
        /// Target OS, selects the default mangling style
        #[arg(long, default_value = "linux")]
        os: String,
        /// Target architecture, selects the default native integer widths
        #[arg(long, default_value = "x86-64")]
        arch: String,
        /// Also print the parsed structure
        #[arg(long)]
        dump: bool,
    },
}
