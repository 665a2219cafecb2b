use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(about = "Lowers expression trees to three-address code and optimises it")]
pub struct Options {
    #[clap(subcommand)]
    pub operation: Operation,
    /// Increase logging verbosity (may be repeated)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only report errors
    #[clap(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Operation {
    /// Convert an expression tree to three-address code
    Convert {
        /// Tree text to read, or `-` for standard input
        file: PathBuf,
        #[clap(flatten)]
        output: OutputOptions,
    },
    /// Optimise three-address code
    Optimise {
        /// TAC text to read, or `-` for standard input
        file: PathBuf,
        #[clap(flatten)]
        output: OutputOptions,
        #[clap(flatten)]
        log: LogOptions,
    },
    /// Convert an expression tree and optimise the result
    Compile {
        /// Tree text to read, or `-` for standard input
        file: PathBuf,
        #[clap(flatten)]
        output: OutputOptions,
        #[clap(flatten)]
        log: LogOptions,
        /// Do not optimise the generated code
        #[clap(long)]
        no_optimise: bool,
    },
}

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Write the code here instead of to standard output
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct LogOptions {
    /// Write the optimisation log here instead of to standard error
    #[clap(long = "log")]
    pub log_file: Option<PathBuf>,
}
