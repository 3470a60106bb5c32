//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};
use clap_complete::Shell;

/// Test preprocessor: builds judge input and expected output from a test directory
#[derive(Parser, Debug)]
#[command(name = "testpp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output file without extension. For "-o x", x.inp and x.cor are created
    #[arg(
        short,
        long,
        value_hint = ValueHint::FilePath,
        required_unless_present_any = ["generator", "show_config"]
    )]
    pub output: Option<PathBuf>,

    /// Test directory, containing a meta.json and one or more tests
    #[arg(
        value_hint = ValueHint::DirPath,
        required_unless_present_any = ["generator", "show_config"]
    )]
    pub inp_dir: Option<PathBuf>,

    /// Use this config file instead of the global/local/env layers
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print the room structure as a tree after writing the files
    #[arg(long)]
    pub print_tree: bool,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    pub show_config: bool,

    /// Generate shell completions and exit
    #[arg(long = "generate", value_enum)]
    pub generator: Option<Shell>,

    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,
}
