use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rsm",
    about = "Ruleset merger for sing-box and mihomo rule-sets",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file
    #[arg(short, long, global = true, default_value = "rsm.toml")]
    pub config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch every source and merge it into the local rule-sets
    Merge(MergeArgs),
    /// Compile written rule-sets with sing-box or mihomo
    Compile(CompileArgs),
    /// Print the URLs of a source-list file
    Sources(SourcesArgs),
    /// Print the deduplication key of a JSON-encoded entry
    Key(KeyArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// Only run targets with this name (repeatable)
    #[arg(short, long = "target")]
    pub targets: Vec<String>,
    /// Override the configured worker count
    #[arg(short, long)]
    pub workers: Option<usize>,
}

#[derive(Args)]
pub struct CompileArgs {
    /// Only compile targets with this name (repeatable)
    #[arg(short, long = "target")]
    pub targets: Vec<String>,
}

#[derive(Args)]
pub struct SourcesArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct KeyArgs {
    pub entry: String,
}
