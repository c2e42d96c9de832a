use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "league-pairing: Swiss-style pairings for a league cycle")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SnapshotArgs {
    /// Standings JSON: players with wins, losses and requested matches
    #[arg(short, long)]
    pub standings: PathBuf,
    /// History JSON: prior meetings and byes (optional)
    #[arg(long)]
    pub history: Option<PathBuf>,
    /// Pairing settings TOML (optional, defaults otherwise)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Compute pairings for the cycle and write them as JSON
    Pair {
        #[command(flatten)]
        input: SnapshotArgs,
        /// Output file (optional, defaults to pairings.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the pairwise cost matrix for the cycle
    Costs {
        #[command(flatten)]
        input: SnapshotArgs,
    },
}
