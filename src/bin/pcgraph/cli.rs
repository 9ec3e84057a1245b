use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use pcloud_graph::Backend;

#[derive(Parser)]
#[command(
    name = "pcgraph",
    about = "Convert atomistic point clouds into neighbor graphs",
    version,
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a point-cloud sample (JSON) into a graph sample
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Build a pairwise point-cloud sample from a structure (JSON)
    #[command(visible_alias = "f")]
    Featurize(FeaturizeArgs),
}

impl Command {
    pub fn io(&self) -> &IoOptions {
        match self {
            Command::Convert(args) => &args.io,
            Command::Featurize(args) => &args.io,
        }
    }
}

/// I/O options shared by all commands.
#[derive(Args)]
pub struct IoOptions {
    /// Input JSON file (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output JSON file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub graph: GraphOptions,
}

#[derive(Args)]
#[command(next_help_heading = "Graph Construction")]
pub struct GraphOptions {
    /// Transform settings (TOML); flags below override file values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Graph convention to produce
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<BackendArg>,

    /// Neighbor cutoff distance (Å), exclusive
    #[arg(long, value_name = "Å")]
    pub cutoff: Option<f32>,

    /// Sample key copied onto graph nodes, repeatable (replaces the defaults)
    #[arg(long = "node-key", value_name = "KEY", action = ArgAction::Append)]
    pub node_keys: Vec<String>,

    /// Sample key copied onto graph edges, repeatable
    #[arg(long = "edge-key", value_name = "KEY", action = ArgAction::Append)]
    pub edge_keys: Vec<String>,
}

#[derive(Args)]
pub struct FeaturizeArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub cloud: CloudOptions,
}

#[derive(Args)]
#[command(next_help_heading = "Point Cloud")]
pub struct CloudOptions {
    /// Width of each one-hot species block
    #[arg(long, value_name = "C", default_value = "100")]
    pub num_classes: usize,

    /// Sample a subset of destination atoms instead of all pairs
    #[arg(long)]
    pub sampled: bool,

    /// Destination atoms kept when sampling
    #[arg(long, value_name = "K", default_value = "32", requires = "sampled")]
    pub max_neighbors: usize,

    /// Random seed for reproducible sampling
    #[arg(long, value_name = "SEED", requires = "sampled")]
    pub seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BackendArg {
    Dgl,
    Pyg,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Dgl => Backend::Dgl,
            BackendArg::Pyg => Backend::Pyg,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_convert_flags() {
        let cli = Cli::try_parse_from([
            "pcgraph",
            "convert",
            "-i",
            "in.json",
            "--backend",
            "pyg",
            "--cutoff",
            "5.5",
            "--node-key",
            "force",
            "--node-key",
            "charge",
            "-vv",
        ])
        .unwrap();
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.graph.cutoff, Some(5.5));
        assert_eq!(args.graph.node_keys, vec!["force", "charge"]);
        assert_eq!(args.io.verbose, 2);
        assert!(matches!(args.graph.backend, Some(BackendArg::Pyg)));
    }

    #[test]
    fn seed_requires_sampling() {
        assert!(Cli::try_parse_from(["pcgraph", "featurize", "--seed", "3"]).is_err());
        assert!(Cli::try_parse_from(["pcgraph", "featurize", "--sampled", "--seed", "3"]).is_ok());
    }
}
