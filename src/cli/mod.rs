//! CLI definitions for the pullstar command-line interface.
//!
//! Three subcommands: `build` to construct and persist an index, `query` to
//! run a batch of expressions against an index and record result counts and
//! timings, and `shell` for an interactive query loop with explain output.

pub mod display;

use clap::{Parser, Subcommand, ValueEnum};

use crate::index::IndexKind;
use crate::regex::ExecutorKind;

#[derive(Parser)]
#[command(
    name = "pullstar",
    about = "Regular-expression search over full-text indexes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Index backend selection on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum IndexKindArg {
    /// Compact suffix tree built from the suffix and LCP arrays
    SuffixTree,
    /// Plain suffix array with binary-search lookup
    SuffixArray,
    /// Suffix array with precomputed LCP side tables
    AugmentedSuffixArray,
    /// Fixed-width n-gram map
    NGram,
}

impl From<IndexKindArg> for IndexKind {
    fn from(arg: IndexKindArg) -> Self {
        match arg {
            IndexKindArg::SuffixTree => IndexKind::SuffixTree,
            IndexKindArg::SuffixArray => IndexKind::SuffixArray,
            IndexKindArg::AugmentedSuffixArray => IndexKind::AugmentedSuffixArray,
            IndexKindArg::NGram => IndexKind::NGram,
        }
    }
}

/// Whether to construct the index or load a persisted one.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Construct from the input file (and persist alongside it)
    Build,
    /// Load the persisted index next to the input file
    Load,
}

/// Evaluation strategy selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExecutorArg {
    /// Bottom-up composition of offset-length sets
    BlackBox,
    /// Token enumeration resolved through the index
    Pull,
}

impl From<ExecutorArg> for ExecutorKind {
    fn from(arg: ExecutorArg) -> Self {
        match arg {
            ExecutorArg::BlackBox => ExecutorKind::BlackBox,
            ExecutorArg::Pull => ExecutorKind::Pull,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an index from a corpus file and persist it
    Build {
        /// Corpus file to index
        #[arg(short, long)]
        input: String,

        /// Index backend to construct
        #[arg(long, value_enum, default_value = "suffix-tree")]
        index: IndexKindArg,

        /// Window width for the n-gram backend
        #[arg(long, default_value = "3")]
        ngram_size: u32,
    },

    /// Run a query file against an index and write one record per query
    Query {
        /// Corpus file the index belongs to
        #[arg(short, long)]
        input: String,

        /// Index backend
        #[arg(long, value_enum, default_value = "suffix-tree")]
        index: IndexKindArg,

        /// Construct the index or load the persisted one
        #[arg(long, value_enum, default_value = "build")]
        mode: ModeArg,

        /// Evaluation strategy
        #[arg(long, value_enum, default_value = "pull")]
        executor: ExecutorArg,

        /// File with one expression per line
        #[arg(short, long)]
        queries: String,

        /// Destination for result_count <TAB> microseconds records
        #[arg(short, long)]
        results: String,

        /// Route scannable sub-expressions through the partial-scan walker
        /// (black-box executor only)
        #[arg(long)]
        partial_scan: bool,

        /// Cap the byte gap a .* wildcard may span (unbounded by default)
        #[arg(long)]
        gap_bound: Option<usize>,
    },

    /// Interactive query loop against one index
    Shell {
        /// Corpus file the index belongs to
        #[arg(short, long)]
        input: String,

        /// Index backend
        #[arg(long, value_enum, default_value = "suffix-tree")]
        index: IndexKindArg,

        /// Construct the index or load the persisted one
        #[arg(long, value_enum, default_value = "build")]
        mode: ModeArg,

        /// Evaluation strategy
        #[arg(long, value_enum, default_value = "pull")]
        executor: ExecutorArg,

        /// How many results to print per query
        #[arg(long, default_value = "10")]
        show: usize,
    },
}
