//! CLI struct definitions for the specbuild command-line interface.
//!
//! All clap-derived types live here. Dispatch lives in `lib.rs`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "specbuild",
    version = env!("CARGO_PKG_VERSION"),
    about = "Compile a specification tree of TOML and Markdown documents into deterministic JSON artifacts."
)]
pub(crate) struct Cli {
    /// Log per-file progress (overridden by SPECBUILD_LOG).
    #[clap(long, short = 'v', global = true)]
    pub verbose: bool,
    /// Only log errors.
    #[clap(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    /// Defaults to `build` when omitted.
    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Compile the specification tree and write all artifacts
    Build(BuildCli),
    /// Compile and report diagnostics without writing anything
    Check(BuildCli),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum SummaryFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Debug, Default)]
pub(crate) struct BuildCli {
    /// Specification root (overrides specbuild.toml).
    #[clap(long)]
    pub root: Option<PathBuf>,
    /// Output directory, cleared on every build (overrides specbuild.toml).
    #[clap(long)]
    pub out: Option<PathBuf>,
    /// Config file (defaults to ./specbuild.toml when present).
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Summary format: 'text' or 'json'.
    #[clap(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub format: SummaryFormat,
    /// Exit with status 2 when dangling references or duplicate ids are found.
    #[clap(long)]
    pub deny_warnings: bool,
}
