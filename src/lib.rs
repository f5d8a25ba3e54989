//! specbuild: a deterministic compiler for specification trees.
//!
//! A specification tree is a directory of small declarative documents: TOML files
//! describing entities (roles, guards, routes, use cases, ...) and Markdown files
//! with long-form prose. One `specbuild build` pass turns the tree into JSON
//! artifacts for a rendering layer to consume:
//!
//! - `tree.json`: the directory tree with per-file metadata
//! - `content/<path>.json`: parsed content (and raw text) of every document
//! - `relations.json`: id index, folder index, forward relations and backlinks
//! - `routes.json`: `route.path` -> document path
//! - `manifest.json`: project metadata, every layer, docs, and the relation graph
//! - `status.json`: counts, warnings, and the project-metadata interview snapshot
//!
//! # Failure model
//!
//! - Unreadable directories and malformed documents are logged and skipped.
//! - Dangling relation targets and duplicate ids are reported as warnings.
//! - Only an unreadable root, an unwritable output directory, or a broken config
//!   abort the run (exit status 1).
//!
//! # Examples
//!
//! ```bash
//! # Compile ./spec into ./generated
//! specbuild
//!
//! # CI: fail on dangling references
//! specbuild check --deny-warnings
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: the pipeline stages (scan, read, extract, graph, validate, manifest, write)

pub mod core;
mod cli;

use crate::core::{config, pipeline, tui, writer};
use anyhow::Context;
use clap::Parser;
use cli::{BuildCli, Cli, Command, SummaryFormat};
use std::process::ExitCode;

/// Exit status when `--deny-warnings` is set and the build has warnings.
pub const EXIT_WARNINGS: u8 = 2;

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("SPECBUILD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

fn execute(args: &BuildCli, write: bool) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let mut build_config = config::load_config(&cwd, args.config.as_deref())?;
    if let Some(root) = &args.root {
        build_config.root = root.clone();
    }
    if let Some(out) = &args.out {
        build_config.out = out.clone();
    }
    let build_config = build_config.resolved(&cwd);

    let build = pipeline::compile(&build_config)?;
    let out = if write {
        writer::write_artifacts(&build, &build_config.out)?;
        Some(build_config.out.as_path())
    } else {
        None
    };

    match args.format {
        SummaryFormat::Json => {
            print!("{}", writer::render_json(&build.status)?);
        }
        SummaryFormat::Text => {
            if !write || build.has_warnings() {
                tui::print_diagnostics(&build);
            }
            tui::print_summary(&build, out);
        }
    }

    if args.deny_warnings && build.has_warnings() {
        return Ok(ExitCode::from(EXIT_WARNINGS));
    }
    Ok(ExitCode::SUCCESS)
}

/// CLI entry point. Returns the process exit status; fatal errors are `Err`.
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        None => execute(&BuildCli::default(), true),
        Some(Command::Build(args)) => execute(&args, true),
        Some(Command::Check(args)) => execute(&args, false),
    }
}
