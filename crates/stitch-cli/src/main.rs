// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! stitchview: inspect DST embroidery files and dump their stitch geometry.
//!
//! # Usage
//! ```text
//! stitchview inspect design.dst
//! stitchview mesh design.dst --lines --palette red,#00ff00 --draw-range 0.5 --json
//! ```
//!
//! Logs go to stderr (`RUST_LOG` overrides the default `warn` level); reports
//! go to stdout.

// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod inspect;
mod mesh;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect DST embroidery files and their stitch geometry")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the header fields and a summary of the stitch stream.
    Inspect {
        /// DST file to read.
        file: PathBuf,
        /// Seed for generated palette entries.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Build geometry through the live controller and report it.
    Mesh(mesh::MeshArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match args.command {
        Command::Inspect { file, seed } => inspect::run(&file, seed).await,
        Command::Mesh(mesh_args) => mesh::run(mesh_args).await,
    }
}
