//! Shaderdex CLI - inspect shader script corpora
//!
//! # Commands
//!
//! - `shaderdex index` - Load and index the scripts under a game directory
//! - `shaderdex resolve` - Resolve shader names and describe the result
//! - `shaderdex register` - Register 2D shaders and print their handles
//! - `shaderdex remap` - Remap one shader name to another
//!
//! # Usage
//!
//! ```bash
//! # Index baseq3/scripts/*.shader and look up two definitions
//! shaderdex index baseq3 --find textures/base_wall/metal --find textures/sfx/flame1
//!
//! # Resolve a lightmapped world surface
//! shaderdex resolve baseq3 textures/base_wall/metal --lightmap 0 --lightmaps 4
//! ```
//!
//! Images are looked up under the same directory as the scripts.
//! Set `RUST_LOG=debug` for corpus and cache diagnostics.

mod context;
mod index;
mod register;
mod remap;
mod resolve;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Shaderdex CLI - inspect shader script corpora
#[derive(Parser)]
#[command(name = "shaderdex")]
#[command(about = "Inspect shader script corpora")]
#[command(version)]
struct Cli {
    /// Path to a shaderdex.toml config (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and index the scripts under a game directory
    Index(index::IndexArgs),

    /// Resolve shader names and describe the result
    Resolve(resolve::ResolveArgs),

    /// Register 2D shaders and print their handles
    Register(register::RegisterArgs),

    /// Remap one shader name to another
    Remap(remap::RemapArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = context::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Index(args) => index::execute(args, config),
        Commands::Resolve(args) => resolve::execute(args, config),
        Commands::Register(args) => register::execute(args, config),
        Commands::Remap(args) => remap::execute(args, config),
    }
}
