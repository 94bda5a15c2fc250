//! Remap command - redirect one shader name to another

use anyhow::Result;
use clap::Args;
use shaderdex_core::{LIGHTMAP_NONE, MipPolicy, RegistryConfig};

use crate::context::{GameArgs, describe, open_registry};

/// Arguments for the remap command
#[derive(Args)]
pub struct RemapArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Shader to redirect
    pub source: String,

    /// Shader to draw instead
    pub target: String,

    /// Time offset stored on the target, in seconds
    #[arg(long, allow_hyphen_values = true)]
    pub time_offset: Option<String>,

    /// Raw lighting index the source is resolved with first
    #[arg(long, default_value_t = LIGHTMAP_NONE, allow_negative_numbers = true)]
    pub lightmap: i32,
}

/// Execute the remap command
pub fn execute(args: RemapArgs, config: RegistryConfig) -> Result<()> {
    let mut registry = open_registry(&args.game, config)?;

    let source = registry.resolve(Some(&args.source), args.lightmap, MipPolicy::Mipmap);
    registry.remap(&args.source, &args.target, args.time_offset.as_deref());

    let effective = registry.effective(source);
    println!("{}", describe(registry.shader(source)));
    println!("  draws as {}", describe(registry.shader(effective)));
    println!("  time offset {}", registry.shader(effective).time_offset);
    Ok(())
}
