//! Resolve command - resolve names the way a renderer would

use anyhow::Result;
use clap::Args;
use shaderdex_core::{LIGHTMAP_NONE, MipPolicy, RegistryConfig};

use crate::context::{GameArgs, describe, open_registry};

/// Arguments for the resolve command
#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Shader names to resolve
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Raw lighting index (-4 2D, -3 vertex, -2 white image, -1 none, 0.. lightmap)
    #[arg(long, default_value_t = LIGHTMAP_NONE, allow_negative_numbers = true)]
    pub lightmap: i32,

    /// Load images without mipmaps
    #[arg(long)]
    pub no_mip: bool,
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs, config: RegistryConfig) -> Result<()> {
    let mut registry = open_registry(&args.game, config)?;
    let mip = MipPolicy::from_mip_raw(!args.no_mip);

    for name in &args.names {
        let id = registry.resolve(Some(name), args.lightmap, mip);
        println!("{}", describe(registry.shader(id)));
    }

    println!("{} shaders realized", registry.len());
    Ok(())
}
