//! Register command - register 2D shaders and print their handles

use anyhow::Result;
use clap::Args;
use shaderdex_core::{INVALID_HANDLE, RegistryConfig};

use crate::context::{GameArgs, describe, open_registry};

/// Arguments for the register command
#[derive(Args)]
pub struct RegisterArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Shader names to register
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Register without mipmaps (HUD and menu art)
    #[arg(long)]
    pub no_mip: bool,
}

/// Execute the register command
pub fn execute(args: RegisterArgs, config: RegistryConfig) -> Result<()> {
    let mut registry = open_registry(&args.game, config)?;

    for name in &args.names {
        let handle = if args.no_mip {
            registry.register_shader_no_mip(name)
        } else {
            registry.register_shader(name)
        };

        if handle == INVALID_HANDLE {
            println!("{}: no shader", name);
        } else {
            let id = registry.shader_by_handle(handle);
            println!("{}: handle {} {}", name, handle, describe(registry.shader(id)));
        }
    }

    Ok(())
}
