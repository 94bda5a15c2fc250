//! Config loading and registry setup shared by all commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use shaderdex_core::{
    DirImageLoader, DirScriptSource, RegistryConfig, Shader, ShaderOrigin, ShaderRegistry,
    ScriptParser,
};

/// Game directory and world options common to commands that resolve shaders
#[derive(Args)]
pub struct GameArgs {
    /// Game directory containing the scripts directory and images
    pub root: PathBuf,

    /// Number of lightmaps in the loaded world (overrides the config)
    #[arg(long)]
    pub lightmaps: Option<i32>,
}

/// Load `path`, or the user config if no path is given.
pub fn load_config(path: Option<&Path>) -> Result<RegistryConfig> {
    match path {
        Some(path) => RegistryConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => RegistryConfig::load_default().context("Failed to load user config"),
    }
}

/// Build a registry over `game.root` and load its scripts.
pub fn open_registry(game: &GameArgs, config: RegistryConfig) -> Result<ShaderRegistry> {
    tracing::debug!("opening shader registry over {}", game.root.display());
    let mut registry = ShaderRegistry::new(config, ScriptParser, DirImageLoader::new(&game.root));
    if let Some(count) = game.lightmaps {
        registry.set_num_lightmaps(count);
    }

    let source = DirScriptSource::new(&game.root);
    registry
        .load(&source)
        .with_context(|| format!("Failed to load scripts from {}", game.root.display()))?;

    for warning in registry.script_warnings() {
        println!("  warning: {}", warning);
    }
    Ok(registry)
}

/// One-line summary of a shader.
pub fn describe(shader: &Shader) -> String {
    let origin = match &shader.origin {
        ShaderOrigin::Script => "script".to_string(),
        ShaderOrigin::Image(image) => {
            format!("image {} ({}x{})", image.name, image.width, image.height)
        }
        ShaderOrigin::Default => "default".to_string(),
    };
    format!(
        "{} {} [{}] {}, {} stages{}",
        shader.id,
        shader.name,
        shader.lighting,
        origin,
        shader.body.stages.len(),
        if shader.default_shader { ", default" } else { "" }
    )
}
