//! Shaderdex Core - shader resolution for id Tech 3 style renderers
//!
//! Loads a corpus of shader scripts, indexes definitions by name, and
//! resolves `(name, lighting mode)` requests to realized shaders through a
//! cache. Names without a definition fall back to an image of the same name
//! and finally to a default-flagged shader, so resolution never fails.
//!
//! # Architecture
//!
//! - [`load_corpus`] - Read, check and concatenate script files
//! - [`CorpusIndex`] - Name to definition offsets over the concatenated text
//! - [`ShaderRegistry`] - Resolution cache, registration and remapping
//! - [`DefinitionParser`] / [`ImageLoader`] - Seams for parsing definitions
//!   and finding images

pub mod config;
pub mod corpus;
pub mod error;
pub mod image;
pub mod parser;
pub mod registry;
pub mod script;
pub mod shader;
pub mod text;
#[cfg(test)]
pub mod test_utils;

pub use config::{RegistryConfig, config_dir};
pub use corpus::CorpusIndex;
pub use error::{ConfigError, CorpusError, ParseError};
pub use image::{DirImageLoader, ImageInfo, ImageLoader, MipPolicy, WrapMode};
pub use parser::{DefinitionParser, ScriptParser};
pub use registry::{DEFAULT_SHADER_NAME, MAX_SHADERS, ShaderRegistry};
pub use script::{
    DirScriptSource, LoadedCorpus, MemoryScriptSource, ScriptSource, ScriptWarning,
    ScriptWarningKind, load_corpus,
};
pub use shader::{
    INVALID_HANDLE, LIGHTMAP_2D, LIGHTMAP_BY_VERTEX, LIGHTMAP_NONE, LIGHTMAP_WHITEIMAGE,
    LightingMode, Shader, ShaderBody, ShaderHandle, ShaderId, ShaderOrigin,
};

// Re-export shared name helpers
pub use shaderdex_shared::{MAX_QPATH, hash_name, strip_extension};
