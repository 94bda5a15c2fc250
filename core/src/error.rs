//! Error types for the shader registry
//!
//! Only corpus loading can fail outright. Everything on the resolve path
//! degrades to the default shader and is reported through `tracing`.

use std::path::PathBuf;

/// Fatal failure while loading the script corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// A listed script file could not be read
    #[error("couldn't load {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while parsing a single shader definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Definition did not start with `{`
    #[error("shader {shader}: expected '{{', found '{found}'")]
    MissingOpeningBrace { shader: String, found: String },

    /// Text ended before the definition was closed
    #[error("shader {shader}: unexpected end of text")]
    UnexpectedEof { shader: String },

    /// More stages than the renderer supports
    #[error("shader {shader}: more than {max} stages")]
    TooManyStages { shader: String, max: usize },

    /// A stage has no texture source
    #[error("shader {shader}: stage {stage} has no map")]
    StageWithoutMap { shader: String, stage: usize },

    /// `blendFunc` named a factor that does not exist
    #[error("shader {shader}: unknown blend factor '{factor}'")]
    UnknownBlendFactor { shader: String, factor: String },
}

/// Failure while reading a registry configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A hash table size is not a power of two
    #[error("{field} must be a power of two, got {value}")]
    InvalidHashSize { field: &'static str, value: usize },
}
