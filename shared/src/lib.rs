//! Shared name handling for the Shaderdex shader registry.
//!
//! Used by the registry core and the command-line tools.

pub mod hash;
pub mod names;

pub use hash::{CORPUS_HASH_SIZE, SHADER_HASH_SIZE, hash_name};
pub use names::{MAX_QPATH, names_equal, strip_extension};
