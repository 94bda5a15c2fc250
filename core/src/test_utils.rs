//! Shared test utilities for unit tests

use std::cell::Cell;
use std::io;
use std::rc::Rc;

use hashbrown::HashMap;
use shaderdex_shared::strip_extension;

use crate::config::RegistryConfig;
use crate::image::{ImageInfo, ImageLoader, MipPolicy};
use crate::parser::ScriptParser;
use crate::registry::ShaderRegistry;
use crate::script::{MemoryScriptSource, ScriptSource};

// ============================================================================
// Script sources
// ============================================================================

/// Lists files that fail to read. Paths are given as `dir/name`.
pub struct UnreadableScripts {
    paths: Vec<String>,
}

impl UnreadableScripts {
    pub fn new(paths: &[&str]) -> Self {
        Self {
            paths: paths.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl ScriptSource for UnreadableScripts {
    fn list_files(&self, dir: &str, _extension: &str) -> Vec<String> {
        let prefix = format!("{dir}/");
        self.paths
            .iter()
            .filter_map(|path| path.strip_prefix(&prefix))
            .map(str::to_string)
            .collect()
    }

    fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("{path} is unreadable"),
        ))
    }
}

/// Build an in-memory script source from `(path, text)` pairs.
pub fn scripts(files: &[(&str, &str)]) -> MemoryScriptSource {
    let mut source = MemoryScriptSource::new();
    for (path, text) in files {
        source.insert(*path, *text);
    }
    source
}

// ============================================================================
// Images
// ============================================================================

/// Image loader backed by a fixed set of names.
///
/// Every image is 64x64. Lookups are counted through a shared counter so
/// tests can check what reached the loader after it moved into a registry.
pub struct TestImages {
    images: HashMap<String, (u32, u32)>,
    lookups: Rc<Cell<usize>>,
}

impl TestImages {
    pub fn new(names: &[&str]) -> Self {
        Self {
            images: names
                .iter()
                .map(|name| (strip_extension(name).to_ascii_lowercase(), (64, 64)))
                .collect(),
            lookups: Rc::new(Cell::new(0)),
        }
    }

    pub fn lookups(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.lookups)
    }
}

impl ImageLoader for TestImages {
    fn find_image(&mut self, name: &str, mip: MipPolicy) -> Option<ImageInfo> {
        self.lookups.set(self.lookups.get() + 1);
        let key = strip_extension(name).to_ascii_lowercase();
        self.images
            .get(&key)
            .map(|&(width, height)| ImageInfo::new(key.clone(), width, height, mip))
    }
}

// ============================================================================
// Registries
// ============================================================================

/// Registry with the default config, `num_lightmaps` lightmaps and the given
/// scripts and images loaded.
pub fn registry(files: &[(&str, &str)], images: &[&str], num_lightmaps: i32) -> ShaderRegistry {
    let mut config = RegistryConfig::default();
    config.resolve.num_lightmaps = num_lightmaps;
    registry_with_config(config, files, TestImages::new(images))
}

pub fn registry_with_config(
    config: RegistryConfig,
    files: &[(&str, &str)],
    images: TestImages,
) -> ShaderRegistry {
    let mut registry = ShaderRegistry::new(config, ScriptParser, images);
    registry
        .load(&scripts(files))
        .expect("in-memory scripts always load");
    registry
}
