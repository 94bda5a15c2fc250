//! Script file enumeration and reading

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Provides the script files the corpus is built from.
///
/// Buffers returned by [`read_file`](ScriptSource::read_file) are owned by
/// the caller and released by dropping them.
pub trait ScriptSource {
    /// Names of files in `dir` ending in `.{extension}`, relative to `dir`,
    /// in load order.
    fn list_files(&self, dir: &str, extension: &str) -> Vec<String>;

    /// Read a whole file given its `dir/name` path.
    fn read_file(&self, path: &str) -> std::io::Result<Vec<u8>>;

    /// Size of a file in bytes without reading it, if the source knows.
    fn file_size(&self, _path: &str) -> Option<u64> {
        None
    }
}

/// Scripts stored under a directory on disk.
///
/// Only the top level of the script directory is listed; names come back
/// sorted so the corpus order is reproducible.
#[derive(Debug, Clone)]
pub struct DirScriptSource {
    root: PathBuf,
}

impl DirScriptSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ScriptSource for DirScriptSource {
    fn list_files(&self, dir: &str, extension: &str) -> Vec<String> {
        let mut names: Vec<String> = walkdir::WalkDir::new(self.root.join(dir))
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
            })
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }

    fn read_file(&self, path: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.root.join(path))
    }

    fn file_size(&self, path: &str) -> Option<u64> {
        std::fs::metadata(self.root.join(path)).ok().map(|meta| meta.len())
    }
}

/// Scripts held in memory, keyed by `dir/name` path.
#[derive(Debug, Clone, Default)]
pub struct MemoryScriptSource {
    files: BTreeMap<String, String>,
}

impl MemoryScriptSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_file(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }
}

impl ScriptSource for MemoryScriptSource {
    fn list_files(&self, dir: &str, extension: &str) -> Vec<String> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let suffix = format!(".{}", extension.to_ascii_lowercase());
        self.files
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter(|name| !name.contains('/'))
            .filter(|name| {
                name.len() > suffix.len() && name.to_ascii_lowercase().ends_with(&suffix)
            })
            .map(str::to_string)
            .collect()
    }

    fn read_file(&self, path: &str) -> std::io::Result<Vec<u8>> {
        self.files
            .get(path)
            .map(|text| text.clone().into_bytes())
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, path.to_string()))
    }

    fn file_size(&self, path: &str) -> Option<u64> {
        self.files.get(path).map(|text| text.len() as u64)
    }
}
