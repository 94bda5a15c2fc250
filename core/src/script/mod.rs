//! Script corpus loading
//!
//! Collects every shader script into one compressed text buffer:
//!
//! 1. List `{dir}/*.{extension}` through a [`ScriptSource`]
//! 2. Read each file (a read failure aborts the load)
//! 3. Skip files over the size cap, warning about each
//! 4. Check each file's `name { ... }` structure, warning about the first
//!    broken definition
//! 5. Concatenate all files and strip comments/whitespace
//!
//! A file with a broken definition is still part of the corpus; the check
//! only reports it.

mod source;

pub use source::{DirScriptSource, MemoryScriptSource, ScriptSource};

use std::fmt;

use crate::config::ScriptsConfig;
use crate::error::CorpusError;
use crate::text::{Lexer, compress};

/// Problem found in a script file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptWarning {
    /// Script path, e.g. `scripts/base.shader`
    pub file: String,
    /// Name of the definition that is broken; empty for whole-file problems
    pub shader: String,
    /// Line the definition's name is on; 0 for whole-file problems
    pub line: usize,
    pub kind: ScriptWarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptWarningKind {
    /// The name was not followed by `{`. Holds the token found instead and
    /// its line, if the file did not simply end.
    MissingOpeningBrace { found: Option<(String, usize)> },
    /// The definition's braces never balance.
    MissingClosingBrace,
    /// The file exceeds `max_file_bytes` and was left out of the corpus.
    TooLarge { len: u64, max: u64 },
}

impl fmt::Display for ScriptWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ScriptWarningKind::MissingOpeningBrace { found } => {
                write!(
                    f,
                    "Ignoring shader file {}. Shader \"{}\" on line {} missing opening brace",
                    self.file, self.shader, self.line
                )?;
                if let Some((token, line)) = found {
                    write!(f, " (found \"{}\" on line {})", token, line)?;
                }
                write!(f, ".")
            }
            ScriptWarningKind::MissingClosingBrace => write!(
                f,
                "Ignoring shader file {}. Shader \"{}\" on line {} missing closing brace.",
                self.file, self.shader, self.line
            ),
            ScriptWarningKind::TooLarge { len, max } => write!(
                f,
                "Skipping shader file {}: {} bytes exceeds the {} byte limit.",
                self.file, len, max
            ),
        }
    }
}

/// Result of loading every script file.
#[derive(Debug, Clone, Default)]
pub struct LoadedCorpus {
    /// Compressed text of all files
    pub text: String,
    /// Files that were loaded, as `dir/name` paths in listing order
    pub files: Vec<String>,
    /// One entry per file that was skipped or failed the structure check
    pub warnings: Vec<ScriptWarning>,
}

/// Check that every definition in `text` is a name followed by a balanced
/// brace block.
///
/// Stops at the first broken definition and returns it.
pub fn check_script(file: &str, text: &str) -> Option<ScriptWarning> {
    let mut lexer = Lexer::new(text);

    loop {
        let name = lexer.next_token(true);
        if name.is_empty() {
            return None;
        }
        let line = lexer.line();

        let token = lexer.next_token(true);
        if token != "{" {
            let found = (!token.is_empty()).then(|| (token.to_string(), lexer.line()));
            return Some(ScriptWarning {
                file: file.to_string(),
                shader: name.to_string(),
                line,
                kind: ScriptWarningKind::MissingOpeningBrace { found },
            });
        }

        if !lexer.skip_braced_section(1) {
            return Some(ScriptWarning {
                file: file.to_string(),
                shader: name.to_string(),
                line,
                kind: ScriptWarningKind::MissingClosingBrace,
            });
        }
    }
}

/// Load, check and concatenate all script files.
///
/// Finding no files is not an error: the result is an empty corpus and every
/// lookup falls through to images or the default shader. Only a failed read
/// aborts the load.
pub fn load_corpus(
    source: &dyn ScriptSource,
    config: &ScriptsConfig,
) -> Result<LoadedCorpus, CorpusError> {
    let mut names = source.list_files(&config.dir, &config.extension);
    tracing::debug!("scanning {} {} files", names.len(), config.extension);

    if names.is_empty() {
        tracing::warn!("no shader files found in '{}'", config.dir);
        return Ok(LoadedCorpus::default());
    }

    if names.len() > config.max_files {
        tracing::warn!(
            "{} shader files found, only the first {} are loaded",
            names.len(),
            config.max_files
        );
        names.truncate(config.max_files);
    }

    let mut buffers = Vec::with_capacity(names.len());
    let mut files = Vec::with_capacity(names.len());
    let mut warnings = Vec::new();
    let mut sum = 0;

    for name in &names {
        let path = format!("{}/{}", config.dir, name);
        let too_large = |len: u64| {
            let warning = ScriptWarning {
                file: path.clone(),
                shader: String::new(),
                line: 0,
                kind: ScriptWarningKind::TooLarge {
                    len,
                    max: config.max_file_bytes,
                },
            };
            tracing::warn!("{}", warning);
            warning
        };

        if let Some(len) = source
            .file_size(&path)
            .filter(|&len| len > config.max_file_bytes)
        {
            warnings.push(too_large(len));
            continue;
        }

        tracing::info!("...loading '{}'", path);
        let bytes = source.read_file(&path).map_err(|source| CorpusError::Read {
            path: path.clone(),
            source,
        })?;
        if bytes.len() as u64 > config.max_file_bytes {
            warnings.push(too_large(bytes.len() as u64));
            continue;
        }

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        };

        if let Some(warning) = check_script(&path, &text) {
            tracing::warn!("{}", warning);
            warnings.push(warning);
        }

        sum += text.len();
        buffers.push(text);
        files.push(path);
    }

    // Later files come first in the corpus.
    let mut combined = String::with_capacity(sum + buffers.len() * 2);
    for buffer in buffers.iter().rev() {
        combined.push_str(buffer);
        combined.push('\n');
    }
    drop(buffers);

    Ok(LoadedCorpus {
        text: compress(&combined),
        files,
        warnings,
    })
}
