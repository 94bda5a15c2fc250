//! Index command - load scripts and look up definitions

use anyhow::{Context, Result};
use clap::Args;
use shaderdex_core::{CorpusIndex, DirScriptSource, RegistryConfig, load_corpus};
use std::path::PathBuf;

/// Arguments for the index command
#[derive(Args)]
pub struct IndexArgs {
    /// Game directory containing the scripts directory
    pub root: PathBuf,

    /// Definition names to look up
    #[arg(long)]
    pub find: Vec<String>,
}

/// Execute the index command
pub fn execute(args: IndexArgs, config: RegistryConfig) -> Result<()> {
    let source = DirScriptSource::new(&args.root);
    let loaded = load_corpus(&source, &config.scripts)
        .with_context(|| format!("Failed to load scripts from {}", args.root.display()))?;

    for warning in &loaded.warnings {
        println!("  warning: {}", warning);
    }

    let files = loaded.files.len();
    let index = CorpusIndex::build(loaded.text, config.tables.corpus_hash_size);

    println!(
        "{} files, {} definitions, {} bytes of script text",
        files,
        index.definition_count(),
        index.text().len()
    );

    for name in &args.find {
        match index.find_definition(name) {
            Some(offset) => println!("  {} at offset {}", name, offset),
            None => println!("  {} not found", name),
        }
    }

    Ok(())
}
