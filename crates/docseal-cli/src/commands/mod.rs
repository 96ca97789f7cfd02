//! Subcommand implementations
//!
//! Commands write human-readable output to the supplied writer so they can
//! be exercised without a terminal.

mod inspect;
mod sign;
mod verify;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use docseal::{Document, DocumentId, FileArtifactStore, SignError};

use crate::cli::{Cli, Command};

/// Result of a command that completed without a hard error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// Verification ran and the signature did not match
    NotVerified,
}

pub fn run(cli: Cli, out: &mut dyn Write) -> anyhow::Result<Status> {
    let store = Arc::new(
        FileArtifactStore::open(cli.store.storage_dir.clone())
            .context("failed to open artifact store")?,
    );

    match cli.command {
        Command::Sign { file, id } => {
            let document = load_document(&file, id)?;
            sign::run(cli.store.signing_config(), store, &document, out)
        }
        Command::Verify { file, id } => {
            let document = load_document(&file, id)?;
            verify::run(store, &document, out)
        }
        Command::Inspect { id, json } => inspect::run(&store, &DocumentId::new(id)?, json, out),
        Command::List => inspect::list(&store, out),
    }
}

/// Read the document from disk; the id defaults to the file name
fn load_document(path: &Path, id: Option<String>) -> anyhow::Result<Document> {
    let id = match id {
        Some(id) => id,
        None => path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .with_context(|| format!("cannot derive a document id from {}", path.display()))?,
    };
    let content = std::fs::read(path)
        .map_err(SignError::HashComputation)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Document::new(DocumentId::new(id)?, content))
}
