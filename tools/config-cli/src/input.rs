//! Loading entries from disk

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use legacy_config::{Definition, DefinitionDecoder, DefinitionKind, decode_entry, decode_indexed};

/// An entry's `.dat` and optional `.idx` on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFiles {
    pub dat: PathBuf,
    pub index: Option<PathBuf>,
}

impl EntryFiles {
    pub fn new(dat: impl Into<PathBuf>, index: Option<PathBuf>) -> Self {
        Self {
            dat: dat.into(),
            index,
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))
}

/// Decode every definition of an entry
///
/// With an index and `parallel` set, records are decoded in parallel and
/// each is checked against its indexed length; otherwise the `.dat` is read
/// front to back.
pub fn load_definitions<K: DefinitionKind>(
    files: &EntryFiles,
    parallel: bool,
) -> Result<Vec<Definition<K>>> {
    let decoder = DefinitionDecoder::<K>::new()?;
    let dat = read(&files.dat)?;

    let definitions = match &files.index {
        Some(index) if parallel => {
            let idx = read(index)?;
            decode_indexed(&decoder, &dat, &idx)
        }
        _ => decode_entry(&decoder, &dat),
    }
    .with_context(|| format!("Failed to decode {} entry {:?}", K::ENTRY_NAME, files.dat))?;

    tracing::debug!(
        "Loaded {} {} definitions from {:?}",
        definitions.len(),
        K::ENTRY_NAME,
        files.dat
    );
    Ok(definitions)
}
