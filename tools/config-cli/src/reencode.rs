//! Writing canonical re-encodings of an entry

use std::path::Path;

use anyhow::{Context, Result};
use legacy_config::{
    Definition, DefinitionDecoder, DefinitionKind, EncodedEntry, decode_indexed, encode_entry,
};

/// Encode `definitions` and write the `.dat` (and `.idx`, if requested)
///
/// With `verify` set, the encoded entry is decoded again through its index
/// and must match `definitions` exactly.
pub fn reencode<K: DefinitionKind>(
    definitions: &[Definition<K>],
    dat_out: &Path,
    index_out: Option<&Path>,
    verify: bool,
) -> Result<EncodedEntry> {
    let encoded = encode_entry(definitions)
        .with_context(|| format!("Failed to encode {} entry", K::ENTRY_NAME))?;

    if verify {
        verify_entry(definitions, &encoded)?;
    }

    std::fs::write(dat_out, &encoded.dat)
        .with_context(|| format!("Failed to write {:?}", dat_out))?;
    if let Some(index_out) = index_out {
        std::fs::write(index_out, &encoded.idx)
            .with_context(|| format!("Failed to write {:?}", index_out))?;
    }

    tracing::info!(
        "Wrote {} {} definitions ({} bytes) to {:?}",
        definitions.len(),
        K::ENTRY_NAME,
        encoded.dat.len(),
        dat_out
    );
    Ok(encoded)
}

/// Decode `encoded` and compare against the definitions it came from
pub fn verify_entry<K: DefinitionKind>(
    definitions: &[Definition<K>],
    encoded: &EncodedEntry,
) -> Result<()> {
    let decoder = DefinitionDecoder::<K>::new()?;
    let decoded = decode_indexed(&decoder, &encoded.dat, &encoded.idx)
        .context("Re-encoded entry failed to decode")?;

    if decoded.len() != definitions.len() {
        anyhow::bail!(
            "Re-encoded entry has {} definitions, expected {}",
            decoded.len(),
            definitions.len()
        );
    }
    if let Some(original) = definitions
        .iter()
        .zip(&decoded)
        .find_map(|(original, decoded)| (original != decoded).then_some(original))
    {
        anyhow::bail!(
            "Re-encoded {} definition {} does not decode to the original",
            K::ENTRY_NAME,
            original.id()
        );
    }

    tracing::debug!("Verified {} re-encoded definitions", decoded.len());
    Ok(())
}
