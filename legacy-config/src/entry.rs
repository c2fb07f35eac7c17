//! Config archive entries (`<name>.dat` plus `<name>.idx`)
//!
//! ```text
//! .dat: count: u16, count × record
//! .idx: count: u16, count × record length: u16
//! ```
//!
//! Records are laid out back to back from offset 2 of the `.dat`, so the
//! index is enough to find every record without decoding the ones before it.

use byteorder::{BigEndian, WriteBytesExt};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::buffer::Buffer;
use crate::definition::{Definition, DefinitionDecoder, DefinitionKind};
use crate::error::{ConfigError, Result};

/// Byte offset of the first record in a `.dat`
pub const DAT_HEADER_LEN: usize = 2;

/// A re-encoded entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedEntry {
    pub dat: Vec<u8>,
    pub idx: Vec<u8>,
}

/// Decode every record of a `.dat` in order
///
/// Record ids are their positions. Bytes after the last record are ignored.
pub fn decode_entry<K: DefinitionKind>(
    decoder: &DefinitionDecoder<K>,
    dat: &[u8],
) -> Result<Vec<Definition<K>>> {
    let mut buffer = Buffer::new(dat);
    let count = buffer.read_u16()?;

    let definitions = (0..u32::from(count))
        .map(|id| decoder.decode(id, &mut buffer))
        .collect::<Result<Vec<_>>>()?;

    if !buffer.is_empty() {
        warn!(
            kind = K::ENTRY_NAME,
            trailing = buffer.remaining(),
            "ignoring trailing bytes after last definition"
        );
    }
    debug!(kind = K::ENTRY_NAME, count, "decoded entry");
    Ok(definitions)
}

/// Read the record lengths from an `.idx`
pub fn read_index(idx: &[u8]) -> Result<Vec<u16>> {
    let mut buffer = Buffer::new(idx);
    let count = buffer.read_u16()?;
    (0..count).map(|_| buffer.read_u16()).collect()
}

/// Decode every record of a `.dat` in parallel, using its `.idx`
///
/// Each record must end exactly where the index says it does.
pub fn decode_indexed<K: DefinitionKind>(
    decoder: &DefinitionDecoder<K>,
    dat: &[u8],
    idx: &[u8],
) -> Result<Vec<Definition<K>>> {
    let lengths = read_index(idx)?;

    let declared = Buffer::new(dat).read_u16()?;
    if usize::from(declared) != lengths.len() {
        warn!(
            kind = K::ENTRY_NAME,
            dat = declared,
            idx = lengths.len(),
            "entry and index counts differ, using the index"
        );
    }

    let mut ranges = Vec::with_capacity(lengths.len());
    let mut offset = DAT_HEADER_LEN;
    for &length in &lengths {
        let end = offset + usize::from(length);
        ranges.push(offset..end);
        offset = end;
    }

    let definitions = ranges
        .into_par_iter()
        .enumerate()
        .map(|(id, range)| {
            let id = id as u32;
            let record = dat.get(range.clone()).ok_or(ConfigError::BufferUnderrun {
                offset: range.start,
                needed: range.len(),
                remaining: dat.len().saturating_sub(range.start),
            })?;

            let mut buffer = Buffer::new(record);
            let definition = decoder.decode(id, &mut buffer)?;
            if !buffer.is_empty() {
                return Err(ConfigError::LengthMismatch {
                    id,
                    expected: record.len(),
                    consumed: buffer.position(),
                });
            }
            Ok(definition)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(kind = K::ENTRY_NAME, count = definitions.len(), "decoded indexed entry");
    Ok(definitions)
}

/// Encode definitions as a `.dat` and matching `.idx`
///
/// Definitions are written in slice order; their ids are not stored.
pub fn encode_entry<K: DefinitionKind>(definitions: &[Definition<K>]) -> Result<EncodedEntry> {
    let count = u16::try_from(definitions.len()).map_err(|_| ConfigError::TooManyElements {
        what: "entry definitions",
        count: definitions.len(),
        max: usize::from(u16::MAX),
    })?;

    let mut entry = EncodedEntry::default();
    entry.dat.write_u16::<BigEndian>(count)?;
    entry.idx.write_u16::<BigEndian>(count)?;

    for definition in definitions {
        let start = entry.dat.len();
        definition.encode_into(&mut entry.dat)?;
        let length = entry.dat.len() - start;

        let length = u16::try_from(length).map_err(|_| ConfigError::OutOfRange {
            what: "encoded definition length",
            value: length as i64,
            min: 0,
            max: i64::from(u16::MAX),
        })?;
        entry.idx.write_u16::<BigEndian>(length)?;
    }

    debug!(
        kind = K::ENTRY_NAME,
        count,
        bytes = entry.dat.len(),
        "encoded entry"
    );
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::Varp;

    fn decoder() -> DefinitionDecoder<Varp> {
        DefinitionDecoder::new().unwrap()
    }

    // Three varps: parameter 42, nothing, discarded opcode then parameter 7
    const DAT: [u8; 13] = [0, 3, 5, 0x00, 0x2A, 0, 0, 1, 9, 5, 0x00, 0x07, 0];
    const IDX: [u8; 8] = [0, 3, 0, 4, 0, 1, 0, 6];

    #[test]
    fn test_decode_entry() {
        let varps = decode_entry(&decoder(), &DAT).unwrap();
        assert_eq!(varps.len(), 3);
        assert_eq!(varps[0].parameter(), Some(42));
        assert_eq!(varps[1].parameter(), None);
        assert_eq!(varps[2].parameter(), Some(7));
        assert_eq!(varps[2].id(), 2);
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut dat = DAT.to_vec();
        dat.extend_from_slice(&[0xDE, 0xAD]);
        assert_eq!(decode_entry(&decoder(), &dat).unwrap().len(), 3);
    }

    #[test]
    fn test_indexed_matches_sequential() {
        let sequential = decode_entry(&decoder(), &DAT).unwrap();
        let indexed = decode_indexed(&decoder(), &DAT, &IDX).unwrap();
        assert_eq!(indexed, sequential);
    }

    #[test]
    fn test_read_index() {
        assert_eq!(read_index(&IDX).unwrap(), [4, 1, 6]);
        assert!(read_index(&[0, 2, 0, 4]).is_err());
    }

    #[test]
    fn test_index_length_mismatch() {
        // Second record declared one byte longer than it decodes
        let idx = [0, 2, 0, 4, 0, 2];
        let dat = [0, 2, 5, 0x00, 0x2A, 0, 0, 0];
        assert!(matches!(
            decode_indexed(&decoder(), &dat, &idx),
            Err(ConfigError::LengthMismatch {
                id: 1,
                expected: 2,
                consumed: 1
            })
        ));
    }

    #[test]
    fn test_index_past_end_of_dat() {
        let idx = [0, 1, 0, 9];
        assert!(matches!(
            decode_indexed(&decoder(), &DAT[..6], &idx),
            Err(ConfigError::BufferUnderrun { offset: 2, .. })
        ));
    }

    #[test]
    fn test_encode_entry_roundtrip() {
        let varps = decode_entry(&decoder(), &DAT).unwrap();
        let encoded = encode_entry(&varps).unwrap();

        // The discarded opcode is gone from the third record
        assert_eq!(encoded.dat, [0, 3, 5, 0x00, 0x2A, 0, 0, 5, 0x00, 0x07, 0]);
        assert_eq!(encoded.idx, [0, 3, 0, 4, 0, 1, 0, 4]);
        assert_eq!(
            decode_indexed(&decoder(), &encoded.dat, &encoded.idx).unwrap(),
            varps
        );
    }

    #[test]
    fn test_empty_entry() {
        let encoded = encode_entry::<Varp>(&[]).unwrap();
        assert_eq!(encoded.dat, [0, 0]);
        assert!(decode_entry(&decoder(), &encoded.dat).unwrap().is_empty());
        assert!(decode_indexed(&decoder(), &encoded.dat, &encoded.idx)
            .unwrap()
            .is_empty());
    }
}
