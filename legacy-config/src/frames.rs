//! Animation frame tables
//!
//! A sequence's frames are three parallel arrays: primary frame id,
//! optional secondary frame id and duration. On the wire:
//!
//! ```text
//! count: u8
//! count × { primary: u16, secondary: u16 (65535 = none), duration: u16 }
//! ```

use byteorder::{BigEndian, WriteBytesExt};
use serde::Serialize;

use crate::buffer::{self, Buffer};
use crate::error::{ConfigError, Result};
use crate::property::NULL_ID;

/// Most frames a collection can hold (count is a single byte)
pub const MAX_FRAMES: usize = u8::MAX as usize;

/// Primary/secondary/duration arrays of an animation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct FrameCollection {
    primaries: Vec<u16>,
    secondaries: Vec<Option<u16>>,
    durations: Vec<u16>,
}

impl FrameCollection {
    /// The empty collection, used as the default
    pub const EMPTY: FrameCollection = FrameCollection {
        primaries: Vec::new(),
        secondaries: Vec::new(),
        durations: Vec::new(),
    };

    /// Create a collection from three equal-length arrays
    ///
    /// A secondary of `Some(65535)` is the wire sentinel and is stored as
    /// `None`.
    pub fn new(
        primaries: Vec<u16>,
        secondaries: Vec<Option<u16>>,
        durations: Vec<u16>,
    ) -> Result<Self> {
        if primaries.len() != secondaries.len() || primaries.len() != durations.len() {
            return Err(ConfigError::FrameLengthMismatch {
                primaries: primaries.len(),
                secondaries: secondaries.len(),
                durations: durations.len(),
            });
        }
        if primaries.len() > MAX_FRAMES {
            return Err(ConfigError::TooManyElements {
                what: "frame collection",
                count: primaries.len(),
                max: MAX_FRAMES,
            });
        }

        let secondaries = secondaries
            .into_iter()
            .map(|id| id.filter(|&id| id != NULL_ID))
            .collect();

        Ok(Self {
            primaries,
            secondaries,
            durations,
        })
    }

    /// Number of frames
    pub fn size(&self) -> usize {
        self.primaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primaries.is_empty()
    }

    pub fn primary(&self, index: usize) -> Option<u16> {
        self.primaries.get(index).copied()
    }

    /// Secondary frame id; `None` if out of bounds or absent
    pub fn secondary(&self, index: usize) -> Option<u16> {
        self.secondaries.get(index).copied().flatten()
    }

    pub fn duration(&self, index: usize) -> Option<u16> {
        self.durations.get(index).copied()
    }

    pub fn primaries(&self) -> &[u16] {
        &self.primaries
    }

    pub fn secondaries(&self) -> &[Option<u16>] {
        &self.secondaries
    }

    pub fn durations(&self) -> &[u16] {
        &self.durations
    }

    /// Sum of all frame durations
    pub fn total_duration(&self) -> u32 {
        self.durations.iter().map(|&d| u32::from(d)).sum()
    }

    /// Encoded size of `collection` in bytes
    pub fn bytes(collection: &FrameCollection) -> usize {
        collection.size() * 3 * std::mem::size_of::<u16>() + 1
    }

    pub fn decode(buffer: &mut Buffer<'_>) -> Result<FrameCollection> {
        let count = usize::from(buffer.read_u8()?);
        let mut primaries = Vec::with_capacity(count);
        let mut secondaries = Vec::with_capacity(count);
        let mut durations = Vec::with_capacity(count);

        for _ in 0..count {
            primaries.push(buffer.read_u16()?);
            let secondary = buffer.read_u16()?;
            secondaries.push((secondary != NULL_ID).then_some(secondary));
            durations.push(buffer.read_u16()?);
        }

        Ok(FrameCollection {
            primaries,
            secondaries,
            durations,
        })
    }

    pub fn encode(buffer: &mut Vec<u8>, collection: &FrameCollection) -> Result<()> {
        buffer::write_count(buffer, "frame collection", collection.size())?;

        for index in 0..collection.size() {
            buffer.write_u16::<BigEndian>(collection.primaries[index])?;
            buffer.write_u16::<BigEndian>(collection.secondaries[index].unwrap_or(NULL_ID))?;
            buffer.write_u16::<BigEndian>(collection.durations[index])?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample() -> FrameCollection {
        FrameCollection::new(
            vec![10, 11, 12],
            vec![Some(400), None, Some(0)],
            vec![4, 5, 6],
        )
        .unwrap()
    }

    #[test]
    fn test_decode_wire_layout() {
        let data = [
            2, // count
            0x00, 0x0A, 0xFF, 0xFF, 0x00, 0x03, // frame 0: no secondary
            0x00, 0x0B, 0x01, 0x90, 0x00, 0x05, // frame 1: secondary 400
        ];
        let mut buffer = Buffer::new(&data);
        let frames = FrameCollection::decode(&mut buffer).unwrap();

        assert_eq!(frames.size(), 2);
        assert_eq!(frames.primaries(), &[10, 11]);
        assert_eq!(frames.secondary(0), None);
        assert_eq!(frames.secondary(1), Some(400));
        assert_eq!(frames.durations(), &[3, 5]);
        assert_eq!(frames.total_duration(), 8);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let frames = sample();
        let mut out = Vec::new();
        FrameCollection::encode(&mut out, &frames).unwrap();
        assert_eq!(out.len(), FrameCollection::bytes(&frames));
        assert_eq!(out.len(), 19);

        let decoded = FrameCollection::decode(&mut Buffer::new(&out)).unwrap();
        assert_eq!(decoded, frames);
    }

    #[test]
    fn test_sentinel_secondary_roundtrips() {
        let frames = FrameCollection::new(vec![1], vec![Some(NULL_ID)], vec![2]).unwrap();
        assert_eq!(frames.secondary(0), None);

        let mut out = Vec::new();
        FrameCollection::encode(&mut out, &frames).unwrap();
        assert_eq!(&out[3..5], &[0xFF, 0xFF]);
        assert_eq!(FrameCollection::decode(&mut Buffer::new(&out)).unwrap(), frames);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = FrameCollection::new(vec![1, 2], vec![None], vec![1, 2]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::FrameLengthMismatch {
                primaries: 2,
                secondaries: 1,
                durations: 2
            }
        ));
        assert!(FrameCollection::new(vec![1], vec![None], vec![]).is_err());
    }

    #[test]
    fn test_too_many_frames_rejected() {
        let n = MAX_FRAMES + 1;
        let err = FrameCollection::new(vec![0; n], vec![None; n], vec![0; n]).unwrap_err();
        assert!(matches!(err, ConfigError::TooManyElements { count: 256, .. }));
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(FrameCollection::EMPTY.size(), 0);
        assert_eq!(FrameCollection::bytes(&FrameCollection::EMPTY), 1);
        assert_eq!(FrameCollection::EMPTY, FrameCollection::default());

        let mut out = Vec::new();
        FrameCollection::encode(&mut out, &FrameCollection::EMPTY).unwrap();
        assert_eq!(out, [0]);
    }

    #[test]
    fn test_truncated_frames_fail() {
        let data = [2, 0x00, 0x0A, 0xFF, 0xFF, 0x00, 0x03, 0x00];
        assert!(matches!(
            FrameCollection::decode(&mut Buffer::new(&data)),
            Err(ConfigError::BufferUnderrun { offset: 7, .. })
        ));
    }

    #[test]
    fn test_equal_collections_hash_together() {
        let mut set = HashSet::new();
        set.insert(sample());
        set.insert(sample());
        set.insert(FrameCollection::EMPTY);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let frames = sample();
        assert_eq!(frames.primary(3), None);
        assert_eq!(frames.duration(3), None);
        assert_eq!(frames.secondary(3), None);
    }
}
