//! Definition kinds of the config archive
//!
//! Each kind pairs a template property map with the handful of opcodes whose
//! payloads are lists or arrays and so live in the kind's inline fields.

mod identikit;
mod item;
mod npc;
mod object;
mod sequence;
mod varp;

pub use identikit::{Identikit, IdentikitDefinition, IdentikitInline};
pub use item::{Item, ItemDefinition, ItemInline, OffsetModel, StackVariant};
pub use npc::{MovementAnimations, Npc, NpcDefinition, NpcInline};
pub use object::{Object, ObjectDefinition, ObjectInline, TypedModel};
pub use sequence::{Sequence, SequenceDefinition, SequenceInline};
pub use varp::{Varp, VarpDefinition, VarpInline};

use byteorder::{BigEndian, WriteBytesExt};
use serde::Serialize;

use crate::buffer::{self, Buffer};
use crate::error::{ConfigError, Result};
use crate::property::{Opcode, read_optional_short, write_optional_short};

/// Action text the client treats as "no action"
pub const HIDDEN_ACTION: &str = "hidden";

/// Most morphism children a record can carry (count byte plus one)
pub const MAX_MORPHISM_CHILDREN: usize = u8::MAX as usize + 1;

// ============================================================================
// Recolors
// ============================================================================

/// One colour replacement applied to a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Recolor {
    pub original: u16,
    pub replacement: u16,
}

/// `count: u8, count × (original: u16, replacement: u16)`
pub(crate) fn read_recolors(buffer: &mut Buffer<'_>) -> Result<Vec<Recolor>> {
    let count = buffer.read_u8()?;
    (0..count)
        .map(|_| {
            Ok(Recolor {
                original: buffer.read_u16()?,
                replacement: buffer.read_u16()?,
            })
        })
        .collect()
}

/// Write `opcode` and the recolor list, unless it is empty
pub(crate) fn write_recolors(
    buffer: &mut Vec<u8>,
    opcode: Opcode,
    recolors: &[Recolor],
) -> Result<()> {
    if recolors.is_empty() {
        return Ok(());
    }
    buffer.write_u8(opcode)?;
    buffer::write_count(buffer, "recolors", recolors.len())?;
    for recolor in recolors {
        buffer.write_u16::<BigEndian>(recolor.original)?;
        buffer.write_u16::<BigEndian>(recolor.replacement)?;
    }
    Ok(())
}

// ============================================================================
// Model lists
// ============================================================================

/// `count: u8, count × id: u16`
pub(crate) fn read_short_list(buffer: &mut Buffer<'_>) -> Result<Vec<u16>> {
    let count = buffer.read_u8()?;
    (0..count).map(|_| buffer.read_u16()).collect()
}

/// Write `opcode` and the id list, unless it is empty
pub(crate) fn write_short_list(
    buffer: &mut Vec<u8>,
    opcode: Opcode,
    what: &'static str,
    ids: &[u16],
) -> Result<()> {
    if ids.is_empty() {
        return Ok(());
    }
    buffer.write_u8(opcode)?;
    buffer::write_count(buffer, what, ids.len())?;
    for &id in ids {
        buffer.write_u16::<BigEndian>(id)?;
    }
    Ok(())
}

// ============================================================================
// Actions
// ============================================================================

/// Read an action string; the hidden placeholder reads as no action
pub(crate) fn read_action(buffer: &mut Buffer<'_>) -> Result<Option<String>> {
    let action = buffer.read_string()?;
    Ok((!action.eq_ignore_ascii_case(HIDDEN_ACTION)).then_some(action))
}

/// Write each set action as `first_opcode + slot, string`
pub(crate) fn write_actions(
    buffer: &mut Vec<u8>,
    first_opcode: Opcode,
    actions: &[Option<String>],
) -> Result<()> {
    for (opcode, action) in (first_opcode..).zip(actions) {
        if let Some(action) = action {
            buffer.write_u8(opcode)?;
            buffer::write_string(buffer, action)?;
        }
    }
    Ok(())
}

/// Store a slot opcode's value, returning whether `opcode` was in range
pub(crate) fn read_slot<T>(
    slots: &mut [Option<T>],
    first_opcode: Opcode,
    opcode: Opcode,
    read: impl FnOnce() -> Result<T>,
) -> Result<bool> {
    let Some(slot) = opcode
        .checked_sub(first_opcode)
        .and_then(|index| slots.get_mut(usize::from(index)))
    else {
        return Ok(false);
    };
    *slot = Some(read()?);
    Ok(true)
}

// ============================================================================
// Morphism
// ============================================================================

/// Transformation of an entity driven by a varbit or varp
///
/// The client picks `children[value]`, falling back to the last child when
/// the value is out of range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Morphism {
    pub varbit: Option<u16>,
    pub varp: Option<u16>,
    pub children: Vec<Option<u16>>,
}

impl Morphism {
    /// `varbit: u16, varp: u16, count: u8, (count + 1) × child: u16`
    ///
    /// 65535 in any position means "none".
    pub fn decode(buffer: &mut Buffer<'_>) -> Result<Morphism> {
        let varbit = read_optional_short(buffer)?;
        let varp = read_optional_short(buffer)?;
        let count = usize::from(buffer.read_u8()?) + 1;
        let children = (0..count)
            .map(|_| read_optional_short(buffer))
            .collect::<Result<_>>()?;

        Ok(Morphism {
            varbit,
            varp,
            children,
        })
    }

    pub fn encode(&self, buffer: &mut Vec<u8>) -> Result<()> {
        let count = self
            .children
            .len()
            .checked_sub(1)
            .and_then(|count| u8::try_from(count).ok())
            .ok_or(ConfigError::OutOfRange {
                what: "morphism children",
                value: self.children.len() as i64,
                min: 1,
                max: MAX_MORPHISM_CHILDREN as i64,
            })?;

        write_optional_short(buffer, self.varbit)?;
        write_optional_short(buffer, self.varp)?;
        buffer.write_u8(count)?;
        for &child in &self.children {
            write_optional_short(buffer, child)?;
        }
        Ok(())
    }
}

pub(crate) fn write_morphism(
    buffer: &mut Vec<u8>,
    opcode: Opcode,
    morphism: Option<&Morphism>,
) -> Result<()> {
    if let Some(morphism) = morphism {
        buffer.write_u8(opcode)?;
        morphism.encode(buffer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recolors_roundtrip() {
        let data = [2, 0x00, 0x01, 0x00, 0x02, 0x12, 0x34, 0x56, 0x78];
        let mut buffer = Buffer::new(&data);
        let recolors = read_recolors(&mut buffer).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(
            recolors[1],
            Recolor {
                original: 0x1234,
                replacement: 0x5678
            }
        );

        let mut out = Vec::new();
        write_recolors(&mut out, 40, &recolors).unwrap();
        assert_eq!(out[0], 40);
        assert_eq!(&out[1..], &data);
    }

    #[test]
    fn test_empty_lists_are_not_written() {
        let mut out = Vec::new();
        write_recolors(&mut out, 40, &[]).unwrap();
        write_short_list(&mut out, 1, "models", &[]).unwrap();
        write_actions(&mut out, 30, &[None, None]).unwrap();
        write_morphism(&mut out, 106, None).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_hidden_action_reads_as_none() {
        let data = b"Hidden\nTake\n";
        let mut buffer = Buffer::new(data);
        assert_eq!(read_action(&mut buffer).unwrap(), None);
        assert_eq!(read_action(&mut buffer).unwrap().as_deref(), Some("Take"));
    }

    #[test]
    fn test_actions_keep_their_slot() {
        let actions = [None, Some("Wield".to_string()), None];
        let mut out = Vec::new();
        write_actions(&mut out, 35, &actions).unwrap();
        assert_eq!(out, b"\x24Wield\n");
    }

    #[test]
    fn test_read_slot_bounds() {
        let mut slots: [Option<u8>; 3] = [None; 3];
        assert!(read_slot(&mut slots, 40, 42, || Ok(7)).unwrap());
        assert!(!read_slot(&mut slots, 40, 43, || Ok(8)).unwrap());
        assert!(!read_slot(&mut slots, 40, 39, || Ok(9)).unwrap());
        assert_eq!(slots, [None, None, Some(7)]);
    }

    #[test]
    fn test_morphism_decode() {
        let data = [
            0xFF, 0xFF, // no varbit
            0x01, 0x2C, // varp 300
            1,    // two children
            0x00, 0x10, 0xFF, 0xFF,
        ];
        let mut buffer = Buffer::new(&data);
        let morphism = Morphism::decode(&mut buffer).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(morphism.varbit, None);
        assert_eq!(morphism.varp, Some(300));
        assert_eq!(morphism.children, [Some(16), None]);

        let mut out = Vec::new();
        morphism.encode(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_morphism_rejects_sentinel_child() {
        let morphism = Morphism {
            varbit: None,
            varp: Some(300),
            children: vec![Some(16), Some(65535)],
        };
        assert!(matches!(
            morphism.encode(&mut Vec::new()),
            Err(ConfigError::OutOfRange {
                what: "optional id",
                ..
            })
        ));
    }

    #[test]
    fn test_morphism_without_children_rejected() {
        let morphism = Morphism {
            varbit: Some(1),
            varp: None,
            children: Vec::new(),
        };
        assert!(matches!(
            morphism.encode(&mut Vec::new()),
            Err(ConfigError::OutOfRange { value: 0, .. })
        ));
    }
}
