//! Identikit (idk) definitions: the body pieces a player's look is built from

use byteorder::{BigEndian, WriteBytesExt};
use serde::Serialize;

use super::{read_short_list, read_slot, write_short_list};
use crate::buffer::Buffer;
use crate::definition::{Definition, DefinitionKind};
use crate::error::Result;
use crate::part::Part;
use crate::property::{ConfigProperty, ConfigPropertyMap, IdentikitProperty, Opcode};

/// Identikit definition kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identikit;

pub type IdentikitDefinition = Definition<Identikit>;

pub const COLOUR_SLOTS: usize = 10;
pub const HEAD_MODEL_SLOTS: usize = 10;

const BODY_MODELS: Opcode = 2;
const FIRST_ORIGINAL_COLOUR: Opcode = 40;
const FIRST_REPLACEMENT_COLOUR: Opcode = 50;
const FIRST_HEAD_MODEL: Opcode = 60;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentikitInline {
    pub body_models: Vec<u16>,
    pub original_colours: [Option<u16>; COLOUR_SLOTS],
    pub replacement_colours: [Option<u16>; COLOUR_SLOTS],
    pub head_models: [Option<u16>; HEAD_MODEL_SLOTS],
}

impl DefinitionKind for Identikit {
    const ENTRY_NAME: &'static str = "idk";

    type Inline = IdentikitInline;

    fn template() -> Result<ConfigPropertyMap> {
        ConfigPropertyMap::from_properties([
            (
                1,
                ConfigProperty::new(IdentikitProperty::Part, Part::None, Part::decode, Part::encode)
                    .boxed(),
            ),
            (
                3,
                ConfigProperty::flag(IdentikitProperty::NonSelectable, false).boxed(),
            ),
        ])
    }

    fn decode_inline(
        inline: &mut IdentikitInline,
        opcode: Opcode,
        buffer: &mut Buffer<'_>,
    ) -> Result<bool> {
        let (slots, first_opcode) = match opcode {
            BODY_MODELS => {
                inline.body_models = read_short_list(buffer)?;
                return Ok(true);
            }
            40..=49 => (&mut inline.original_colours, FIRST_ORIGINAL_COLOUR),
            50..=59 => (&mut inline.replacement_colours, FIRST_REPLACEMENT_COLOUR),
            60..=69 => (&mut inline.head_models, FIRST_HEAD_MODEL),
            _ => return Ok(false),
        };
        read_slot(slots, first_opcode, opcode, || buffer.read_u16())
    }

    fn encode_inline(inline: &IdentikitInline, buffer: &mut Vec<u8>) -> Result<()> {
        write_short_list(buffer, BODY_MODELS, "body models", &inline.body_models)?;

        for (first_opcode, slots) in [
            (FIRST_ORIGINAL_COLOUR, &inline.original_colours),
            (FIRST_REPLACEMENT_COLOUR, &inline.replacement_colours),
            (FIRST_HEAD_MODEL, &inline.head_models),
        ] {
            for (opcode, value) in (first_opcode..).zip(slots) {
                if let Some(value) = value {
                    buffer.write_u8(opcode)?;
                    buffer.write_u16::<BigEndian>(*value)?;
                }
            }
        }
        Ok(())
    }
}

impl IdentikitDefinition {
    pub fn part(&self) -> Part {
        self.value_or(IdentikitProperty::Part, Part::None)
    }

    /// Whether the piece is hidden from the character designer
    pub fn non_selectable(&self) -> bool {
        self.value_or(IdentikitProperty::NonSelectable, false)
    }

    pub fn body_models(&self) -> &[u16] {
        &self.inline().body_models
    }

    /// Set head models, in slot order
    pub fn head_models(&self) -> impl Iterator<Item = u16> + '_ {
        self.inline().head_models.iter().flatten().copied()
    }
}
