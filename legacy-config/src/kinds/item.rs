//! Item (obj) definitions

use byteorder::{BigEndian, WriteBytesExt};
use serde::Serialize;

use super::{read_action, read_recolors, read_slot, write_actions, write_recolors, Recolor};
use crate::buffer::Buffer;
use crate::definition::{Definition, DefinitionKind};
use crate::error::Result;
use crate::property::{ConfigProperty, ConfigPropertyMap, ItemProperty, Opcode};

/// Item definition kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item;

pub type ItemDefinition = Definition<Item>;

/// Worn model with a vertical offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct OffsetModel {
    pub model: u16,
    pub offset: i8,
}

impl OffsetModel {
    pub fn decode(buffer: &mut Buffer<'_>) -> Result<OffsetModel> {
        Ok(OffsetModel {
            model: buffer.read_u16()?,
            offset: buffer.read_i8()?,
        })
    }

    pub fn encode(buffer: &mut Vec<u8>, model: &OffsetModel) -> Result<()> {
        buffer.write_u16::<BigEndian>(model.model)?;
        buffer.write_i8(model.offset)?;
        Ok(())
    }
}

/// Item shown once a stack reaches `amount`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StackVariant {
    pub id: u16,
    pub amount: u16,
}

pub const GROUND_ACTION_SLOTS: usize = 5;
pub const INVENTORY_ACTION_SLOTS: usize = 5;
pub const STACK_VARIANT_SLOTS: usize = 10;

const FIRST_GROUND_ACTION: Opcode = 30;
const FIRST_INVENTORY_ACTION: Opcode = 35;
const RECOLORS: Opcode = 40;
const FIRST_STACK_VARIANT: Opcode = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemInline {
    pub ground_actions: [Option<String>; GROUND_ACTION_SLOTS],
    pub inventory_actions: [Option<String>; INVENTORY_ACTION_SLOTS],
    pub recolors: Vec<Recolor>,
    pub stack_variants: [Option<StackVariant>; STACK_VARIANT_SLOTS],
}

impl DefinitionKind for Item {
    const ENTRY_NAME: &'static str = "obj";

    type Inline = ItemInline;

    fn template() -> Result<ConfigPropertyMap> {
        use ItemProperty::*;

        let offset_model = |ty: ItemProperty| {
            ConfigProperty::new(
                ty,
                OffsetModel::default(),
                OffsetModel::decode,
                OffsetModel::encode,
            )
            .boxed()
        };

        ConfigPropertyMap::from_properties([
            (1, ConfigProperty::unsigned_short(Model, 0).boxed()),
            (2, ConfigProperty::string(Name, "null").boxed()),
            (3, ConfigProperty::string(Description, "").boxed()),
            (4, ConfigProperty::unsigned_short(SpriteZoom, 2000).boxed()),
            (5, ConfigProperty::unsigned_short(SpritePitch, 0).boxed()),
            (6, ConfigProperty::unsigned_short(SpriteRoll, 0).boxed()),
            (7, ConfigProperty::signed_short(SpriteTranslateX, 0).boxed()),
            (8, ConfigProperty::signed_short(SpriteTranslateY, 0).boxed()),
            (11, ConfigProperty::flag(Stackable, false).boxed()),
            (12, ConfigProperty::int(Value, 1).boxed()),
            (16, ConfigProperty::flag(Members, false).boxed()),
            (23, offset_model(PrimaryMaleModel)),
            (24, ConfigProperty::unsigned_short(SecondaryMaleModel, 0).boxed()),
            (25, offset_model(PrimaryFemaleModel)),
            (26, ConfigProperty::unsigned_short(SecondaryFemaleModel, 0).boxed()),
            (78, ConfigProperty::unsigned_short(TertiaryMaleModel, 0).boxed()),
            (79, ConfigProperty::unsigned_short(TertiaryFemaleModel, 0).boxed()),
            (90, ConfigProperty::unsigned_short(PrimaryMaleHeadModel, 0).boxed()),
            (91, ConfigProperty::unsigned_short(PrimaryFemaleHeadModel, 0).boxed()),
            (92, ConfigProperty::unsigned_short(SecondaryMaleHeadModel, 0).boxed()),
            (93, ConfigProperty::unsigned_short(SecondaryFemaleHeadModel, 0).boxed()),
            (95, ConfigProperty::unsigned_short(SpriteYaw, 0).boxed()),
            (97, ConfigProperty::unsigned_short(NoteInfoId, 0).boxed()),
            (98, ConfigProperty::unsigned_short(NoteTemplateId, 0).boxed()),
            (110, ConfigProperty::unsigned_short(GroundScaleX, 128).boxed()),
            (111, ConfigProperty::unsigned_short(GroundScaleY, 128).boxed()),
            (112, ConfigProperty::unsigned_short(GroundScaleZ, 128).boxed()),
            (113, ConfigProperty::signed_byte(AmbientLight, 0).boxed()),
            (114, ConfigProperty::signed_byte(Contrast, 0).boxed()),
            (115, ConfigProperty::unsigned_byte(Team, 0).boxed()),
        ])
    }

    fn decode_inline(
        inline: &mut ItemInline,
        opcode: Opcode,
        buffer: &mut Buffer<'_>,
    ) -> Result<bool> {
        match opcode {
            // Unused model field
            10 => buffer.skip(2)?,
            30..=34 => {
                inline.ground_actions[usize::from(opcode - FIRST_GROUND_ACTION)] =
                    read_action(buffer)?;
            }
            35..=39 => {
                inline.inventory_actions[usize::from(opcode - FIRST_INVENTORY_ACTION)] =
                    read_action(buffer)?;
            }
            RECOLORS => inline.recolors = read_recolors(buffer)?,
            _ => {
                return read_slot(&mut inline.stack_variants, FIRST_STACK_VARIANT, opcode, || {
                    Ok(StackVariant {
                        id: buffer.read_u16()?,
                        amount: buffer.read_u16()?,
                    })
                });
            }
        }
        Ok(true)
    }

    fn encode_inline(inline: &ItemInline, buffer: &mut Vec<u8>) -> Result<()> {
        write_actions(buffer, FIRST_GROUND_ACTION, &inline.ground_actions)?;
        write_actions(buffer, FIRST_INVENTORY_ACTION, &inline.inventory_actions)?;
        write_recolors(buffer, RECOLORS, &inline.recolors)?;

        for (opcode, variant) in (FIRST_STACK_VARIANT..).zip(&inline.stack_variants) {
            if let Some(variant) = variant {
                buffer.write_u8(opcode)?;
                buffer.write_u16::<BigEndian>(variant.id)?;
                buffer.write_u16::<BigEndian>(variant.amount)?;
            }
        }
        Ok(())
    }
}

impl ItemDefinition {
    pub fn name(&self) -> &str {
        self.str_or(ItemProperty::Name, "null")
    }

    pub fn description(&self) -> &str {
        self.str_or(ItemProperty::Description, "")
    }

    pub fn model(&self) -> Option<u16> {
        self.present(ItemProperty::Model).copied()
    }

    pub fn stackable(&self) -> bool {
        self.value_or(ItemProperty::Stackable, false)
    }

    pub fn members(&self) -> bool {
        self.value_or(ItemProperty::Members, false)
    }

    /// Shop value in coins
    pub fn value(&self) -> i32 {
        self.value_or(ItemProperty::Value, 1)
    }

    pub fn primary_male_model(&self) -> Option<OffsetModel> {
        self.present(ItemProperty::PrimaryMaleModel).copied()
    }

    pub fn primary_female_model(&self) -> Option<OffsetModel> {
        self.present(ItemProperty::PrimaryFemaleModel).copied()
    }

    /// Item this one is the banknote of
    pub fn note_info_id(&self) -> Option<u16> {
        self.present(ItemProperty::NoteInfoId).copied()
    }

    pub fn note_template_id(&self) -> Option<u16> {
        self.present(ItemProperty::NoteTemplateId).copied()
    }

    /// Whether this is a banknote rather than a real item
    pub fn is_note(&self) -> bool {
        self.note_template_id().is_some()
    }

    pub fn team(&self) -> u8 {
        self.value_or(ItemProperty::Team, 0)
    }

    pub fn ground_actions(&self) -> &[Option<String>] {
        &self.inline().ground_actions
    }

    pub fn inventory_actions(&self) -> &[Option<String>] {
        &self.inline().inventory_actions
    }

    pub fn recolors(&self) -> &[Recolor] {
        &self.inline().recolors
    }

    /// Stack variant shown for `amount`, if any threshold is reached
    pub fn stack_variant(&self, amount: u32) -> Option<u16> {
        self.inline()
            .stack_variants
            .iter()
            .flatten()
            .filter(|variant| variant.amount > 0 && amount >= u32::from(variant.amount))
            .max_by_key(|variant| variant.amount)
            .map(|variant| variant.id)
    }
}
