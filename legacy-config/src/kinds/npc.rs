//! NPC definitions

use byteorder::{BigEndian, WriteBytesExt};
use serde::Serialize;

use super::{
    read_action, read_recolors, read_short_list, write_actions, write_morphism, write_recolors,
    write_short_list, Morphism, Recolor,
};
use crate::buffer::Buffer;
use crate::definition::{Definition, DefinitionKind};
use crate::error::Result;
use crate::property::{ConfigProperty, ConfigPropertyMap, NULL_ID, NpcProperty, Opcode};

/// NPC definition kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Npc;

pub type NpcDefinition = Definition<Npc>;

/// Animations played while moving, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MovementAnimations {
    pub walk: u16,
    pub turn_around: u16,
    pub turn_right: u16,
    pub turn_left: u16,
}

impl Default for MovementAnimations {
    fn default() -> Self {
        Self {
            walk: NULL_ID,
            turn_around: NULL_ID,
            turn_right: NULL_ID,
            turn_left: NULL_ID,
        }
    }
}

impl MovementAnimations {
    pub fn decode(buffer: &mut Buffer<'_>) -> Result<MovementAnimations> {
        Ok(MovementAnimations {
            walk: buffer.read_u16()?,
            turn_around: buffer.read_u16()?,
            turn_right: buffer.read_u16()?,
            turn_left: buffer.read_u16()?,
        })
    }

    pub fn encode(buffer: &mut Vec<u8>, animations: &MovementAnimations) -> Result<()> {
        for id in [
            animations.walk,
            animations.turn_around,
            animations.turn_right,
            animations.turn_left,
        ] {
            buffer.write_u16::<BigEndian>(id)?;
        }
        Ok(())
    }
}

pub const ACTION_SLOTS: usize = 10;

const MODELS: Opcode = 1;
const FIRST_ACTION: Opcode = 30;
const RECOLORS: Opcode = 40;
const HEAD_MODELS: Opcode = 60;
const MORPHISM: Opcode = 106;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NpcInline {
    pub models: Vec<u16>,
    pub actions: [Option<String>; ACTION_SLOTS],
    pub recolors: Vec<Recolor>,
    pub head_models: Vec<u16>,
    pub morphism: Option<Morphism>,
}

impl DefinitionKind for Npc {
    const ENTRY_NAME: &'static str = "npc";

    type Inline = NpcInline;

    fn template() -> Result<ConfigPropertyMap> {
        ConfigPropertyMap::from_properties([
            (2, ConfigProperty::string(NpcProperty::Name, "null").boxed()),
            (3, ConfigProperty::string(NpcProperty::Description, "").boxed()),
            (12, ConfigProperty::unsigned_byte(NpcProperty::Size, 1).boxed()),
            (13, ConfigProperty::optional_short(NpcProperty::IdleAnimation).boxed()),
            (14, ConfigProperty::optional_short(NpcProperty::WalkAnimation).boxed()),
            (
                17,
                ConfigProperty::new(
                    NpcProperty::MovementAnimations,
                    MovementAnimations::default(),
                    MovementAnimations::decode,
                    MovementAnimations::encode,
                )
                .boxed(),
            ),
            (93, ConfigProperty::flag(NpcProperty::MinimapVisible, true).boxed()),
            (95, ConfigProperty::unsigned_short(NpcProperty::CombatLevel, 0).boxed()),
            (97, ConfigProperty::unsigned_short(NpcProperty::FlatScale, 128).boxed()),
            (98, ConfigProperty::unsigned_short(NpcProperty::HeightScale, 128).boxed()),
            (99, ConfigProperty::flag(NpcProperty::PriorityRender, false).boxed()),
            (100, ConfigProperty::signed_byte(NpcProperty::LightModifier, 0).boxed()),
            (101, ConfigProperty::signed_byte(NpcProperty::ShadowModifier, 0).boxed()),
            (102, ConfigProperty::optional_short(NpcProperty::HeadIcon).boxed()),
            (103, ConfigProperty::unsigned_short(NpcProperty::TurnRate, 32).boxed()),
            (107, ConfigProperty::flag(NpcProperty::Clickable, true).boxed()),
        ])
    }

    fn decode_inline(
        inline: &mut NpcInline,
        opcode: Opcode,
        buffer: &mut Buffer<'_>,
    ) -> Result<bool> {
        match opcode {
            MODELS => inline.models = read_short_list(buffer)?,
            30..=39 => {
                inline.actions[usize::from(opcode - FIRST_ACTION)] = read_action(buffer)?;
            }
            RECOLORS => inline.recolors = read_recolors(buffer)?,
            HEAD_MODELS => inline.head_models = read_short_list(buffer)?,
            // Unused client fields
            90..=92 => buffer.skip(2)?,
            MORPHISM => inline.morphism = Some(Morphism::decode(buffer)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn encode_inline(inline: &NpcInline, buffer: &mut Vec<u8>) -> Result<()> {
        write_short_list(buffer, MODELS, "npc models", &inline.models)?;
        write_actions(buffer, FIRST_ACTION, &inline.actions)?;
        write_recolors(buffer, RECOLORS, &inline.recolors)?;
        write_short_list(buffer, HEAD_MODELS, "npc head models", &inline.head_models)?;
        write_morphism(buffer, MORPHISM, inline.morphism.as_ref())
    }
}

impl NpcDefinition {
    pub fn name(&self) -> &str {
        self.str_or(NpcProperty::Name, "null")
    }

    pub fn description(&self) -> &str {
        self.str_or(NpcProperty::Description, "")
    }

    /// Tiles occupied along each side
    pub fn size(&self) -> u8 {
        self.value_or(NpcProperty::Size, 1)
    }

    pub fn combat_level(&self) -> Option<u16> {
        self.present(NpcProperty::CombatLevel).copied()
    }

    pub fn idle_animation(&self) -> Option<u16> {
        self.value_or(NpcProperty::IdleAnimation, None)
    }

    pub fn walk_animation(&self) -> Option<u16> {
        self.value_or(NpcProperty::WalkAnimation, None)
    }

    pub fn movement_animations(&self) -> Option<MovementAnimations> {
        self.present(NpcProperty::MovementAnimations).copied()
    }

    pub fn minimap_visible(&self) -> bool {
        self.value_or(NpcProperty::MinimapVisible, true)
    }

    pub fn clickable(&self) -> bool {
        self.value_or(NpcProperty::Clickable, true)
    }

    pub fn models(&self) -> &[u16] {
        &self.inline().models
    }

    pub fn actions(&self) -> &[Option<String>] {
        &self.inline().actions
    }

    pub fn morphism(&self) -> Option<&Morphism> {
        self.inline().morphism.as_ref()
    }
}
