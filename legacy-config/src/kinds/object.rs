//! Map object (loc) definitions

use byteorder::{BigEndian, WriteBytesExt};
use serde::Serialize;

use super::{
    read_action, read_recolors, read_short_list, write_actions, write_morphism, write_recolors,
    write_short_list, Morphism, Recolor,
};
use crate::buffer::{self, Buffer};
use crate::definition::{Definition, DefinitionKind};
use crate::error::Result;
use crate::property::{ConfigProperty, ConfigPropertyMap, ObjectProperty, Opcode};

/// Object definition kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Object;

pub type ObjectDefinition = Definition<Object>;

/// Model used for one placement type (wall, corner, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypedModel {
    pub model: u16,
    pub placement: u8,
}

pub const ACTION_SLOTS: usize = 9;

const TYPED_MODELS: Opcode = 1;
const MODELS: Opcode = 5;
const FIRST_ACTION: Opcode = 30;
const RECOLORS: Opcode = 40;
const MORPHISM: Opcode = 77;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectInline {
    pub typed_models: Vec<TypedModel>,
    pub models: Vec<u16>,
    pub actions: [Option<String>; ACTION_SLOTS],
    pub recolors: Vec<Recolor>,
    pub morphism: Option<Morphism>,
}

impl DefinitionKind for Object {
    const ENTRY_NAME: &'static str = "loc";

    type Inline = ObjectInline;

    fn template() -> Result<ConfigPropertyMap> {
        use ObjectProperty::*;

        ConfigPropertyMap::from_properties([
            (2, ConfigProperty::string(Name, "null").boxed()),
            (3, ConfigProperty::string(Description, "").boxed()),
            (14, ConfigProperty::unsigned_byte(Width, 1).boxed()),
            (15, ConfigProperty::unsigned_byte(Length, 1).boxed()),
            (17, ConfigProperty::flag(Solid, true).boxed()),
            (18, ConfigProperty::flag(Impenetrable, true).boxed()),
            (19, ConfigProperty::boolean_byte(Interactive, false).boxed()),
            (21, ConfigProperty::flag(ContourGround, false).boxed()),
            (22, ConfigProperty::flag(DelayShading, false).boxed()),
            (23, ConfigProperty::flag(Occludes, false).boxed()),
            (24, ConfigProperty::optional_short(Animation).boxed()),
            (28, ConfigProperty::unsigned_byte(DecorDisplacement, 16).boxed()),
            (29, ConfigProperty::signed_byte(AmbientLighting, 0).boxed()),
            (39, ConfigProperty::signed_byte(LightDiffusion, 0).boxed()),
            (60, ConfigProperty::optional_short(MinimapFunction).boxed()),
            (62, ConfigProperty::flag(Inverted, false).boxed()),
            (64, ConfigProperty::flag(CastsShadow, true).boxed()),
            (65, ConfigProperty::unsigned_short(ScaleX, 128).boxed()),
            (66, ConfigProperty::unsigned_short(ScaleY, 128).boxed()),
            (67, ConfigProperty::unsigned_short(ScaleZ, 128).boxed()),
            (68, ConfigProperty::optional_short(MapScene).boxed()),
            (69, ConfigProperty::unsigned_byte(Surroundings, 0).boxed()),
            (70, ConfigProperty::signed_short(TranslateX, 0).boxed()),
            (71, ConfigProperty::signed_short(TranslateY, 0).boxed()),
            (72, ConfigProperty::signed_short(TranslateZ, 0).boxed()),
            (73, ConfigProperty::flag(ObstructsGround, false).boxed()),
            (74, ConfigProperty::flag(Hollow, false).boxed()),
            (75, ConfigProperty::unsigned_byte(SupportsItems, 0).boxed()),
        ])
    }

    fn decode_inline(
        inline: &mut ObjectInline,
        opcode: Opcode,
        buffer: &mut Buffer<'_>,
    ) -> Result<bool> {
        match opcode {
            TYPED_MODELS => {
                let count = buffer.read_u8()?;
                inline.typed_models = (0..count)
                    .map(|_| {
                        Ok(TypedModel {
                            model: buffer.read_u16()?,
                            placement: buffer.read_u8()?,
                        })
                    })
                    .collect::<Result<_>>()?;
            }
            MODELS => inline.models = read_short_list(buffer)?,
            30..=38 => {
                inline.actions[usize::from(opcode - FIRST_ACTION)] = read_action(buffer)?;
            }
            RECOLORS => inline.recolors = read_recolors(buffer)?,
            MORPHISM => inline.morphism = Some(Morphism::decode(buffer)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn encode_inline(inline: &ObjectInline, buffer: &mut Vec<u8>) -> Result<()> {
        if !inline.typed_models.is_empty() {
            buffer.write_u8(TYPED_MODELS)?;
            buffer::write_count(buffer, "typed models", inline.typed_models.len())?;
            for typed in &inline.typed_models {
                buffer.write_u16::<BigEndian>(typed.model)?;
                buffer.write_u8(typed.placement)?;
            }
        }
        write_short_list(buffer, MODELS, "object models", &inline.models)?;
        write_actions(buffer, FIRST_ACTION, &inline.actions)?;
        write_recolors(buffer, RECOLORS, &inline.recolors)?;
        write_morphism(buffer, MORPHISM, inline.morphism.as_ref())
    }
}

impl ObjectDefinition {
    pub fn name(&self) -> &str {
        self.str_or(ObjectProperty::Name, "null")
    }

    pub fn description(&self) -> &str {
        self.str_or(ObjectProperty::Description, "")
    }

    pub fn width(&self) -> u8 {
        self.value_or(ObjectProperty::Width, 1)
    }

    pub fn length(&self) -> u8 {
        self.value_or(ObjectProperty::Length, 1)
    }

    pub fn solid(&self) -> bool {
        self.value_or(ObjectProperty::Solid, true)
    }

    pub fn impenetrable(&self) -> bool {
        self.value_or(ObjectProperty::Impenetrable, true)
    }

    /// Whether the object has a right-click menu
    ///
    /// Without an explicit byte this falls back to having untyped models, a
    /// first typed model with the default placement, or any action.
    pub fn interactive(&self) -> bool {
        if let Some(&interactive) = self.present::<bool>(ObjectProperty::Interactive) {
            return interactive;
        }
        let inline = self.inline();
        let default_placement = inline
            .typed_models
            .first()
            .is_some_and(|typed| typed.placement == 10)
            || !inline.models.is_empty();
        default_placement || inline.actions.iter().any(Option::is_some)
    }

    pub fn animation(&self) -> Option<u16> {
        self.value_or(ObjectProperty::Animation, None)
    }

    pub fn casts_shadow(&self) -> bool {
        self.value_or(ObjectProperty::CastsShadow, true)
    }

    pub fn actions(&self) -> &[Option<String>] {
        &self.inline().actions
    }

    pub fn morphism(&self) -> Option<&Morphism> {
        self.inline().morphism.as_ref()
    }
}
