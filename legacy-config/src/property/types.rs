//! Property type identifiers
//!
//! Every definition kind names its registry fields with its own enum. The
//! enums are gathered under [`PropertyType`] so a single property map can be
//! keyed by type regardless of kind.

use std::fmt;

/// Declares a per-kind property enum with its display names.
macro_rules! property_kind {
    (
        $(#[$meta:meta])*
        $name:ident => $kind:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $label:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
        }

        impl $name {
            /// Every property of this kind, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Field name used in dumps and error messages
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)*
                }
            }
        }

        impl From<$name> for PropertyType {
            fn from(property: $name) -> Self {
                PropertyType::$kind(property)
            }
        }
    };
}

/// A property identifier, tagged with the definition kind it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyType {
    Item(ItemProperty),
    Npc(NpcProperty),
    Object(ObjectProperty),
    Varp(VarpProperty),
    Identikit(IdentikitProperty),
    Sequence(SequenceProperty),
}

impl PropertyType {
    /// Entry name of the kind this property belongs to
    pub fn kind(self) -> &'static str {
        match self {
            PropertyType::Item(_) => "obj",
            PropertyType::Npc(_) => "npc",
            PropertyType::Object(_) => "loc",
            PropertyType::Varp(_) => "varp",
            PropertyType::Identikit(_) => "idk",
            PropertyType::Sequence(_) => "seq",
        }
    }

    /// Field name without the kind prefix
    pub fn name(self) -> &'static str {
        match self {
            PropertyType::Item(p) => p.name(),
            PropertyType::Npc(p) => p.name(),
            PropertyType::Object(p) => p.name(),
            PropertyType::Varp(p) => p.name(),
            PropertyType::Identikit(p) => p.name(),
            PropertyType::Sequence(p) => p.name(),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind(), self.name())
    }
}

property_kind! {
    /// Item (`obj`) registry fields
    ItemProperty => Item {
        Model = "model",
        Name = "name",
        Description = "description",
        SpriteZoom = "sprite_zoom",
        SpritePitch = "sprite_pitch",
        SpriteRoll = "sprite_roll",
        SpriteTranslateX = "sprite_translate_x",
        SpriteTranslateY = "sprite_translate_y",
        Stackable = "stackable",
        Value = "value",
        Members = "members",
        PrimaryMaleModel = "primary_male_model",
        SecondaryMaleModel = "secondary_male_model",
        PrimaryFemaleModel = "primary_female_model",
        SecondaryFemaleModel = "secondary_female_model",
        TertiaryMaleModel = "tertiary_male_model",
        TertiaryFemaleModel = "tertiary_female_model",
        PrimaryMaleHeadModel = "primary_male_head_model",
        PrimaryFemaleHeadModel = "primary_female_head_model",
        SecondaryMaleHeadModel = "secondary_male_head_model",
        SecondaryFemaleHeadModel = "secondary_female_head_model",
        SpriteYaw = "sprite_yaw",
        NoteInfoId = "note_info_id",
        NoteTemplateId = "note_template_id",
        GroundScaleX = "ground_scale_x",
        GroundScaleY = "ground_scale_y",
        GroundScaleZ = "ground_scale_z",
        AmbientLight = "ambient_light",
        Contrast = "contrast",
        Team = "team",
    }
}

property_kind! {
    /// NPC (`npc`) registry fields
    NpcProperty => Npc {
        Name = "name",
        Description = "description",
        Size = "size",
        IdleAnimation = "idle_animation",
        WalkAnimation = "walk_animation",
        MovementAnimations = "movement_animations",
        MinimapVisible = "minimap_visible",
        CombatLevel = "combat_level",
        FlatScale = "flat_scale",
        HeightScale = "height_scale",
        PriorityRender = "priority_render",
        LightModifier = "light_modifier",
        ShadowModifier = "shadow_modifier",
        HeadIcon = "head_icon",
        TurnRate = "turn_rate",
        Clickable = "clickable",
    }
}

property_kind! {
    /// Scenery object (`loc`) registry fields
    ObjectProperty => Object {
        Name = "name",
        Description = "description",
        Width = "width",
        Length = "length",
        Solid = "solid",
        Impenetrable = "impenetrable",
        Interactive = "interactive",
        ContourGround = "contour_ground",
        DelayShading = "delay_shading",
        Occludes = "occludes",
        Animation = "animation",
        DecorDisplacement = "decor_displacement",
        AmbientLighting = "ambient_lighting",
        LightDiffusion = "light_diffusion",
        MinimapFunction = "minimap_function",
        Inverted = "inverted",
        CastsShadow = "casts_shadow",
        ScaleX = "scale_x",
        ScaleY = "scale_y",
        ScaleZ = "scale_z",
        MapScene = "map_scene",
        Surroundings = "surroundings",
        TranslateX = "translate_x",
        TranslateY = "translate_y",
        TranslateZ = "translate_z",
        ObstructsGround = "obstructs_ground",
        Hollow = "hollow",
        SupportsItems = "supports_items",
    }
}

property_kind! {
    /// Parameter variable (`varp`) registry fields
    VarpProperty => Varp {
        Parameter = "parameter",
    }
}

property_kind! {
    /// Identikit (`idk`) registry fields
    IdentikitProperty => Identikit {
        Part = "part",
        NonSelectable = "non_selectable",
    }
}

property_kind! {
    /// Animation sequence (`seq`) registry fields
    SequenceProperty => Sequence {
        Frames = "frames",
        LoopOffset = "loop_offset",
        Stretches = "stretches",
        Priority = "priority",
        PlayerOffhand = "player_offhand",
        PlayerMainhand = "player_mainhand",
        MaximumLoops = "maximum_loops",
        AnimatingPrecedence = "animating_precedence",
        WalkingPrecedence = "walking_precedence",
        ReplayMode = "replay_mode",
    }
}
