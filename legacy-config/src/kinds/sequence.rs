//! Animation sequence (seq) definitions

use serde::Serialize;

use crate::buffer::{self, Buffer};
use crate::definition::{Definition, DefinitionKind};
use crate::error::Result;
use crate::frames::FrameCollection;
use crate::property::{ConfigProperty, ConfigPropertyMap, Opcode, SequenceProperty};

/// Sequence definition kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence;

pub type SequenceDefinition = Definition<Sequence>;

const INTERLEAVE_ORDER: Opcode = 3;

static NO_FRAMES: FrameCollection = FrameCollection::EMPTY;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SequenceInline {
    /// Skeleton groups that keep playing the underlying animation
    pub interleave_order: Vec<u8>,
}

impl DefinitionKind for Sequence {
    const ENTRY_NAME: &'static str = "seq";

    type Inline = SequenceInline;

    fn template() -> Result<ConfigPropertyMap> {
        use SequenceProperty::*;

        ConfigPropertyMap::from_properties([
            (
                1,
                ConfigProperty::new(
                    Frames,
                    FrameCollection::EMPTY,
                    FrameCollection::decode,
                    FrameCollection::encode,
                )
                .boxed(),
            ),
            (2, ConfigProperty::optional_short(LoopOffset).boxed()),
            (4, ConfigProperty::flag(Stretches, false).boxed()),
            (5, ConfigProperty::unsigned_byte(Priority, 5).boxed()),
            (6, ConfigProperty::optional_short(PlayerOffhand).boxed()),
            (7, ConfigProperty::optional_short(PlayerMainhand).boxed()),
            (8, ConfigProperty::unsigned_byte(MaximumLoops, 99).boxed()),
            (9, ConfigProperty::unsigned_byte(AnimatingPrecedence, 0).boxed()),
            (10, ConfigProperty::unsigned_byte(WalkingPrecedence, 0).boxed()),
            (11, ConfigProperty::unsigned_byte(ReplayMode, 2).boxed()),
        ])
    }

    fn decode_inline(
        inline: &mut SequenceInline,
        opcode: Opcode,
        buffer: &mut Buffer<'_>,
    ) -> Result<bool> {
        match opcode {
            INTERLEAVE_ORDER => {
                let count = buffer.read_u8()?;
                inline.interleave_order = (0..count)
                    .map(|_| buffer.read_u8())
                    .collect::<Result<_>>()?;
            }
            // Unused client field
            12 => buffer.skip(4)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn encode_inline(inline: &SequenceInline, buffer: &mut Vec<u8>) -> Result<()> {
        if !inline.interleave_order.is_empty() {
            buffer.push(INTERLEAVE_ORDER);
            buffer::write_count(buffer, "interleave order", inline.interleave_order.len())?;
            buffer.extend_from_slice(&inline.interleave_order);
        }
        Ok(())
    }
}

impl SequenceDefinition {
    pub fn frames(&self) -> &FrameCollection {
        self.property::<FrameCollection>(SequenceProperty::Frames)
            .map(ConfigProperty::value)
            .unwrap_or(&NO_FRAMES)
    }

    /// Frame index the animation restarts from, if it loops part-way
    pub fn loop_offset(&self) -> Option<u16> {
        self.value_or(SequenceProperty::LoopOffset, None)
    }

    pub fn priority(&self) -> u8 {
        self.value_or(SequenceProperty::Priority, 5)
    }

    pub fn maximum_loops(&self) -> u8 {
        self.value_or(SequenceProperty::MaximumLoops, 99)
    }

    pub fn replay_mode(&self) -> u8 {
        self.value_or(SequenceProperty::ReplayMode, 2)
    }

    /// Sum of all frame durations, in client ticks
    pub fn duration(&self) -> u32 {
        self.frames().total_duration()
    }
}
