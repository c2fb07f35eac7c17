//! Legacy Config: codec for opcode-tagged game cache config definitions
//!
//! Config archives store each definition (an item, NPC, map object, ...) as
//! a run of single-byte opcodes, each followed by its payload, closed by
//! opcode `0`. This crate decodes those records into typed definitions and
//! writes them back out.
//!
//! # Key Features
//!
//! - **Typed properties**: every registered field has a [`PropertyType`], a
//!   default and its own payload codec
//! - **Template maps**: each kind decodes into a clone of an immutable
//!   template, so one decoder can be shared across threads
//! - **Canonical re-encoding**: present properties in opcode order, then the
//!   kind's list-shaped fields
//! - **Indexed entries**: `.idx` lengths allow records to decode in parallel
//!
//! # Record Format
//!
//! ```text
//! record  := (opcode payload)* 0x00
//! opcode  := u8 (1..=255)
//! payload := fixed per opcode and kind, big-endian
//! string  := latin-1 bytes, 0x0A terminated
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use legacy_config::{DefinitionDecoder, Item, decode_entry};
//!
//! let dat = std::fs::read("obj.dat").unwrap();
//! let decoder = DefinitionDecoder::<Item>::new().unwrap();
//! for item in decode_entry(&decoder, &dat).unwrap() {
//!     println!("{}: {}", item.id(), item.name());
//! }
//! ```

mod buffer;
mod definition;
mod entry;
mod error;
mod frames;
mod kinds;
mod part;
mod property;

pub use buffer::{Buffer, STRING_TERMINATOR};
pub use definition::{Definition, DefinitionDecoder, DefinitionKind};
pub use entry::{
    DAT_HEADER_LEN, EncodedEntry, decode_entry, decode_indexed, encode_entry, read_index,
};
pub use error::{ConfigError, Result};
pub use frames::{FrameCollection, MAX_FRAMES};
pub use kinds::{
    HIDDEN_ACTION, Identikit, IdentikitDefinition, IdentikitInline, Item, ItemDefinition,
    ItemInline, Morphism, MovementAnimations, Npc, NpcDefinition, NpcInline, Object,
    ObjectDefinition, ObjectInline, OffsetModel, Recolor, Sequence, SequenceDefinition,
    SequenceInline, StackVariant, TypedModel, Varp, VarpDefinition, VarpInline,
};
pub use part::{FEMALE_ID_OFFSET, Gender, MAX_WIRE_ID, Part};
pub use property::{
    ConfigProperty, ConfigPropertyMap, DEFINITION_TERMINATOR, Decoder, Encoder, IdentikitProperty,
    ItemProperty, NULL_ID, NpcProperty, ObjectProperty, Opcode, PropertyType, PropertyValue,
    SequenceProperty, SerializableProperty, VarpProperty, read_optional_short,
    write_optional_short,
};

/// Archive entry names of every supported kind
pub const ENTRY_NAMES: [&str; 6] = [
    Item::ENTRY_NAME,
    Npc::ENTRY_NAME,
    Object::ENTRY_NAME,
    Varp::ENTRY_NAME,
    Identikit::ENTRY_NAME,
    Sequence::ENTRY_NAME,
];
