//! Config codec error types

use crate::property::PropertyType;

/// Errors raised while decoding, encoding or building config definitions
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    // ========================================================================
    // Decoding
    // ========================================================================
    /// A read needed more bytes than the buffer had left
    #[error("buffer underrun at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// Opcode matched neither the property map nor an inline case
    #[error("unknown {kind} opcode {opcode} in definition {id}")]
    UnknownOpcode {
        kind: &'static str,
        id: u32,
        opcode: u8,
    },

    /// A decoded or supplied scalar is outside its domain
    #[error("{what} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// An indexed record did not end where the index said it would
    #[error("definition {id} spans {consumed} bytes but the index declares {expected}")]
    LengthMismatch {
        id: u32,
        expected: usize,
        consumed: usize,
    },

    // ========================================================================
    // Construction
    // ========================================================================
    /// Opcode 0 terminates every definition and cannot carry a property
    #[error("opcode 0 is reserved for the definition terminator")]
    ReservedOpcode,

    /// Frame collection arrays must all have the same length
    #[error(
        "frame collection arrays differ in length \
         (primaries {primaries}, secondaries {secondaries}, durations {durations})"
    )]
    FrameLengthMismatch {
        primaries: usize,
        secondaries: usize,
        durations: usize,
    },

    /// A count-prefixed list is longer than its prefix can express
    #[error("{what} has {count} elements (max {max})")]
    TooManyElements {
        what: &'static str,
        count: usize,
        max: usize,
    },

    // ========================================================================
    // Lookup
    // ========================================================================
    /// No property is registered for the opcode
    #[error("no property with opcode {0} exists")]
    MissingOpcode(u8),

    /// No property is registered for the type
    #[error("no property of type {0} exists")]
    MissingProperty(PropertyType),

    /// The property exists but holds a different value type
    #[error("property {property} does not hold a value of type {expected}")]
    TypeMismatch {
        property: PropertyType,
        expected: &'static str,
    },

    // ========================================================================
    // Encoding
    // ========================================================================
    /// A string holds a character with no single-byte wire form
    #[error("string {value:?} cannot be encoded: character {character:?} at index {index}")]
    InvalidString {
        value: String,
        character: char,
        index: usize,
    },

    /// Writer failure while encoding
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConfigError>;
