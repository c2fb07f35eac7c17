//! Constructors for the common payload shapes

use byteorder::{BigEndian, WriteBytesExt};

use super::{ConfigProperty, Decoder, PropertyType};
use crate::buffer::{self, Buffer};
use crate::error::{ConfigError, Result};

/// Wire value meaning "no id" for optional 2-byte ids
pub const NULL_ID: u16 = 65535;

impl ConfigProperty<u8> {
    pub fn unsigned_byte(property_type: impl Into<PropertyType>, default: u8) -> Self {
        Self::new(property_type, default, |buffer| buffer.read_u8(), |buffer, value| {
            Ok(buffer.write_u8(*value)?)
        })
    }
}

impl ConfigProperty<i8> {
    pub fn signed_byte(property_type: impl Into<PropertyType>, default: i8) -> Self {
        Self::new(property_type, default, |buffer| buffer.read_i8(), |buffer, value| {
            Ok(buffer.write_i8(*value)?)
        })
    }
}

impl ConfigProperty<u16> {
    pub fn unsigned_short(property_type: impl Into<PropertyType>, default: u16) -> Self {
        Self::new(property_type, default, |buffer| buffer.read_u16(), |buffer, value| {
            Ok(buffer.write_u16::<BigEndian>(*value)?)
        })
    }
}

impl ConfigProperty<i16> {
    pub fn signed_short(property_type: impl Into<PropertyType>, default: i16) -> Self {
        Self::new(property_type, default, |buffer| buffer.read_i16(), |buffer, value| {
            Ok(buffer.write_i16::<BigEndian>(*value)?)
        })
    }
}

impl ConfigProperty<i32> {
    pub fn int(property_type: impl Into<PropertyType>, default: i32) -> Self {
        Self::new(property_type, default, |buffer| buffer.read_i32(), |buffer, value| {
            Ok(buffer.write_i32::<BigEndian>(*value)?)
        })
    }
}

impl ConfigProperty<String> {
    pub fn string(property_type: impl Into<PropertyType>, default: &str) -> Self {
        Self::new(
            property_type,
            default.to_string(),
            |buffer| buffer.read_string(),
            |out, value| buffer::write_string(out, value),
        )
    }
}

impl ConfigProperty<Option<u16>> {
    /// A 2-byte id where [`NULL_ID`] means absent
    pub fn optional_short(property_type: impl Into<PropertyType>) -> Self {
        Self::new(property_type, None, read_optional_short, |buffer, value| {
            write_optional_short(buffer, *value)
        })
    }
}

impl ConfigProperty<bool> {
    /// A payload-less opcode whose presence flips the default
    pub fn flag(property_type: impl Into<PropertyType>, default: bool) -> Self {
        let decoder: Decoder<bool> = if default { decode_clear } else { decode_set };
        Self::new(property_type, default, decoder, |_, _| Ok(()))
    }

    /// A one-byte boolean, `1` meaning true
    pub fn boolean_byte(property_type: impl Into<PropertyType>, default: bool) -> Self {
        Self::new(
            property_type,
            default,
            |buffer| Ok(buffer.read_u8()? == 1),
            |buffer, value| Ok(buffer.write_u8(u8::from(*value))?),
        )
    }
}

/// Read a 2-byte id, mapping [`NULL_ID`] to `None`
pub fn read_optional_short(buffer: &mut Buffer<'_>) -> Result<Option<u16>> {
    let value = buffer.read_u16()?;
    Ok((value != NULL_ID).then_some(value))
}

/// Write a 2-byte id, `None` as [`NULL_ID`]
///
/// `Some(NULL_ID)` would read back as `None`, so it is rejected.
pub fn write_optional_short(buffer: &mut Vec<u8>, value: Option<u16>) -> Result<()> {
    let id = match value {
        None => NULL_ID,
        Some(NULL_ID) => {
            return Err(ConfigError::OutOfRange {
                what: "optional id",
                value: i64::from(NULL_ID),
                min: 0,
                max: i64::from(NULL_ID - 1),
            });
        }
        Some(id) => id,
    };
    buffer.write_u16::<BigEndian>(id)?;
    Ok(())
}

fn decode_set(_: &mut Buffer<'_>) -> Result<bool> {
    Ok(true)
}

fn decode_clear(_: &mut Buffer<'_>) -> Result<bool> {
    Ok(false)
}
