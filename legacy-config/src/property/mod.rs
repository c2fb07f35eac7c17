//! Typed config properties and the registry that holds them
//!
//! A [`ConfigProperty`] is one field of a definition: its type identifier,
//! the kind's default value, the current value, and the codec that reads
//! and writes its payload. Property maps store them behind the
//! [`SerializableProperty`] trait so one map can hold fields of any value type.

mod codec;
mod map;
mod types;


pub use codec::{NULL_ID, read_optional_short, write_optional_short};
pub use map::{ConfigPropertyMap, DEFINITION_TERMINATOR, Opcode};
pub use types::{
    IdentikitProperty, ItemProperty, NpcProperty, ObjectProperty, PropertyType, SequenceProperty,
    VarpProperty,
};

use std::any::Any;
use std::fmt;

use serde::Serialize;

use crate::buffer::Buffer;
use crate::error::Result;

/// Reads one property payload
pub type Decoder<T> = fn(&mut Buffer<'_>) -> Result<T>;

/// Writes one property payload
pub type Encoder<T> = fn(&mut Vec<u8>, &T) -> Result<()>;

/// Values a property can hold
pub trait PropertyValue: Clone + fmt::Debug + PartialEq + Serialize + Send + Sync + 'static {}

impl<T> PropertyValue for T where T: Clone + fmt::Debug + PartialEq + Serialize + Send + Sync + 'static
{}

/// Type-erased view of a [`ConfigProperty`]
///
/// This is what the decode loop and the encoder work with; typed access goes
/// through [`ConfigPropertyMap::property`].
pub trait SerializableProperty: fmt::Debug + Send + Sync {
    /// The type identifier of this property
    fn property_type(&self) -> PropertyType;

    /// Whether a record (or a caller) supplied a value
    fn is_present(&self) -> bool;

    /// Decode the payload from `buffer` and store it as the current value
    fn decode(&mut self, buffer: &mut Buffer<'_>) -> Result<()>;

    /// Encode the current value's payload (without the opcode)
    fn encode(&self, buffer: &mut Vec<u8>) -> Result<()>;

    /// Restore the default value and clear presence
    fn reset(&mut self);

    /// Independent copy with the same current value
    fn duplicate(&self) -> Box<dyn SerializableProperty>;

    /// Current value as JSON
    fn to_json(&self) -> serde_json::Result<serde_json::Value>;

    /// Value equality against another property of any type
    fn value_eq(&self, other: &dyn SerializableProperty) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A single typed field of a definition
#[derive(Clone)]
pub struct ConfigProperty<T> {
    property_type: PropertyType,
    default: T,
    value: T,
    present: bool,
    decoder: Decoder<T>,
    encoder: Encoder<T>,
}

impl<T: PropertyValue> ConfigProperty<T> {
    /// Create a property holding its default value
    pub fn new(
        property_type: impl Into<PropertyType>,
        default: T,
        decoder: Decoder<T>,
        encoder: Encoder<T>,
    ) -> Self {
        Self {
            property_type: property_type.into(),
            value: default.clone(),
            default,
            present: false,
            decoder,
            encoder,
        }
    }

    /// Box this property for insertion into a [`ConfigPropertyMap`]
    pub fn boxed(self) -> Box<dyn SerializableProperty> {
        Box::new(self)
    }

    /// Current value (the default if nothing was decoded)
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The kind's default for this field
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Current value, only if one was supplied
    pub fn get(&self) -> Option<&T> {
        self.present.then_some(&self.value)
    }

    /// Replace the current value
    ///
    /// Setting a property back to its default clears it, so it is left out
    /// when the definition is encoded.
    pub fn set(&mut self, value: T) {
        self.present = value != self.default;
        self.value = value;
    }
}

impl<T: PropertyValue> SerializableProperty for ConfigProperty<T> {
    fn property_type(&self) -> PropertyType {
        self.property_type
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn decode(&mut self, buffer: &mut Buffer<'_>) -> Result<()> {
        self.value = (self.decoder)(buffer)?;
        self.present = true;
        Ok(())
    }

    fn encode(&self, buffer: &mut Vec<u8>) -> Result<()> {
        (self.encoder)(buffer, &self.value)
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
        self.present = false;
    }

    fn duplicate(&self) -> Box<dyn SerializableProperty> {
        Box::new(self.clone())
    }

    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.value)
    }

    fn value_eq(&self, other: &dyn SerializableProperty) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: PartialEq> PartialEq for ConfigProperty<T> {
    fn eq(&self, other: &Self) -> bool {
        self.property_type == other.property_type
            && self.present == other.present
            && self.value == other.value
    }
}

impl<T: fmt::Debug> fmt::Debug for ConfigProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigProperty")
            .field("type", &self.property_type)
            .field("value", &self.value)
            .field("default", &self.default)
            .field("present", &self.present)
            .finish()
    }
}
