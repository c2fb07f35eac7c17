//! Definitions and the generic opcode decode loop
//!
//! Every definition record is a run of `opcode, payload` pairs closed by
//! [`DEFINITION_TERMINATOR`]. Opcodes registered in the kind's template map
//! decode through their property; the rest go to the kind's inline handler,
//! and anything neither recognises fails the record.

use std::fmt;
use std::marker::PhantomData;

use byteorder::WriteBytesExt;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::trace;

use crate::buffer::Buffer;
use crate::error::{ConfigError, Result};
use crate::property::{
    ConfigProperty, ConfigPropertyMap, DEFINITION_TERMINATOR, Opcode, PropertyType, PropertyValue,
};

/// A kind of config definition (items, NPCs, ...)
///
/// Implementors supply the template property map and handle the opcodes
/// that do not fit a single typed property.
pub trait DefinitionKind: Sized + 'static {
    /// Archive entry name, without extension
    const ENTRY_NAME: &'static str;

    /// Fields decoded outside the property map
    type Inline: Default + Clone + fmt::Debug + PartialEq + Serialize + Send + Sync;

    /// The default definition every record starts from
    fn template() -> Result<ConfigPropertyMap>;

    /// Decode an opcode the property map does not hold
    ///
    /// Returns `Ok(false)` if the opcode is not one of this kind's inline
    /// cases; the decode loop turns that into [`ConfigError::UnknownOpcode`].
    fn decode_inline(
        inline: &mut Self::Inline,
        opcode: Opcode,
        buffer: &mut Buffer<'_>,
    ) -> Result<bool>;

    /// Encode the inline fields, opcodes included
    fn encode_inline(inline: &Self::Inline, buffer: &mut Vec<u8>) -> Result<()>;
}

/// A decoded definition of kind `K`
pub struct Definition<K: DefinitionKind> {
    id: u32,
    properties: ConfigPropertyMap,
    inline: K::Inline,
}

impl<K: DefinitionKind> Definition<K> {
    /// Create a definition from a property map, with empty inline fields
    pub fn new(id: u32, properties: ConfigPropertyMap) -> Self {
        Self {
            id,
            properties,
            inline: K::Inline::default(),
        }
    }

    /// Create a definition holding the kind's defaults
    pub fn from_template(id: u32) -> Result<Self> {
        Ok(Self::new(id, K::template()?))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn properties(&self) -> &ConfigPropertyMap {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut ConfigPropertyMap {
        &mut self.properties
    }

    pub fn inline(&self) -> &K::Inline {
        &self.inline
    }

    pub fn inline_mut(&mut self) -> &mut K::Inline {
        &mut self.inline
    }

    /// Typed access to a registry property
    pub fn property<T: PropertyValue>(
        &self,
        property_type: impl Into<PropertyType>,
    ) -> Result<&ConfigProperty<T>> {
        self.properties.property(property_type)
    }

    pub fn property_mut<T: PropertyValue>(
        &mut self,
        property_type: impl Into<PropertyType>,
    ) -> Result<&mut ConfigProperty<T>> {
        self.properties.property_mut(property_type)
    }

    /// Encode this definition as a terminated record
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.encode_into(&mut buffer)?;
        Ok(buffer)
    }

    /// Append this definition's record to `buffer`
    ///
    /// Present properties are written in opcode order, then the inline
    /// fields, then the terminator.
    pub fn encode_into(&self, buffer: &mut Vec<u8>) -> Result<()> {
        for (opcode, property) in self.properties.entries() {
            if property.is_present() {
                buffer.write_u8(opcode)?;
                property.encode(buffer)?;
            }
        }
        K::encode_inline(&self.inline, buffer)?;
        buffer.write_u8(DEFINITION_TERMINATOR)?;
        Ok(())
    }

    // Accessor helpers for the kind modules. A caller-supplied template may
    // omit a property, so lookups fall back instead of failing.

    pub(crate) fn value_or<T: PropertyValue + Copy>(
        &self,
        property_type: impl Into<PropertyType>,
        fallback: T,
    ) -> T {
        self.properties
            .property::<T>(property_type)
            .map(|property| *property.value())
            .unwrap_or(fallback)
    }

    pub(crate) fn str_or<'a>(
        &'a self,
        property_type: impl Into<PropertyType>,
        fallback: &'a str,
    ) -> &'a str {
        self.properties
            .property::<String>(property_type)
            .map(|property| property.value().as_str())
            .unwrap_or(fallback)
    }

    /// Supplied value of a registry property, if any
    pub(crate) fn present<T: PropertyValue>(
        &self,
        property_type: impl Into<PropertyType>,
    ) -> Option<&T> {
        self.properties
            .property::<T>(property_type)
            .ok()
            .and_then(ConfigProperty::get)
    }
}

impl<K: DefinitionKind> Clone for Definition<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            properties: self.properties.clone(),
            inline: self.inline.clone(),
        }
    }
}

impl<K: DefinitionKind> PartialEq for Definition<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.properties == other.properties && self.inline == other.inline
    }
}

impl<K: DefinitionKind> fmt::Debug for Definition<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("kind", &K::ENTRY_NAME)
            .field("id", &self.id)
            .field("properties", &self.properties)
            .field("inline", &self.inline)
            .finish()
    }
}

impl<K: DefinitionKind> Serialize for Definition<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Definition", 4)?;
        state.serialize_field("kind", K::ENTRY_NAME)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("properties", &self.properties)?;
        state.serialize_field("inline", &self.inline)?;
        state.end()
    }
}

/// Decodes records of kind `K` against a template
///
/// The template is shared read-only; each record decodes into its own clone,
/// so one decoder can serve any number of threads.
pub struct DefinitionDecoder<K: DefinitionKind> {
    template: ConfigPropertyMap,
    _kind: PhantomData<fn() -> K>,
}

impl<K: DefinitionKind> DefinitionDecoder<K> {
    /// Decoder using the kind's built-in template
    pub fn new() -> Result<Self> {
        Ok(Self::with_template(K::template()?))
    }

    /// Decoder using a caller-supplied template
    pub fn with_template(template: ConfigPropertyMap) -> Self {
        Self {
            template,
            _kind: PhantomData,
        }
    }

    pub fn template(&self) -> &ConfigPropertyMap {
        &self.template
    }

    /// Decode one record starting at the buffer's position
    ///
    /// On success the buffer is left just past the terminator. Any error
    /// aborts the record; no partial definition is returned.
    pub fn decode(&self, id: u32, buffer: &mut Buffer<'_>) -> Result<Definition<K>> {
        let start = buffer.position();
        let mut definition = Definition::<K>::new(id, self.template.clone());

        loop {
            let opcode = buffer.read_u8()?;
            if opcode == DEFINITION_TERMINATOR {
                break;
            }

            if definition.properties.contains_opcode(opcode) {
                definition.properties.get_mut(opcode)?.decode(buffer)?;
            } else if !K::decode_inline(&mut definition.inline, opcode, buffer)? {
                return Err(ConfigError::UnknownOpcode {
                    kind: K::ENTRY_NAME,
                    id,
                    opcode,
                });
            }
        }

        trace!(
            kind = K::ENTRY_NAME,
            id,
            bytes = buffer.position() - start,
            "decoded definition"
        );
        Ok(definition)
    }

    /// Decode a single record from a byte slice
    pub fn decode_bytes(&self, id: u32, data: &[u8]) -> Result<Definition<K>> {
        self.decode(id, &mut Buffer::new(data))
    }
}

impl<K: DefinitionKind> Clone for DefinitionDecoder<K> {
    fn clone(&self) -> Self {
        Self::with_template(self.template.clone())
    }
}

impl<K: DefinitionKind> fmt::Debug for DefinitionDecoder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionDecoder")
            .field("kind", &K::ENTRY_NAME)
            .field("template", &self.template)
            .finish()
    }
}
