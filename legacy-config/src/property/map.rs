//! Opcode- and type-indexed property registry

use std::fmt;

use hashbrown::HashMap;
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};

use super::{ConfigProperty, PropertyType, PropertyValue, SerializableProperty};
use crate::error::{ConfigError, Result};

/// Single-byte field tag
pub type Opcode = u8;

/// Opcode that ends every definition record
pub const DEFINITION_TERMINATOR: Opcode = 0;

/// The properties of a definition, reachable by opcode or by type
///
/// Each property is owned once, under its opcode; the type index maps back to
/// that opcode, so both views always cover the same set of properties.
///
/// Cloning duplicates every property. This is how a kind's template map is
/// specialised per record: the template is never mutated, each decode works
/// on its own clone.
pub struct ConfigPropertyMap {
    opcodes: HashMap<Opcode, Box<dyn SerializableProperty>>,
    types: HashMap<PropertyType, Opcode>,
}

impl ConfigPropertyMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            opcodes: HashMap::new(),
            types: HashMap::new(),
        }
    }

    /// Build a map from opcode/property pairs
    ///
    /// Fails with [`ConfigError::ReservedOpcode`] if any pair uses opcode 0.
    pub fn from_properties<I>(properties: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Opcode, Box<dyn SerializableProperty>)>,
    {
        let mut map = Self::new();
        for (opcode, property) in properties {
            map.put(opcode, property)?;
        }
        Ok(map)
    }

    /// Register `property` under `opcode`, replacing whatever held either key
    pub fn put(&mut self, opcode: Opcode, property: Box<dyn SerializableProperty>) -> Result<()> {
        if opcode == DEFINITION_TERMINATOR {
            return Err(ConfigError::ReservedOpcode);
        }

        let property_type = property.property_type();

        // Keep the two indices in step: drop the old owner of each key
        match self.types.insert(property_type, opcode) {
            Some(previous) if previous != opcode => {
                self.opcodes.remove(&previous);
            }
            _ => {}
        }
        if let Some(displaced) = self.opcodes.insert(opcode, property) {
            let displaced_type = displaced.property_type();
            if displaced_type != property_type {
                self.types.remove(&displaced_type);
            }
        }

        Ok(())
    }

    /// Get the property registered under `opcode`
    pub fn get(&self, opcode: Opcode) -> Result<&dyn SerializableProperty> {
        self.opcodes
            .get(&opcode)
            .map(|property| property.as_ref())
            .ok_or(ConfigError::MissingOpcode(opcode))
    }

    pub fn get_mut(&mut self, opcode: Opcode) -> Result<&mut dyn SerializableProperty> {
        match self.opcodes.get_mut(&opcode) {
            Some(property) => Ok(property.as_mut()),
            None => Err(ConfigError::MissingOpcode(opcode)),
        }
    }

    /// Get the property with the given type
    pub fn get_by_type(
        &self,
        property_type: impl Into<PropertyType>,
    ) -> Result<&dyn SerializableProperty> {
        let opcode = self.opcode_of(property_type)?;
        self.get(opcode)
    }

    pub fn get_by_type_mut(
        &mut self,
        property_type: impl Into<PropertyType>,
    ) -> Result<&mut dyn SerializableProperty> {
        let opcode = self.opcode_of(property_type)?;
        self.get_mut(opcode)
    }

    /// Typed access to a property
    ///
    /// Fails with [`ConfigError::TypeMismatch`] if the property does not hold
    /// a `T`.
    pub fn property<T: PropertyValue>(
        &self,
        property_type: impl Into<PropertyType>,
    ) -> Result<&ConfigProperty<T>> {
        let property_type = property_type.into();
        self.get_by_type(property_type)?
            .as_any()
            .downcast_ref::<ConfigProperty<T>>()
            .ok_or(ConfigError::TypeMismatch {
                property: property_type,
                expected: std::any::type_name::<T>(),
            })
    }

    pub fn property_mut<T: PropertyValue>(
        &mut self,
        property_type: impl Into<PropertyType>,
    ) -> Result<&mut ConfigProperty<T>> {
        let property_type = property_type.into();
        self.get_by_type_mut(property_type)?
            .as_any_mut()
            .downcast_mut::<ConfigProperty<T>>()
            .ok_or(ConfigError::TypeMismatch {
                property: property_type,
                expected: std::any::type_name::<T>(),
            })
    }

    /// Opcode a property type is registered under
    pub fn opcode_of(&self, property_type: impl Into<PropertyType>) -> Result<Opcode> {
        let property_type = property_type.into();
        self.types
            .get(&property_type)
            .copied()
            .ok_or(ConfigError::MissingProperty(property_type))
    }

    pub fn contains_opcode(&self, opcode: Opcode) -> bool {
        self.opcodes.contains_key(&opcode)
    }

    /// Number of registered properties
    pub fn size(&self) -> usize {
        self.opcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }

    /// Properties in ascending opcode order
    pub fn values(&self) -> impl Iterator<Item = &dyn SerializableProperty> + '_ {
        self.entries().map(|(_, property)| property)
    }

    /// Opcode/property pairs in ascending opcode order
    pub fn entries(&self) -> impl Iterator<Item = (Opcode, &dyn SerializableProperty)> + '_ {
        let mut opcodes: Vec<Opcode> = self.opcodes.keys().copied().collect();
        opcodes.sort_unstable();
        opcodes.into_iter().filter_map(move |opcode| {
            self.opcodes
                .get(&opcode)
                .map(|property| (opcode, property.as_ref()))
        })
    }

    /// Restore every property to its default
    pub fn reset(&mut self) {
        for property in self.opcodes.values_mut() {
            property.reset();
        }
    }
}

impl Default for ConfigPropertyMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ConfigPropertyMap {
    fn clone(&self) -> Self {
        Self {
            opcodes: self
                .opcodes
                .iter()
                .map(|(&opcode, property)| (opcode, property.duplicate()))
                .collect(),
            types: self.types.clone(),
        }
    }
}

impl PartialEq for ConfigPropertyMap {
    fn eq(&self, other: &Self) -> bool {
        self.opcodes.len() == other.opcodes.len()
            && self.opcodes.iter().all(|(opcode, property)| {
                other
                    .opcodes
                    .get(opcode)
                    .is_some_and(|theirs| property.value_eq(theirs.as_ref()))
            })
    }
}

impl fmt::Debug for ConfigPropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

/// Serializes present properties as `name: value`, in opcode order
impl Serialize for ConfigPropertyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let present: Vec<_> = self.values().filter(|p| p.is_present()).collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for property in present {
            let value = property.to_json().map_err(S::Error::custom)?;
            map.serialize_entry(property.property_type().name(), &value)?;
        }
        map.end()
    }
}
